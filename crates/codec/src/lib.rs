//! Xrbind Codec - persistence for VR action configurations
//!
//! This crate converts live [`xrbind_domain`] objects to and from the
//! portable text artifact format: an ordered nested-literal document
//! with a file-version stamp and an optional self-import bootstrap
//! footer. Export walks live objects into text; import parses text
//! into a [`literal::Literal`] tree, migrates it by version when
//! needed, and reconstructs live objects, downgrading per-property
//! failures to warnings.

pub mod export;
pub mod float;
pub mod import;
pub mod literal;
pub mod parser;
pub mod versioning;
pub mod warning;

pub use export::{
    ExportError, ExportOptions, actionconfig_export_as_data, actionconfig_export_to_file,
    am_args_as_data, ami_args_as_data,
};
pub use import::{
    ActionConfigImporter, ImportError, ImportReport, NoOperators, OperatorSchemas,
    StaticOperatorSchemas, am_data_from_args, ami_data_from_args,
};
pub use literal::Literal;
pub use parser::{ParseError, parse_document, parse_literal};
pub use versioning::{Migrate, NoMigration};
pub use warning::{ImportWarning, WarningKind};
