//! Action-configuration import.
//!
//! Reconstructs live configuration objects from parsed artifact data.
//! Failures local to one property are downgraded to warnings so that
//! hand-edited or version-drifted files still import as far as
//! possible; structural failures (missing required fields, an items
//! collection that is not a list) abort the whole import.

use crate::literal::Literal;
use crate::parser::{self, ParseError};
use crate::versioning::{Migrate, needs_migration};
use crate::warning::ImportWarning;
use indexmap::IndexMap;
use thiserror::Error;
use xrbind_domain::{
    ActionConfig, ActionConfigs, ActionMap, ActionMapItem, AmiBinding, FileVersion, PropertyError,
    PropertyGroup, PropertyValue,
};

/// Import error types (fatal; per-property failures become
/// [`ImportWarning`]s instead).
#[derive(Debug, Error)]
pub enum ImportError {
    /// The artifact text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The artifact has no `actionconfig_data` assignment.
    #[error("artifact contains no actionconfig_data")]
    MissingData,
    /// A required argument key is absent.
    #[error("missing '{key}' in {context}")]
    MissingField {
        /// The absent key.
        key: &'static str,
        /// Where it was expected.
        context: String,
    },
    /// An argument value has the wrong shape.
    #[error("bad '{key}' in {context}: {message}")]
    InvalidField {
        /// The offending key.
        key: &'static str,
        /// Where it occurred.
        context: String,
        /// What was wrong.
        message: String,
    },
    /// An items collection was not a true list.
    ///
    /// Full action maps must keep items as lists so they can be
    /// extended generically; this is a data-contract violation, not
    /// a recoverable input problem.
    #[error("actionmap '{name}': items must be a list, found {found}")]
    ItemsNotAList {
        /// The map whose items were mistyped.
        name: String,
        /// The kind actually found.
        found: &'static str,
    },
    /// A structural element had an unexpected shape.
    #[error("malformed {context}: {message}")]
    Malformed {
        /// Where it occurred.
        context: String,
        /// What was wrong.
        message: String,
    },
}

/// Supplies declared operator property schemas, keyed by op code.
///
/// The host owns operator definitions; the importer only needs the
/// declared (sealed) property group for each op so that imported
/// properties can be validated against it.
pub trait OperatorSchemas {
    /// The declared property group for `op`, if the op is known.
    fn op_properties(&self, op: &str) -> Option<PropertyGroup>;
}

/// Schema provider that knows no operators at all.
///
/// Every imported property then surfaces as a schema-drift warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOperators;

impl OperatorSchemas for NoOperators {
    fn op_properties(&self, _op: &str) -> Option<PropertyGroup> {
        None
    }
}

/// A fixed op-to-schema table, in registration order.
#[derive(Debug, Clone, Default)]
pub struct StaticOperatorSchemas {
    schemas: IndexMap<String, PropertyGroup>,
}

impl StaticOperatorSchemas {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the declared property group for an op code.
    pub fn insert(&mut self, op: impl Into<String>, schema: PropertyGroup) -> &mut Self {
        self.schemas.insert(op.into(), schema);
        self
    }
}

impl OperatorSchemas for StaticOperatorSchemas {
    fn op_properties(&self, op: &str) -> Option<PropertyGroup> {
        self.schemas.get(op).cloned()
    }
}

/// Result of a successful import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Number of action maps created.
    pub maps: usize,
    /// Number of binding items created.
    pub items: usize,
    /// Per-property problems that were skipped, in encounter order.
    pub warnings: Vec<ImportWarning>,
}

/// Reconstructs live objects from parsed artifact data.
///
/// The current file version, the migration transform, and the
/// operator schema provider are injected rather than looked up from
/// ambient state.
pub struct ActionConfigImporter<'a> {
    current_version: FileVersion,
    migrator: &'a dyn Migrate,
    operators: &'a dyn OperatorSchemas,
}

impl<'a> ActionConfigImporter<'a> {
    /// Create an importer for the given host environment.
    #[must_use]
    pub const fn new(
        current_version: FileVersion,
        migrator: &'a dyn Migrate,
        operators: &'a dyn OperatorSchemas,
    ) -> Self {
        Self {
            current_version,
            migrator,
            operators,
        }
    }

    /// Create new items under `am` from an item-tuple sequence.
    ///
    /// Always creates new items, never updates in place, so the same
    /// entry point serves full imports and partial "extend" imports.
    ///
    /// # Errors
    ///
    /// Returns an error on structural problems; per-property failures
    /// are recorded on the report.
    pub fn actionmap_init_from_data(
        &self,
        am: &mut ActionMap,
        am_items: &Literal,
    ) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport::default();
        self.init_map_items(am, am_items, &mut report)?;
        Ok(report)
    }

    fn init_map_items(
        &self,
        am: &mut ActionMap,
        am_items: &Literal,
        report: &mut ImportReport,
    ) -> Result<(), ImportError> {
        let context = format!("actionmap '{}'", am.name);
        let entries = am_items
            .as_sequence()
            .ok_or_else(|| ImportError::Malformed {
                context: context.clone(),
                message: format!("items must be a sequence, found {}", am_items.kind_name()),
            })?;

        for entry in entries {
            let (ami_name, ami_args, ami_data) = item_tuple(entry, &context)?;
            let map_name = am.name.clone();
            let ami = am.add_item(ami_name);
            ami_data_from_args(ami, ami_args)?;

            // Imported properties validate against the op's declared
            // schema; ops without one reject everything, surfacing
            // the data as schema-drift warnings.
            let schema = ami.op().and_then(|op| self.operators.op_properties(op));
            ami.op_properties = schema.unwrap_or_else(PropertyGroup::sealed);

            if let Some(props_data) = ami_props_data(ami_data, ami_name, &context)? {
                let path = format!("{map_name}/{ami_name}");
                for pair in props_data {
                    match pair.as_sequence() {
                        Some([attr, value]) => {
                            ami_props_setattr(&mut ami.op_properties, attr, value, &path, report);
                        }
                        _ => {
                            let warning = ImportWarning::malformed(
                                &path,
                                "property entry is not an (attr, value) pair".to_string(),
                            );
                            tracing::warn!("{warning}");
                            report.warnings.push(warning);
                        }
                    }
                }
            }
            report.items += 1;
        }
        Ok(())
    }

    /// Populate `ac` from whole-config data, migrating first when an
    /// accompanying version stamp differs from the current version.
    ///
    /// Migration runs purely on the data tree, before any live map or
    /// item is created. `None` means no stamp accompanied the data,
    /// which skips migration.
    ///
    /// # Errors
    ///
    /// Returns an error on structural problems.
    pub fn actionconfig_init_from_data(
        &self,
        ac: &mut ActionConfig,
        actionconfig_data: Literal,
        actionconfig_version: Option<FileVersion>,
    ) -> Result<ImportReport, ImportError> {
        let data = match actionconfig_version {
            Some(from_version)
                if needs_migration(Some(from_version), self.current_version) =>
            {
                tracing::debug!(
                    %from_version,
                    current = %self.current_version,
                    "migrating action configuration data"
                );
                self.migrator.migrate(actionconfig_data, from_version)
            }
            _ => actionconfig_data,
        };

        let mut report = ImportReport::default();
        let entries = data.as_sequence().ok_or_else(|| ImportError::Malformed {
            context: format!("actionconfig '{}'", ac.name),
            message: format!("data must be a sequence, found {}", data.kind_name()),
        })?;

        for entry in entries {
            let context = format!("actionconfig '{}'", ac.name);
            let (am_name, am_args, am_content) = item_tuple(entry, &context)?;
            let am = ac.add_map(am_name);
            am_data_from_args(am, am_args)?;

            let am_items = am_content
                .dict_get("items")
                .ok_or_else(|| ImportError::MissingField {
                    key: "items",
                    context: format!("actionmap '{am_name}'"),
                })?;
            // Tuples are fine for the item tuples themselves, but a
            // full map's items collection must be a list so it can be
            // extended with index-stable semantics downstream.
            if !matches!(am_items, Literal::List(_)) {
                return Err(ImportError::ItemsNotAList {
                    name: am_name.to_string(),
                    found: am_items.kind_name(),
                });
            }
            self.init_map_items(am, am_items, &mut report)?;
            report.maps += 1;
        }
        Ok(report)
    }

    /// Create a brand-new named config in `configs` and populate it.
    ///
    /// A missing version stamp defaults to [`FileVersion::EPOCH`]:
    /// stampless data is treated as the oldest known schema and
    /// always migrated.
    ///
    /// # Errors
    ///
    /// Returns an error on structural problems.
    pub fn actionconfig_import_from_data(
        &self,
        configs: &mut ActionConfigs,
        name: impl Into<String>,
        actionconfig_data: Literal,
        actionconfig_version: Option<FileVersion>,
    ) -> Result<ImportReport, ImportError> {
        let version = actionconfig_version.unwrap_or(FileVersion::EPOCH);
        let ac = configs.create(name);
        let report = self.actionconfig_init_from_data(ac, actionconfig_data, Some(version))?;
        tracing::debug!(
            config = %ac.name,
            maps = report.maps,
            items = report.items,
            warnings = report.warnings.len(),
            "imported action configuration"
        );
        Ok(report)
    }

    /// Parse a whole artifact and import it as a new named config.
    ///
    /// The embedded `actionconfig_version` stamp, when present, feeds
    /// the migration gate; the trailing bootstrap footer is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the data is structurally
    /// malformed.
    pub fn actionconfig_import_from_str(
        &self,
        configs: &mut ActionConfigs,
        name: impl Into<String>,
        source: &str,
    ) -> Result<ImportReport, ImportError> {
        let statements = parser::parse_document(source)?;
        let mut version = None;
        let mut data = None;
        for (stmt_name, value) in statements {
            match stmt_name.as_str() {
                "actionconfig_version" => version = Some(version_from_literal(&value)?),
                "actionconfig_data" => data = Some(value),
                _ => {}
            }
        }
        let data = data.ok_or(ImportError::MissingData)?;
        self.actionconfig_import_from_data(configs, name, data, version)
    }
}

/// Decode a version stamp literal like `(3, 0, 22)`.
fn version_from_literal(value: &Literal) -> Result<FileVersion, ImportError> {
    let context = "actionconfig_version".to_string();
    let seq = value.as_sequence().ok_or_else(|| ImportError::Malformed {
        context: context.clone(),
        message: format!("expected a version tuple, found {}", value.kind_name()),
    })?;
    let components: Vec<i64> = seq
        .iter()
        .map(|item| {
            item.as_int().ok_or_else(|| ImportError::Malformed {
                context: context.clone(),
                message: format!("version component is {}", item.kind_name()),
            })
        })
        .collect::<Result<_, _>>()?;
    FileVersion::from_components(&components).map_err(|err| ImportError::Malformed {
        context,
        message: err.to_string(),
    })
}

/// Split a `(name, args, data)` entry tuple.
fn item_tuple<'v>(
    entry: &'v Literal,
    context: &str,
) -> Result<(&'v str, &'v Literal, &'v Literal), ImportError> {
    let malformed = |message: String| ImportError::Malformed {
        context: context.to_string(),
        message,
    };
    let parts = entry
        .as_sequence()
        .ok_or_else(|| malformed(format!("entry must be a tuple, found {}", entry.kind_name())))?;
    let [name, args, data] = parts else {
        return Err(malformed(format!(
            "entry must have 3 elements, found {}",
            parts.len()
        )));
    };
    let name = name
        .as_str()
        .ok_or_else(|| malformed(format!("entry name must be a string, found {}", name.kind_name())))?;
    Ok((name, args, data))
}

/// The ordered `op_properties` pairs from an item's data element,
/// if any were exported.
fn ami_props_data<'v>(
    ami_data: &'v Literal,
    ami_name: &str,
    context: &str,
) -> Result<Option<&'v [Literal]>, ImportError> {
    if matches!(ami_data, Literal::None) {
        return Ok(None);
    }
    let Some(props) = ami_data.dict_get("op_properties") else {
        return Ok(None);
    };
    let pairs = props.as_list().ok_or_else(|| ImportError::Malformed {
        context: format!("{context}, item '{ami_name}'"),
        message: format!("op_properties must be a list, found {}", props.kind_name()),
    })?;
    Ok(Some(pairs))
}

/// Apply map-level args to a live map.
///
/// # Errors
///
/// Returns an error if `profile` is missing or not a string.
pub fn am_data_from_args(am: &mut ActionMap, args: &Literal) -> Result<(), ImportError> {
    let context = format!("actionmap '{}' args", am.name);
    am.profile = args_str(args, "profile", &context)?.to_string();
    Ok(())
}

/// Apply item-level args to a live item, converting text back to
/// floats, bools, and vectors as the discriminant requires.
///
/// # Errors
///
/// Returns an error if a required key is absent or unconvertible.
pub fn ami_data_from_args(ami: &mut ActionMapItem, args: &Literal) -> Result<(), ImportError> {
    let context = format!("item '{}' args", ami.name);
    let type_tag = args_str(args, "type", &context)?.to_string();
    ami.user_path0 = args_str(args, "user_path0", &context)?.to_string();
    ami.component_path0 = args_str(args, "component_path0", &context)?.to_string();
    ami.user_path1 = args_str(args, "user_path1", &context)?.to_string();
    ami.component_path1 = args_str(args, "component_path1", &context)?.to_string();

    ami.binding = match type_tag.as_str() {
        "BUTTON" | "AXIS" => {
            let threshold = args_f32(args, "threshold", &context)?;
            let op = args_str(args, "op", &context)?.to_string();
            let op_flag = args_str(args, "op_flag", &context)?.to_string();
            if type_tag == "BUTTON" {
                AmiBinding::Button {
                    threshold,
                    op,
                    op_flag,
                }
            } else {
                AmiBinding::Axis {
                    threshold,
                    op,
                    op_flag,
                }
            }
        }
        "POSE" => AmiBinding::Pose {
            is_controller: args_bool(args, "pose_is_controller", &context)?,
            location: args_vec3(args, "pose_location", &context)?,
            rotation: args_vec3(args, "pose_rotation", &context)?,
        },
        "HAPTIC" => AmiBinding::Haptic {
            duration: args_f32(args, "haptic_duration", &context)?,
            frequency: args_f32(args, "haptic_frequency", &context)?,
            amplitude: args_f32(args, "haptic_amplitude", &context)?,
        },
        other => AmiBinding::Other(other.to_string()),
    };
    Ok(())
}

fn args_str<'v>(args: &'v Literal, key: &'static str, context: &str) -> Result<&'v str, ImportError> {
    let value = args.dict_get(key).ok_or(ImportError::MissingField {
        key,
        context: context.to_string(),
    })?;
    value.as_str().ok_or_else(|| ImportError::InvalidField {
        key,
        context: context.to_string(),
        message: format!("expected a string, found {}", value.kind_name()),
    })
}

fn args_f32(args: &Literal, key: &'static str, context: &str) -> Result<f32, ImportError> {
    let text = args_str(args, key, context)?;
    text.trim()
        .parse::<f32>()
        .map_err(|err| ImportError::InvalidField {
            key,
            context: context.to_string(),
            message: err.to_string(),
        })
}

fn args_bool(args: &Literal, key: &'static str, context: &str) -> Result<bool, ImportError> {
    let text = args_str(args, key, context)?;
    match text.trim() {
        "True" | "1" => Ok(true),
        "False" | "0" => Ok(false),
        other => Err(ImportError::InvalidField {
            key,
            context: context.to_string(),
            message: format!("expected 'True' or 'False', found '{other}'"),
        }),
    }
}

/// Parse a `"(x, y, z)"`-style vector string, tolerating surrounding
/// parentheses and whitespace.
fn args_vec3(args: &Literal, key: &'static str, context: &str) -> Result<[f32; 3], ImportError> {
    let text = args_str(args, key, context)?;
    let inner = text.trim().trim_matches(['(', ')']);
    let components: Vec<f32> = inner
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|err| ImportError::InvalidField {
            key,
            context: context.to_string(),
            message: err.to_string(),
        })?;
    let [x, y, z] = components[..] else {
        return Err(ImportError::InvalidField {
            key,
            context: context.to_string(),
            message: format!("expected 3 components, found {}", components.len()),
        });
    };
    Ok([x, y, z])
}

fn literal_to_property_value(value: &Literal) -> Option<PropertyValue> {
    match value {
        Literal::Str(text) => Some(PropertyValue::Str(text.clone())),
        Literal::Bool(flag) => Some(PropertyValue::Bool(*flag)),
        Literal::Int(number) => Some(PropertyValue::Int(*number)),
        Literal::Float(number) => Some(PropertyValue::Float(crate::float::round_f32(*number))),
        Literal::Set(items) => items
            .iter()
            .map(|item| item.as_str().map(ToString::to_string))
            .collect::<Option<Vec<_>>>()
            .map(PropertyValue::Set),
        Literal::Tuple(items) => items
            .iter()
            .map(|item| match item {
                Literal::Tuple(_) | Literal::List(_) | Literal::Set(_) | Literal::Dict(_) => None,
                scalar => literal_to_property_value(scalar),
            })
            .collect::<Option<Vec<_>>>()
            .map(PropertyValue::Seq),
        _ => None,
    }
}

/// Assign one `(attr, value)` pair into a property group, recursing
/// into subgroups for nested pair lists. Never fails: problems are
/// recorded as warnings and the remaining pairs still apply.
fn ami_props_setattr(
    props: &mut PropertyGroup,
    attr: &Literal,
    value: &Literal,
    path: &str,
    report: &mut ImportReport,
) {
    let Some(attr_name) = attr.as_str() else {
        let warning = ImportWarning::malformed(
            path,
            format!("property name must be a string, found {}", attr.kind_name()),
        );
        tracing::warn!("{warning}");
        report.warnings.push(warning);
        return;
    };
    let sub_path = format!("{path}/{attr_name}");

    if let Some(pairs) = value.as_list() {
        match props.group_mut(attr_name) {
            Ok(subgroup) => {
                for pair in pairs {
                    match pair.as_sequence() {
                        Some([sub_attr, sub_value]) => {
                            ami_props_setattr(subgroup, sub_attr, sub_value, &sub_path, report);
                        }
                        _ => {
                            let warning = ImportWarning::malformed(
                                &sub_path,
                                "nested property entry is not an (attr, value) pair".to_string(),
                            );
                            tracing::warn!("{warning}");
                            report.warnings.push(warning);
                        }
                    }
                }
            }
            Err(PropertyError::Unknown { .. }) => {
                let warning = ImportWarning::unknown_property(
                    &sub_path,
                    format!("property group '{attr_name}' not found"),
                );
                tracing::warn!("{warning}");
                report.warnings.push(warning);
            }
            Err(err) => {
                let warning = ImportWarning::bad_value(&sub_path, err.to_string());
                tracing::warn!("{warning}");
                report.warnings.push(warning);
            }
        }
        return;
    }

    let Some(property_value) = literal_to_property_value(value) else {
        let warning = ImportWarning::bad_value(
            &sub_path,
            format!("unsupported value kind {}", value.kind_name()),
        );
        tracing::warn!("{warning}");
        report.warnings.push(warning);
        return;
    };

    match props.set(attr_name, property_value) {
        Ok(()) => {}
        Err(PropertyError::Unknown { .. }) => {
            let warning = ImportWarning::unknown_property(
                &sub_path,
                format!("property '{attr_name}' not found in actionmap item"),
            );
            tracing::warn!("{warning}");
            report.warnings.push(warning);
        }
        Err(err) => {
            let warning = ImportWarning::bad_value(&sub_path, err.to_string());
            tracing::warn!("{warning}");
            report.warnings.push(warning);
        }
    }
}
