//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while building or mutating
/// an action configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A version triple could not be parsed from its textual form.
    #[error("invalid file version: {0}")]
    InvalidVersion(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
