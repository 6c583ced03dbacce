//! Non-fatal import diagnostics.
//!
//! Problems local to one binding or one property never abort an
//! import; they are recorded here and the rest of the data is still
//! applied. This is what makes hand-edited or version-drifted files
//! recoverable.

use serde::{Deserialize, Serialize};

/// What kind of local failure was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The target object has no property with this name
    /// (schema drift between host versions).
    UnknownProperty,
    /// Assigning the value failed (kind mismatch, bad range).
    BadValue,
    /// A structural oddity that could be worked around.
    Malformed,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProperty => write!(f, "unknown property"),
            Self::BadValue => write!(f, "bad value"),
            Self::Malformed => write!(f, "malformed"),
        }
    }
}

/// One skipped property or binding, with where and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportWarning {
    /// Path to the skipped element, e.g. `"map/item/prop.subprop"`.
    pub path: String,
    /// Human-readable cause.
    pub message: String,
    /// Failure category.
    pub kind: WarningKind,
}

impl ImportWarning {
    /// Record an unknown-property skip.
    pub fn unknown_property(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind: WarningKind::UnknownProperty,
        }
    }

    /// Record a failed assignment skip.
    pub fn bad_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind: WarningKind::BadValue,
        }
    }

    /// Record a tolerated structural oddity.
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind: WarningKind::Malformed,
        }
    }
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path_and_kind() {
        let warning = ImportWarning::unknown_property(
            "controllers/teleport/use_snap",
            "property 'use_snap' not found",
        );
        assert_eq!(
            warning.to_string(),
            "[unknown property] controllers/teleport/use_snap: property 'use_snap' not found"
        );
    }
}
