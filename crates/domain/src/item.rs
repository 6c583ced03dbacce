//! Action-map items: individual input bindings.

use crate::props::PropertyGroup;
use serde::{Deserialize, Serialize};

/// The type-conditional payload of a binding.
///
/// The wire discriminant is an upper-case tag; tags outside the four
/// known kinds carry no extra fields and round-trip as [`Self::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AmiBinding {
    /// A digital button input driving an operator.
    Button {
        /// Press threshold for analog-backed buttons.
        threshold: f32,
        /// Operator identifier invoked by the binding.
        op: String,
        /// Operator invocation flag (e.g. press vs. modal).
        op_flag: String,
    },
    /// An analog axis input driving an operator.
    Axis {
        /// Activation threshold.
        threshold: f32,
        /// Operator identifier invoked by the binding.
        op: String,
        /// Operator invocation flag.
        op_flag: String,
    },
    /// A tracked pose input.
    Pose {
        /// Whether the pose tracks a controller grip.
        is_controller: bool,
        /// Pose location offset.
        location: [f32; 3],
        /// Pose rotation offset (Euler angles).
        rotation: [f32; 3],
    },
    /// A haptic output binding.
    Haptic {
        /// Pulse duration in seconds.
        duration: f32,
        /// Pulse frequency in Hz.
        frequency: f32,
        /// Pulse amplitude in `0.0..=1.0`.
        amplitude: f32,
    },
    /// Any other discriminant; no extra fields.
    Other(String),
}

impl AmiBinding {
    /// The wire discriminant tag for this binding.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Button { .. } => "BUTTON",
            Self::Axis { .. } => "AXIS",
            Self::Pose { .. } => "POSE",
            Self::Haptic { .. } => "HAPTIC",
            Self::Other(tag) => tag,
        }
    }
}

impl Default for AmiBinding {
    fn default() -> Self {
        Self::Button {
            threshold: 0.3,
            op: String::new(),
            op_flag: "PRESS".to_string(),
        }
    }
}

/// One input binding inside an action map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionMapItem {
    /// Binding name, unique within its map.
    pub name: String,
    /// Primary user (device) path.
    pub user_path0: String,
    /// Primary component path on `user_path0`.
    pub component_path0: String,
    /// Secondary user (device) path.
    pub user_path1: String,
    /// Secondary component path on `user_path1`.
    pub component_path1: String,
    /// Type-conditional binding payload.
    pub binding: AmiBinding,
    /// Operator properties the user set on this binding.
    ///
    /// Empty (or fully unset) groups are omitted from exports.
    pub op_properties: PropertyGroup,
}

impl ActionMapItem {
    /// Create a named item with default binding payload.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The operator identifier, for kinds that invoke one.
    #[must_use]
    pub fn op(&self) -> Option<&str> {
        match &self.binding {
            AmiBinding::Button { op, .. } | AmiBinding::Axis { op, .. } => Some(op),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(AmiBinding::default().type_tag(), "BUTTON");
        assert_eq!(
            AmiBinding::Haptic {
                duration: 0.5,
                frequency: 60.0,
                amplitude: 1.0
            }
            .type_tag(),
            "HAPTIC"
        );
        assert_eq!(AmiBinding::Other("FLOAT".to_string()).type_tag(), "FLOAT");
    }

    #[test]
    fn test_op_only_for_operator_kinds() {
        let mut item = ActionMapItem::new("teleport");
        assert_eq!(item.op(), Some(""));
        item.binding = AmiBinding::Pose {
            is_controller: true,
            location: [0.0; 3],
            rotation: [0.0; 3],
        };
        assert_eq!(item.op(), None);
    }
}
