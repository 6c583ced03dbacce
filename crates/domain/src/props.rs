//! Operator property trees.
//!
//! A binding that invokes a host operator can carry a tree of operator
//! properties: named leaf values plus nested property groups. The tree
//! is an explicit, ordered reflection table; there is no runtime
//! introspection. Each leaf tracks whether the user explicitly set it,
//! which is what the exporter uses to keep artifacts minimal: only
//! set leaves are written, and a subtree is written only if it
//! transitively contains at least one set leaf.
//!
//! Groups come in two flavors. A *sealed* group is a declared operator
//! schema: assigning an unknown name or a value of the wrong kind is
//! rejected (the importer downgrades those rejections to warnings). An
//! *open* group accepts new leaves on assignment, which is how hosts
//! build schemas up front.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when assigning into a property group.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// No property with the given name exists in a sealed group.
    #[error("property '{name}' not found")]
    Unknown {
        /// The offending property name.
        name: String,
    },

    /// The assigned value's kind does not match the declared kind.
    #[error("property '{name}' expects {expected}, got {found}")]
    KindMismatch {
        /// The property name.
        name: String,
        /// The declared kind.
        expected: PropertyKind,
        /// The kind of the rejected value.
        found: PropertyKind,
    },

    /// The name refers to a nested group, not a leaf value.
    #[error("property '{name}' is a nested group, not a value")]
    NotALeaf {
        /// The property name.
        name: String,
    },

    /// The name refers to a leaf value, not a nested group.
    #[error("property '{name}' is a value, not a nested group")]
    NotAGroup {
        /// The property name.
        name: String,
    },
}

/// The kind of a leaf property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// String value.
    Str,
    /// Boolean value.
    Bool,
    /// Integer value.
    Int,
    /// 32-bit float value.
    Float,
    /// Set of enum-flag identifiers.
    Set,
    /// Sequence of scalar values.
    Seq,
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Str => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Set => "set",
            Self::Seq => "sequence",
        };
        write!(f, "{name}")
    }
}

/// A leaf property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// String value.
    Str(String),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// 32-bit float value.
    Float(f32),
    /// Set of enum-flag identifiers.
    Set(Vec<String>),
    /// Sequence of scalar values (e.g. a float vector).
    Seq(Vec<PropertyValue>),
}

impl PropertyValue {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        match self {
            Self::Str(_) => PropertyKind::Str,
            Self::Bool(_) => PropertyKind::Bool,
            Self::Int(_) => PropertyKind::Int,
            Self::Float(_) => PropertyKind::Float,
            Self::Set(_) => PropertyKind::Set,
            Self::Seq(_) => PropertyKind::Seq,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

/// What a named entry holds: a leaf value or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertySlot {
    /// A leaf value with its explicitly-user-set marker.
    Value {
        /// The current value (default until set).
        value: PropertyValue,
        /// Whether the user explicitly assigned this leaf.
        is_set: bool,
    },
    /// A nested property group.
    Group(PropertyGroup),
}

/// One named entry of a property group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    name: String,
    slot: PropertySlot,
}

impl PropertyEntry {
    /// The property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry's slot.
    #[must_use]
    pub const fn slot(&self) -> &PropertySlot {
        &self.slot
    }
}

/// An ordered collection of named properties and nested groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyGroup {
    entries: Vec<PropertyEntry>,
    sealed: bool,
}

impl PropertyGroup {
    /// Create an empty open group (accepts new leaves on assignment).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sealed group (rejects unknown names).
    #[must_use]
    pub const fn sealed() -> Self {
        Self {
            entries: Vec::new(),
            sealed: true,
        }
    }

    /// Whether this group rejects unknown property names.
    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Declare a leaf property with its default value, not user-set.
    ///
    /// Re-declaring a name replaces the previous entry in place.
    pub fn define(&mut self, name: impl Into<String>, default: PropertyValue) -> &mut Self {
        let name = name.into();
        let slot = PropertySlot::Value {
            value: default,
            is_set: false,
        };
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.slot = slot;
        } else {
            self.entries.push(PropertyEntry { name, slot });
        }
        self
    }

    /// Declare a nested group; fetch it with [`Self::group_mut`] to
    /// populate it. The child inherits this group's sealed flag.
    pub fn define_group(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        let group = if self.sealed {
            Self::sealed()
        } else {
            Self::new()
        };
        let slot = PropertySlot::Group(group);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.slot = slot;
        } else {
            self.entries.push(PropertyEntry { name, slot });
        }
        self
    }

    /// Assign a leaf value and mark it explicitly set.
    ///
    /// Open groups create a new leaf for unknown names; sealed groups
    /// reject them.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names in sealed groups, for kind
    /// mismatches against the declared default, and for names that
    /// refer to nested groups.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: PropertyValue,
    ) -> Result<(), PropertyError> {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            match &mut entry.slot {
                PropertySlot::Value {
                    value: current,
                    is_set,
                } => {
                    if current.kind() != value.kind() {
                        return Err(PropertyError::KindMismatch {
                            name,
                            expected: current.kind(),
                            found: value.kind(),
                        });
                    }
                    *current = value;
                    *is_set = true;
                    Ok(())
                }
                PropertySlot::Group(_) => Err(PropertyError::NotALeaf { name }),
            }
        } else if self.sealed {
            Err(PropertyError::Unknown { name })
        } else {
            self.entries.push(PropertyEntry {
                name,
                slot: PropertySlot::Value {
                    value,
                    is_set: true,
                },
            });
            Ok(())
        }
    }

    /// Look up a leaf value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.iter().find_map(|e| match &e.slot {
            PropertySlot::Value { value, .. } if e.name == name => Some(value),
            _ => None,
        })
    }

    /// Whether the named leaf was explicitly set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.entries.iter().any(|e| {
            e.name == name
                && matches!(e.slot, PropertySlot::Value { is_set: true, .. })
        })
    }

    /// Look up a nested group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Self> {
        self.entries.iter().find_map(|e| match &e.slot {
            PropertySlot::Group(group) if e.name == name => Some(group),
            _ => None,
        })
    }

    /// Look up a nested group by name, mutably.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or refers to a leaf.
    pub fn group_mut(&mut self, name: &str) -> Result<&mut Self, PropertyError> {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => match &mut entry.slot {
                PropertySlot::Group(group) => Ok(group),
                PropertySlot::Value { .. } => Err(PropertyError::NotAGroup {
                    name: name.to_string(),
                }),
            },
            None => Err(PropertyError::Unknown {
                name: name.to_string(),
            }),
        }
    }

    /// Iterate the entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &PropertyEntry> {
        self.entries.iter()
    }

    /// Number of entries (leaves and groups) at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this group has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any leaf is explicitly set, here or in any subtree.
    #[must_use]
    pub fn has_set_values(&self) -> bool {
        self.entries.iter().any(|e| match &e.slot {
            PropertySlot::Value { is_set, .. } => *is_set,
            PropertySlot::Group(group) => group.has_set_values(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_schema() -> PropertyGroup {
        let mut props = PropertyGroup::sealed();
        props.define("value", PropertyValue::Float(0.0));
        props.define("use_snap", PropertyValue::Bool(false));
        props.define_group("constraint_axis");
        if let Ok(axis) = props.group_mut("constraint_axis") {
            axis.define("x", PropertyValue::Bool(false));
        }
        props
    }

    #[test]
    fn test_set_marks_explicit() {
        let mut props = sample_schema();
        assert!(!props.is_set("value"));
        props.set("value", PropertyValue::Float(0.5)).expect("declared leaf");
        assert!(props.is_set("value"));
        assert_eq!(props.get("value"), Some(&PropertyValue::Float(0.5)));
    }

    #[test]
    fn test_sealed_rejects_unknown() {
        let mut props = sample_schema();
        let err = props
            .set("no_such", PropertyValue::Bool(true))
            .expect_err("sealed group");
        assert_eq!(
            err,
            PropertyError::Unknown {
                name: "no_such".to_string()
            }
        );
    }

    #[test]
    fn test_sealed_rejects_kind_mismatch() {
        let mut props = sample_schema();
        let err = props
            .set("use_snap", PropertyValue::Int(1))
            .expect_err("bool leaf");
        assert!(matches!(err, PropertyError::KindMismatch { .. }));
    }

    #[test]
    fn test_open_group_grows_on_set() {
        let mut props = PropertyGroup::new();
        props.set("mode", PropertyValue::from("TRANSLATE")).expect("open group");
        assert!(props.is_set("mode"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_has_set_values_is_transitive() {
        let mut props = sample_schema();
        assert!(!props.has_set_values());
        props
            .group_mut("constraint_axis")
            .expect("declared group")
            .set("x", PropertyValue::Bool(true))
            .expect("declared leaf");
        assert!(props.has_set_values());
    }

    #[test]
    fn test_group_mut_on_leaf_fails() {
        let mut props = sample_schema();
        let err = props.group_mut("value").expect_err("leaf, not group");
        assert!(matches!(err, PropertyError::NotAGroup { .. }));
    }
}
