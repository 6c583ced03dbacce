//! Action maps: named input-mapping contexts.

use crate::item::ActionMapItem;
use serde::{Deserialize, Serialize};

/// A named collection of input bindings for one interaction profile.
///
/// Item order is binding precedence and is preserved exactly across
/// serialization; items are an ordered sequence, never a set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionMap {
    /// Map name, unique within its config.
    pub name: String,
    /// OpenXR-style interaction profile identifier.
    pub profile: String,
    /// Bindings in precedence order.
    pub items: Vec<ActionMapItem>,
    /// Whether the user changed this map from its defaults.
    ///
    /// Exports can be restricted to user-modified maps.
    pub user_modified: bool,
}

impl ActionMap {
    /// Create a named, empty map.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a new named item and return it for initialization.
    pub fn add_item(&mut self, name: impl Into<String>) -> &mut ActionMapItem {
        let index = self.items.len();
        self.items.push(ActionMapItem::new(name));
        &mut self.items[index]
    }

    /// Find an item by name.
    #[must_use]
    pub fn find_item(&self, name: &str) -> Option<&ActionMapItem> {
        self.items.iter().find(|item| item.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_preserves_order() {
        let mut map = ActionMap::new("gamepad");
        map.add_item("b");
        map.add_item("a");
        map.add_item("c");
        let names: Vec<&str> = map.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_find_item() {
        let mut map = ActionMap::new("gamepad");
        map.add_item("teleport");
        assert!(map.find_item("teleport").is_some());
        assert!(map.find_item("missing").is_none());
    }
}
