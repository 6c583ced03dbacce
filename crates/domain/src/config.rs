//! Action configurations and the session-level registry.

use crate::map::ActionMap;
use serde::{Deserialize, Serialize};

/// A named, ordered collection of action maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Configuration name, unique within the session.
    pub name: String,
    /// Action maps in creation order.
    pub maps: Vec<ActionMap>,
}

impl ActionConfig {
    /// Create a named, empty configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            maps: Vec::new(),
        }
    }

    /// Append a new named map and return it for initialization.
    pub fn add_map(&mut self, name: impl Into<String>) -> &mut ActionMap {
        let index = self.maps.len();
        self.maps.push(ActionMap::new(name));
        &mut self.maps[index]
    }

    /// Find a map by name.
    #[must_use]
    pub fn find_map(&self, name: &str) -> Option<&ActionMap> {
        self.maps.iter().find(|map| map.name == name)
    }
}

/// The session's set of action configurations.
///
/// Owns every live configuration; imports create entries here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionConfigs {
    configs: Vec<ActionConfig>,
}

impl ActionConfigs {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new named configuration and return it.
    pub fn create(&mut self, name: impl Into<String>) -> &mut ActionConfig {
        let index = self.configs.len();
        self.configs.push(ActionConfig::new(name));
        &mut self.configs[index]
    }

    /// Find a configuration by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ActionConfig> {
        self.configs.iter().find(|config| config.name == name)
    }

    /// Remove a configuration by name, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<ActionConfig> {
        let index = self.configs.iter().position(|config| config.name == name)?;
        Some(self.configs.remove(index))
    }

    /// Iterate the configurations in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionConfig> {
        self.configs.iter()
    }

    /// Number of configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find() {
        let mut configs = ActionConfigs::new();
        configs.create("default_vr");
        assert!(configs.find("default_vr").is_some());
        assert_eq!(configs.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut configs = ActionConfigs::new();
        configs.create("a");
        configs.create("b");
        let removed = configs.remove("a").map(|c| c.name);
        assert_eq!(removed.as_deref(), Some("a"));
        assert!(configs.find("a").is_none());
        assert!(configs.find("b").is_some());
    }

    #[test]
    fn test_add_map_order() {
        let mut config = ActionConfig::new("default_vr");
        config.add_map("controllers");
        config.add_map("gamepad");
        let names: Vec<&str> = config.maps.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["controllers", "gamepad"]);
    }
}
