//! Xrbind Domain - VR action-configuration model
//!
//! This crate defines the live object model for VR controller action
//! configurations: configs, action maps, binding items, and operator
//! property trees. All types here are pure Rust with no I/O
//! dependencies; the `xrbind-codec` crate handles persistence.

pub mod config;
pub mod error;
pub mod item;
pub mod map;
pub mod props;
pub mod version;

pub use config::{ActionConfig, ActionConfigs};
pub use error::{DomainError, DomainResult};
pub use item::{ActionMapItem, AmiBinding};
pub use map::ActionMap;
pub use props::{PropertyEntry, PropertyError, PropertyGroup, PropertyKind, PropertySlot, PropertyValue};
pub use version::FileVersion;
