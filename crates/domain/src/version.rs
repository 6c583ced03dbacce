//! File-format version triples.
//!
//! Exported artifacts carry the host application's file version at
//! export time. The file version includes a patch component that can
//! be bumped several times between releases, which is why it is
//! stamped instead of the release version.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A `(major, minor, patch)` file-format version.
///
/// Ordering is lexicographic over the three components, so version
/// comparisons behave like the tuple comparisons the text format
/// embeds in its bootstrap footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileVersion {
    /// Major version component.
    pub major: u32,
    /// Minor version component.
    pub minor: u32,
    /// Patch (sub-version) component.
    pub patch: u32,
}

impl FileVersion {
    /// The "epoch zero" sentinel.
    ///
    /// Data imported without an accompanying version stamp is treated
    /// as this oldest known schema, which forces migration.
    pub const EPOCH: Self = Self::new(0, 0, 0);

    /// Create a version from its three components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version from a `(major, minor, patch)` component list.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly three components are given.
    pub fn from_components(components: &[i64]) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidVersion(format!("{components:?}"));
        let &[major, minor, patch] = components else {
            return Err(invalid());
        };
        let major = u32::try_from(major).map_err(|_| invalid())?;
        let minor = u32::try_from(minor).map_err(|_| invalid())?;
        let patch = u32::try_from(patch).map_err(|_| invalid())?;
        Ok(Self::new(major, minor, patch))
    }
}

impl std::fmt::Display for FileVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_tuple_form() {
        assert_eq!(FileVersion::new(3, 0, 22).to_string(), "(3, 0, 22)");
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(FileVersion::new(2, 93, 7) < FileVersion::new(3, 0, 0));
        assert!(FileVersion::new(3, 0, 0) < FileVersion::new(3, 0, 22));
        assert!(FileVersion::EPOCH < FileVersion::new(0, 0, 1));
    }

    #[test]
    fn test_from_components() {
        let version = FileVersion::from_components(&[3, 0, 22]).expect("valid triple");
        assert_eq!(version, FileVersion::new(3, 0, 22));
        assert!(FileVersion::from_components(&[3, 0]).is_err());
        assert!(FileVersion::from_components(&[-1, 0, 0]).is_err());
    }
}
