//! Version migration seam.
//!
//! Migration upgrades parsed data from an older file-format version
//! to the current schema. It runs purely over the [`Literal`] tree,
//! before any live object is created, and is supplied by the host;
//! this crate only defines the seam and the version-gate rules.

use crate::literal::Literal;
use xrbind_domain::FileVersion;

/// A pure transform from older-schema data to current-schema data.
pub trait Migrate {
    /// Upgrade `data`, stamped as `from_version`, to the current
    /// schema. Implementations must not touch live objects.
    fn migrate(&self, data: Literal, from_version: FileVersion) -> Literal;
}

/// Migrator for hosts whose schema never changed: returns data as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMigration;

impl Migrate for NoMigration {
    fn migrate(&self, data: Literal, _from_version: FileVersion) -> Literal {
        data
    }
}

/// Whether data stamped `stamp` needs migration before import.
///
/// `None` means no stamp accompanied the data at this layer, which
/// skips migration entirely; a stamp differing from `current` (older
/// or newer) always migrates. The "epoch zero" default for stampless
/// files is applied by the import entry point, not here.
#[must_use]
pub fn needs_migration(stamp: Option<FileVersion>, current: FileVersion) -> bool {
    stamp.is_some_and(|version| version != current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_version_skips_migration() {
        let current = FileVersion::new(3, 0, 22);
        assert!(!needs_migration(Some(current), current));
        assert!(!needs_migration(None, current));
    }

    #[test]
    fn test_other_versions_migrate() {
        let current = FileVersion::new(3, 0, 22);
        assert!(needs_migration(Some(FileVersion::EPOCH), current));
        assert!(needs_migration(Some(FileVersion::new(3, 0, 21)), current));
        assert!(needs_migration(Some(FileVersion::new(4, 0, 0)), current));
    }

    #[test]
    fn test_no_migration_is_identity() {
        let data = Literal::List(vec![Literal::Int(1)]);
        let out = NoMigration.migrate(data.clone(), FileVersion::EPOCH);
        assert_eq!(out, data);
    }
}
