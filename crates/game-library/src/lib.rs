//! Installed game discovery.
//!
//! Scans both storage roots for game directories, reports where the
//! storage toggle points, and offers an opt-in permission normalization
//! for official game directories copied onto shared storage.

mod error;
mod permissions;
mod scan;

pub use error::LibraryError;
pub use permissions::{
    OFFICIAL_GAMEDIRS, PermissionReport, is_official_gamedir, normalize_permissions,
};
pub use scan::{InstalledGame, StorageLocation, list_games, scan_games};

use xash_launch_config::StorageRoots;

/// Describes where games are stored for the current storage toggle.
pub fn storage_summary(roots: &StorageRoots, use_internal_storage: bool) -> String {
    let path = roots.preferred(use_internal_storage);
    let label = if use_internal_storage {
        "Internal Storage"
    } else {
        "External Storage"
    };
    format!("{label}\n{}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_follows_toggle() {
        let roots = StorageRoots::new(
            "/storage/emulated/0/Android/data/su.xash.engine/files",
            "/storage/emulated/0",
        );
        assert_eq!(
            storage_summary(&roots, true),
            "Internal Storage\n/storage/emulated/0/Android/data/su.xash.engine/files"
        );
        assert_eq!(
            storage_summary(&roots, false),
            "External Storage\n/storage/emulated/0/xash"
        );
    }
}
