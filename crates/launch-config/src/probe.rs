//! Storage roots and directory existence probing.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SHARED_SUBDIR;

/// The two locations game content may live under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRoots {
    /// App-private storage (e.g. `Android/data/<package>/files`).
    pub app_private: PathBuf,
    /// Shared storage root; games live in its `xash` subdirectory.
    pub shared: PathBuf,
}

impl StorageRoots {
    pub fn new(app_private: impl Into<PathBuf>, shared: impl Into<PathBuf>) -> Self {
        Self {
            app_private: app_private.into(),
            shared: shared.into(),
        }
    }

    /// Returns the basedir used on shared storage: `<shared>/xash`.
    pub fn shared_basedir(&self) -> PathBuf {
        self.shared.join(SHARED_SUBDIR)
    }

    /// Returns the basedir selected by the storage toggle alone.
    pub fn preferred(&self, use_internal_storage: bool) -> PathBuf {
        if use_internal_storage {
            self.app_private.clone()
        } else {
            self.shared_basedir()
        }
    }
}

/// Answers whether a directory exists.
///
/// An `Err` is treated by callers exactly like `Ok(false)`.
pub trait DirectoryProbe {
    fn is_dir(&self, path: &Path) -> io::Result<bool>;
}

/// Probes the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl DirectoryProbe for FsProbe {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// A fixed set of existing directories.
impl DirectoryProbe for HashSet<PathBuf> {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(self.contains(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_basedir_appends_xash() {
        let roots = StorageRoots::new("/data/app/files", "/storage/emulated/0");
        assert_eq!(
            roots.shared_basedir(),
            PathBuf::from("/storage/emulated/0/xash")
        );
    }

    #[test]
    fn preferred_follows_toggle() {
        let roots = StorageRoots::new("/private", "/shared");
        assert_eq!(roots.preferred(true), PathBuf::from("/private"));
        assert_eq!(roots.preferred(false), PathBuf::from("/shared/xash"));
    }

    #[test]
    fn fs_probe_real_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("valve");
        std::fs::create_dir(&dir).unwrap();
        let file = tmp.path().join("liblist.gam");
        std::fs::write(&file, b"game \"Half-Life\"").unwrap();

        assert!(FsProbe.is_dir(&dir).unwrap());
        assert!(!FsProbe.is_dir(&file).unwrap());
        assert!(!FsProbe.is_dir(&tmp.path().join("missing")).unwrap());
    }

    #[test]
    fn set_probe() {
        let probe: HashSet<PathBuf> = [PathBuf::from("/a/valve")].into_iter().collect();
        assert!(probe.is_dir(Path::new("/a/valve")).unwrap());
        assert!(!probe.is_dir(Path::new("/a/bshift")).unwrap());
    }
}
