//! On-disk release state.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::{CoreResult, Manifest, ManifestIndex, VersionManager};

/// Locations of the persisted release state.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    pub manifest_path: PathBuf,
    pub version_path: PathBuf,
}

/// Version and previous manifest, loaded once at pipeline start and
/// persisted once at pipeline end.
#[derive(Debug)]
pub struct ReleaseStore {
    layout: StoreLayout,
    versions: VersionManager,
    version: String,
    previous: ManifestIndex,
}

impl ReleaseStore {
    /// Loads the persisted state.
    ///
    /// Missing files mean a first run. A manifest that cannot be parsed is
    /// treated as empty so every file gets repackaged.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn open(layout: StoreLayout) -> CoreResult<Self> {
        let versions = VersionManager::new(&layout.version_path);
        let version = versions.read()?;

        let previous = if layout.manifest_path.exists() {
            let json = fs::read_to_string(&layout.manifest_path)?;
            match Manifest::from_json(&json) {
                Ok(manifest) => manifest.index(),
                Err(e) => {
                    warn!(path = ?layout.manifest_path, error = %e, "previous manifest unreadable, treating as empty");
                    ManifestIndex::default()
                }
            }
        } else {
            debug!(path = ?layout.manifest_path, "no previous manifest");
            ManifestIndex::default()
        };

        Ok(Self {
            layout,
            versions,
            version,
            previous,
        })
    }

    /// Version as loaded.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Index of the previous manifest.
    #[must_use]
    pub fn previous_index(&self) -> &ManifestIndex {
        &self.previous
    }

    /// Version manager bound to this store's version file.
    #[must_use]
    pub fn versions(&self) -> &VersionManager {
        &self.versions
    }

    #[must_use]
    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Writes the new state. The manifest is always overwritten; the version
    /// file only when `bumped_version` is given.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    pub fn persist(&self, bumped_version: Option<&str>, manifest: &Manifest) -> CoreResult<()> {
        if let Some(version) = bumped_version {
            self.versions.write(version)?;
        }
        manifest.write(&self.layout.manifest_path)?;
        debug!(path = ?self.layout.manifest_path, "manifest persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManifestEntry;
    use tempfile::TempDir;

    fn layout(temp_dir: &TempDir) -> StoreLayout {
        StoreLayout {
            manifest_path: temp_dir.path().join("updater/manifest.json"),
            version_path: temp_dir.path().join("updater/version.txt"),
        }
    }

    fn manifest(version: &str) -> Manifest {
        Manifest {
            version: version.to_string(),
            files: vec![ManifestEntry {
                path: "bin/client.exe".to_string(),
                hash: "a".repeat(40),
            }],
        }
    }

    #[test]
    fn test_open_first_run() {
        let temp_dir = TempDir::new().unwrap();
        let store = ReleaseStore::open(layout(&temp_dir)).unwrap();

        assert_eq!(store.version(), "0.0.0");
        assert!(store.previous_index().is_empty());
    }

    #[test]
    fn test_persist_then_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let store = ReleaseStore::open(layout(&temp_dir)).unwrap();
        store.persist(Some("0.0.1"), &manifest("0.0.1")).unwrap();

        let reopened = ReleaseStore::open(layout(&temp_dir)).unwrap();
        assert_eq!(reopened.version(), "0.0.1");
        assert_eq!(
            reopened.previous_index().get("bin/client.exe"),
            Some("a".repeat(40).as_str())
        );
    }

    #[test]
    fn test_persist_without_bump_leaves_version_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = ReleaseStore::open(layout(&temp_dir)).unwrap();
        store.persist(None, &manifest("0.0.0")).unwrap();

        assert!(!store.layout().version_path.exists());
        assert!(store.layout().manifest_path.exists());
    }

    #[test]
    fn test_persist_bump_to_same_version_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = ReleaseStore::open(layout(&temp_dir)).unwrap();
        store.persist(Some("0.0.0"), &manifest("0.0.0")).unwrap();

        assert_eq!(
            fs::read_to_string(&store.layout().version_path).unwrap(),
            "0.0.0\n"
        );
    }

    #[test]
    fn test_corrupt_manifest_treated_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let layout = layout(&temp_dir);
        fs::create_dir_all(layout.manifest_path.parent().unwrap()).unwrap();
        fs::write(&layout.manifest_path, "{ not json").unwrap();

        let store = ReleaseStore::open(layout).unwrap();
        assert!(store.previous_index().is_empty());
    }
}
