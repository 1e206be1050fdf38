//! Manifest generation.
//!
//! A manifest lists every distributed file with its SHA-1 content hash.
//! Paths are relative to the project root and always use forward slashes,
//! and entries are sorted by path so that regenerating an unchanged tree
//! yields byte-identical JSON.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{CoreError, CoreResult};

/// Read buffer size used while hashing.
const HASH_CHUNK_SIZE: usize = 8192;

/// A single manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Forward-slash path relative to the project root.
    pub path: String,
    /// Lowercase hex SHA-1 digest.
    pub hash: String,
}

/// Versioned list of distributed files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub files: Vec<ManifestEntry>,
}

impl Manifest {
    /// Returns the path-to-hash index of this manifest.
    #[must_use]
    pub fn index(&self) -> ManifestIndex {
        self.files
            .iter()
            .map(|entry| (entry.path.clone(), entry.hash.clone()))
            .collect()
    }

    /// Serializes the manifest as pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CoreResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Parses a manifest from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the manifest schema.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the manifest, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Path-to-hash mapping of a previous manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestIndex(BTreeMap<String, String>);

impl ManifestIndex {
    /// Returns the recorded hash for a path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    /// Returns the indexed paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ManifestIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Computes the lowercase hex SHA-1 of a file, streaming in 8 KiB chunks.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; HASH_CHUNK_SIZE];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Walks the include directories and hashes every distributed file.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    root: PathBuf,
    include: Vec<String>,
    exclude: HashSet<String>,
}

impl ManifestBuilder {
    /// Creates a builder rooted at the given directory with no include dirs.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include: Vec::new(),
            exclude: HashSet::new(),
        }
    }

    /// Sets the top-level directories to traverse.
    #[must_use]
    pub fn with_include<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the directory names pruned at any depth.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collects the manifest paths of all distributed files, sorted and
    /// deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be traversed.
    pub fn collect_paths(&self) -> CoreResult<Vec<String>> {
        let mut paths = Vec::new();

        for dir in &self.include {
            let base = self.root.join(dir);
            if !base.is_dir() {
                debug!(dir = %dir, "include directory missing, skipping");
                continue;
            }

            let walker = WalkDir::new(&base)
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || !self.is_pruned(entry));

            for entry in walker {
                let entry = entry?;
                if entry.file_type().is_dir() || is_dotfile(entry.file_name()) {
                    continue;
                }
                if !entry.path().is_file() {
                    debug!(path = ?entry.path(), "skipping non-regular file");
                    continue;
                }
                if let Some(path) = self.manifest_path(entry.path()) {
                    paths.push(path);
                }
            }
        }

        paths.sort();
        paths.dedup();
        Ok(paths)
    }

    /// Builds the manifest for the given version.
    ///
    /// # Errors
    ///
    /// Returns an error if traversal fails or a file cannot be hashed.
    pub fn build(&self, version: &str) -> CoreResult<Manifest> {
        let paths = self.collect_paths()?;
        info!(version, files = paths.len(), "generating manifest");

        let files = paths
            .into_iter()
            .map(|path| {
                let full = self.root.join(&path);
                let hash = hash_file(&full).map_err(|source| CoreError::Hash {
                    path: full.clone(),
                    source,
                })?;
                Ok(ManifestEntry { path, hash })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Manifest {
            version: version.to_string(),
            files,
        })
    }

    fn is_pruned(&self, entry: &walkdir::DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.exclude.contains(name))
    }

    fn manifest_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(parts.join("/"))
    }
}

fn is_dotfile(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn builder(root: &Path) -> ManifestBuilder {
        ManifestBuilder::new(root)
            .with_include(["bin", "data", "assets"])
            .with_exclude(["logs", "minimap", ".git", "updater"])
    }

    fn sample_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "bin/client.exe", "binary");
        write(root, "data/things/items.otb", "items");
        write(root, "data/things/sprites.spr", "sprites");
        write(root, "assets/ui/skin.png", "png");
        write(root, "notes.txt", "outside include dirs");
        temp_dir
    }

    #[test]
    fn test_hash_file_known_digest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abc.txt");
        fs::write(&path, "abc").unwrap();

        assert_eq!(
            hash_file(&path).unwrap(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_hash_file_larger_than_chunk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.bin");
        let data = vec![7u8; HASH_CHUNK_SIZE * 3 + 11];
        fs::write(&path, &data).unwrap();

        let expected = format!("{:x}", Sha1::digest(&data));
        assert_eq!(hash_file(&path).unwrap(), expected);
    }

    #[test]
    fn test_build_sorted_forward_slash_paths() {
        let temp_dir = sample_tree();
        let manifest = builder(temp_dir.path()).build("1.0.0").unwrap();

        let paths: Vec<_> = manifest.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "assets/ui/skin.png",
                "bin/client.exe",
                "data/things/items.otb",
                "data/things/sprites.spr",
            ]
        );
        assert_eq!(manifest.version, "1.0.0");
        assert!(manifest.files.iter().all(|f| f.hash.len() == 40));
    }

    #[test]
    fn test_excluded_dirs_pruned_at_any_depth() {
        let temp_dir = sample_tree();
        let root = temp_dir.path();
        write(root, "bin/logs/today.log", "log");
        write(root, "data/deep/nested/logs/old.log", "log");
        write(root, "data/minimap/map.png", "map");
        write(root, "data/logsbook/kept.txt", "not excluded");

        let manifest = builder(root).build("1.0.0").unwrap();

        assert!(
            manifest
                .files
                .iter()
                .all(|f| !f.path.split('/').any(|part| part == "logs" || part == "minimap"))
        );
        assert!(
            manifest
                .files
                .iter()
                .any(|f| f.path == "data/logsbook/kept.txt")
        );
    }

    #[test]
    fn test_dotfiles_skipped_at_every_level() {
        let temp_dir = sample_tree();
        let root = temp_dir.path();
        write(root, "bin/.DS_Store", "x");
        write(root, "data/things/.hidden.otb", "x");
        write(root, "assets/.gitkeep", "");

        let manifest = builder(root).build("1.0.0").unwrap();

        assert!(
            manifest
                .files
                .iter()
                .all(|f| !f.path.rsplit('/').next().unwrap().starts_with('.'))
        );
        assert_eq!(manifest.files.len(), 4);
    }

    #[test]
    fn test_missing_include_dir_skipped() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "bin/client.exe", "binary");

        let manifest = builder(temp_dir.path()).build("0.0.1").unwrap();
        assert_eq!(manifest.files.len(), 1);
    }

    #[test]
    fn test_overlapping_include_dirs_deduplicated() {
        let temp_dir = sample_tree();
        let manifest = ManifestBuilder::new(temp_dir.path())
            .with_include(["data", "data/things"])
            .build("1.0.0")
            .unwrap();

        assert_eq!(manifest.files.len(), 2);
    }

    #[test]
    fn test_regenerated_manifest_is_byte_identical() {
        let temp_dir = sample_tree();
        let path = temp_dir.path().join("updater/manifest.json");

        builder(temp_dir.path()).build("1.0.0").unwrap().write(&path).unwrap();
        let first = fs::read(&path).unwrap();

        builder(temp_dir.path()).build("1.0.0").unwrap().write(&path).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_json_schema() {
        let manifest = Manifest {
            version: "1.2.3".to_string(),
            files: vec![ManifestEntry {
                path: "bin/a.dll".to_string(),
                hash: "0".repeat(40),
            }],
        };

        let json = manifest.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], "1.2.3");
        assert_eq!(value["files"][0]["path"], "bin/a.dll");
        assert!(json.starts_with("{\n  \"version\""));
        assert!(json.ends_with("}\n"));

        assert_eq!(Manifest::from_json(&json).unwrap(), manifest);
    }

    #[test]
    fn test_index_discards_order_and_version() {
        let manifest = Manifest {
            version: "2.0.0".to_string(),
            files: vec![
                ManifestEntry {
                    path: "b.txt".to_string(),
                    hash: "H2".to_string(),
                },
                ManifestEntry {
                    path: "a.txt".to_string(),
                    hash: "H1".to_string(),
                },
            ],
        };

        let index = manifest.index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a.txt"), Some("H1"));
        assert_eq!(index.paths().collect::<Vec<_>>(), vec!["a.txt", "b.txt"]);
    }
}
