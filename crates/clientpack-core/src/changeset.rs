//! Manifest diffing.

use crate::{Manifest, ManifestIndex};

/// Files that differ between the previous and the new manifest.
///
/// Only added and modified paths are shipped. Paths that disappeared are
/// reported through [`Changeset::removed`] but never affect the changed list
/// or the archive; clients drop them by comparing against the new manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    changed: Vec<String>,
    removed: Vec<String>,
}

impl Changeset {
    /// Diffs a new manifest against the previous index.
    ///
    /// A path is changed iff its hash is absent from or differs from the
    /// previous index. Changed paths keep manifest order.
    #[must_use]
    pub fn compute(previous: &ManifestIndex, current: &Manifest) -> Self {
        let changed = current
            .files
            .iter()
            .filter(|entry| previous.get(&entry.path) != Some(entry.hash.as_str()))
            .map(|entry| entry.path.clone())
            .collect();

        let current_index = current.index();
        let removed = previous
            .paths()
            .filter(|path| current_index.get(path).is_none())
            .map(str::to_string)
            .collect();

        Self { changed, removed }
    }

    /// Added or modified paths.
    #[must_use]
    pub fn changed(&self) -> &[String] {
        &self.changed
    }

    /// Paths listed previously but no longer present.
    #[must_use]
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    /// Returns `true` when nothing needs to be packaged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Number of paths to package.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changed.len()
    }
}
