//! Zip packaging of changed files.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{Changeset, CoreResult};

/// A written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedArchive {
    /// Location of the zip file.
    pub path: PathBuf,
    /// Number of members written.
    pub written: usize,
    /// Changed paths that no longer existed when packaging.
    pub skipped: Vec<String>,
}

impl PackagedArchive {
    /// Returns the archive file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Writes changed files into a deflate-compressed zip.
#[derive(Debug, Clone)]
pub struct ArchivePackager {
    root: PathBuf,
    output_dir: PathBuf,
}

impl ArchivePackager {
    /// Creates a packager reading from `root` and writing into `output_dir`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Returns where an archive with the given name would be written.
    #[must_use]
    pub fn archive_path(&self, archive_name: &str) -> PathBuf {
        self.output_dir.join(archive_name)
    }

    /// Packages the changeset into `<output_dir>/<archive_name>`.
    ///
    /// Returns `None` without touching the filesystem when the changeset is
    /// empty. Member names are the manifest paths. Files that vanished since
    /// the manifest was built are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be created or a member cannot
    /// be read.
    pub fn package(
        &self,
        changeset: &Changeset,
        archive_name: &str,
    ) -> CoreResult<Option<PackagedArchive>> {
        if changeset.is_empty() {
            debug!("empty changeset, no archive produced");
            return Ok(None);
        }

        fs::create_dir_all(&self.output_dir)?;
        let path = self.archive_path(archive_name);
        let mut zip = ZipWriter::new(BufWriter::new(File::create(&path)?));

        let mut written = 0;
        let mut skipped = Vec::new();

        for member in changeset.changed() {
            if self.add_member(&mut zip, member)? {
                written += 1;
            } else {
                debug!(path = %member, "file vanished before packaging, skipping");
                skipped.push(member.clone());
            }
        }

        let mut out = zip.finish()?;
        io::Write::flush(&mut out)?;
        info!(path = ?path, written, skipped = skipped.len(), "archive written");

        Ok(Some(PackagedArchive {
            path,
            written,
            skipped,
        }))
    }

    /// Adds one member; returns `false` if the source file no longer exists.
    fn add_member<W: io::Write + io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        member: &str,
    ) -> CoreResult<bool> {
        let source = self.root.join(member);
        let mut file = match File::open(&source) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let size = file.metadata()?.len();
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(size >= u64::from(u32::MAX));

        zip.start_file(member, options)?;
        io::copy(&mut file, zip)?;
        Ok(true)
    }
}
