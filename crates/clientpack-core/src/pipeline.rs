//! Packaging pipeline execution.

use std::path::PathBuf;

use clientpack_config::Project;
use tracing::{debug, info};

use crate::{
    ArchivePackager, Bump, Changeset, CoreResult, Manifest, ManifestBuilder, PackagedArchive,
    ReleaseStore, StoreLayout,
};

/// Options for a single run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Version bump to apply, if any.
    pub bump: Option<Bump>,
    /// Compute everything but write nothing.
    pub dry_run: bool,
}

/// What a run produced.
#[derive(Debug)]
pub struct PipelineReport {
    /// Version before the run.
    pub previous_version: String,
    /// Version after the run.
    pub version: String,
    /// Newly generated manifest.
    pub manifest: Manifest,
    /// Diff against the previous manifest.
    pub changeset: Changeset,
    /// Where the archive was, or in a dry run would have been, written.
    pub archive_path: PathBuf,
    /// Written archive; `None` for an empty changeset or a dry run.
    pub archive: Option<PackagedArchive>,
    /// Manifest file location.
    pub manifest_path: PathBuf,
}

impl PipelineReport {
    /// Returns `true` if the version changed.
    #[must_use]
    pub fn bumped(&self) -> bool {
        self.previous_version != self.version
    }
}

/// Orchestrates bump, manifest, diff, package and persist.
#[derive(Debug, Clone)]
pub struct Pipeline {
    layout: StoreLayout,
    builder: ManifestBuilder,
    packager: ArchivePackager,
    product: String,
}

impl Pipeline {
    /// Creates a pipeline from its parts.
    #[must_use]
    pub fn new(
        layout: StoreLayout,
        builder: ManifestBuilder,
        packager: ArchivePackager,
        product: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            builder,
            packager,
            product: product.into(),
        }
    }

    /// Creates a pipeline from a loaded project configuration.
    #[must_use]
    pub fn from_project(project: &Project) -> Self {
        let config = &project.config;

        let layout = StoreLayout {
            manifest_path: project.resolve(&config.manifest.path),
            version_path: project.resolve(&config.version.path),
        };
        let builder = ManifestBuilder::new(&project.root)
            .with_include(config.manifest.include.iter().cloned())
            .with_exclude(config.manifest.exclude.iter().cloned());
        let packager =
            ArchivePackager::new(&project.root, project.resolve(&config.archive.output_dir));

        Self::new(layout, builder, packager, config.product.name.clone())
    }

    /// Returns the archive file name for a version.
    #[must_use]
    pub fn archive_name(&self, version: &str) -> String {
        format!("{}_{version}.zip", self.product)
    }

    /// Runs the pipeline.
    ///
    /// State is loaded at the start and persisted only after the archive was
    /// written, so a failed run leaves the previous manifest in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be bumped, a file cannot be
    /// hashed, or the archive or state cannot be written.
    pub fn run(&self, options: &PipelineOptions) -> CoreResult<PipelineReport> {
        let store = ReleaseStore::open(self.layout.clone())?;
        let previous_version = store.version().to_string();

        let version = match &options.bump {
            Some(bump) => {
                let next = store.versions().bump(&previous_version, bump)?;
                info!(%bump, previous = %previous_version, next = %next, "version bump");
                next
            }
            None => previous_version.clone(),
        };

        let manifest = self.builder.build(&version)?;
        let changeset = Changeset::compute(store.previous_index(), &manifest);
        info!(
            files = manifest.files.len(),
            changed = changeset.len(),
            removed = changeset.removed().len(),
            "computed changeset"
        );

        let archive_name = self.archive_name(&version);
        let archive_path = self.packager.archive_path(&archive_name);

        let archive = if options.dry_run {
            debug!("dry run, skipping archive and state writes");
            None
        } else {
            let archive = self.packager.package(&changeset, &archive_name)?;
            let bumped_version = options.bump.as_ref().map(|_| version.as_str());
            store.persist(bumped_version, &manifest)?;
            archive
        };

        Ok(PipelineReport {
            previous_version,
            version,
            manifest,
            changeset,
            archive_path,
            archive,
            manifest_path: self.layout.manifest_path.clone(),
        })
    }
}
