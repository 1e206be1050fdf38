//! Core library for clientpack.
//!
//! This crate provides the packaging pipeline: version bumping, manifest
//! generation, manifest diffing and zip packaging of changed files.

mod archive;
mod changeset;
mod error;
mod manifest;
mod pipeline;
mod store;
mod version;

pub use archive::{ArchivePackager, PackagedArchive};
pub use changeset::Changeset;
pub use error::{CoreError, CoreResult};
pub use manifest::{Manifest, ManifestBuilder, ManifestEntry, ManifestIndex, hash_file};
pub use pipeline::{Pipeline, PipelineOptions, PipelineReport};
pub use store::{ReleaseStore, StoreLayout};
pub use version::{Bump, DEFAULT_VERSION, ReleaseVersion, VersionManager};
