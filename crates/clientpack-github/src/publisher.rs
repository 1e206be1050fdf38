//! Release publishing.

use std::path::Path;

use tracing::{info, warn};

use crate::{
    CreatedRelease, NewRelease, PublishError, ReleaseApi, UploadedAsset, strip_url_template,
};

/// Result of a publish attempt.
#[derive(Debug)]
pub enum PublishOutcome {
    /// Release created and asset uploaded.
    Published { tag: String, asset: UploadedAsset },

    /// Release created but the upload failed. The release exists remotely
    /// without the archive; callers decide whether to retry the upload or
    /// delete the release.
    ReleaseWithoutAsset {
        tag: String,
        release: CreatedRelease,
        error: PublishError,
    },

    /// No asset was attached. Nothing exists remotely unless the error is
    /// [`PublishError::ReleaseUnreadable`].
    Failed { error: PublishError },
}

impl PublishOutcome {
    /// Returns `true` if the asset was uploaded.
    #[must_use]
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    /// Returns the release tag, if a release was created.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Published { tag, .. } | Self::ReleaseWithoutAsset { tag, .. } => Some(tag),
            Self::Failed { .. } => None,
        }
    }
}

/// Creates a release for a version and attaches the archive to it.
pub struct ReleasePublisher<A> {
    api: A,
    display_name: String,
    tag_prefix: String,
    draft: bool,
    prerelease: bool,
}

impl<A: ReleaseApi> ReleasePublisher<A> {
    /// Creates a publisher; releases are titled `<display_name> v<version>`.
    #[must_use]
    pub fn new(api: A, display_name: impl Into<String>) -> Self {
        Self {
            api,
            display_name: display_name.into(),
            tag_prefix: "v".to_string(),
            draft: false,
            prerelease: false,
        }
    }

    /// Sets the tag prefix.
    #[must_use]
    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = prefix.into();
        self
    }

    /// Creates release as draft.
    #[must_use]
    pub fn with_draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    /// Marks release as prerelease.
    #[must_use]
    pub fn with_prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }

    /// Builds the release-creation payload for a version.
    #[must_use]
    pub fn release_for(&self, version: &str) -> NewRelease {
        NewRelease {
            tag_name: format!("{}{version}", self.tag_prefix),
            name: format!("{} v{version}", self.display_name),
            body: format!("Auto-generated build {version}"),
            draft: self.draft,
            prerelease: self.prerelease,
        }
    }

    /// Creates the release and uploads the archive. Never retries.
    pub fn publish(&self, version: &str, archive: &Path) -> PublishOutcome {
        if !archive.is_file() {
            return PublishOutcome::Failed {
                error: PublishError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("archive not found: {}", archive.display()),
                )),
            };
        }

        let request = self.release_for(version);
        info!(tag = %request.tag_name, "creating GitHub release");

        let release = match self.api.create_release(&request) {
            Ok(release) => release,
            Err(error) => return PublishOutcome::Failed { error },
        };

        let asset_name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let upload_url = strip_url_template(&release.upload_url);
        info!(asset = %asset_name, "uploading release asset");

        match self.api.upload_asset(upload_url, &asset_name, archive) {
            Ok(asset) => PublishOutcome::Published {
                tag: request.tag_name,
                asset,
            },
            Err(error) => {
                warn!(tag = %request.tag_name, %error, "release created without asset");
                PublishOutcome::ReleaseWithoutAsset {
                    tag: request.tag_name,
                    release,
                    error,
                }
            }
        }
    }
}
