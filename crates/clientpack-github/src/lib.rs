//! GitHub Release publisher.
//!
//! Publishing is a single operation that creates a release and uploads one
//! archive to it. The outcome distinguishes a complete publish from a
//! release that was created but is missing its asset.

mod api;
mod error;
mod publisher;

pub use api::{
    CreatedRelease, GithubApi, NewRelease, ReleaseApi, UploadedAsset, strip_url_template,
};
pub use error::{PublishError, PublishResult};
pub use publisher::{PublishOutcome, ReleasePublisher};
