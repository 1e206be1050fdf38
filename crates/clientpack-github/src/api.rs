//! GitHub releases REST API.

use std::fs::File;
use std::path::Path;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{PublishError, PublishResult};

/// Media type requested from the API.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Release-creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

/// Release as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedRelease {
    /// Zero if the response omitted it; only `upload_url` is needed to go on.
    #[serde(default)]
    pub id: u64,
    /// Upload URL template, e.g. `.../assets{?name,label}`.
    pub upload_url: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Uploaded asset as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedAsset {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

/// Release operations the publisher depends on.
pub trait ReleaseApi {
    /// Creates a release.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    fn create_release(&self, release: &NewRelease) -> PublishResult<CreatedRelease>;

    /// Uploads a file to a release's (already stripped) upload URL.
    ///
    /// # Errors
    ///
    /// Returns an error on IO or transport failure or a non-2xx response.
    fn upload_asset(
        &self,
        upload_url: &str,
        asset_name: &str,
        file: &Path,
    ) -> PublishResult<UploadedAsset>;
}

/// Strips the `{?name,label}` URI template suffix from an upload URL.
#[must_use]
pub fn strip_url_template(upload_url: &str) -> &str {
    upload_url
        .split_once('{')
        .map_or(upload_url, |(base, _)| base)
}

/// Blocking GitHub API client authenticated with a bearer token.
pub struct GithubApi {
    client: Client,
    api_url: String,
    repository: String,
    token: String,
}

impl GithubApi {
    /// Creates a client for `owner/name` on the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository is malformed or the HTTP client
    /// cannot be built.
    pub fn new(
        api_url: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
    ) -> PublishResult<Self> {
        let repository = repository.into();
        if !is_valid_repository(&repository) {
            return Err(PublishError::InvalidRepository(repository));
        }

        let client = Client::builder()
            .user_agent(concat!("clientpack/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            repository,
            token: token.into(),
        })
    }

    /// Creates a client reading the token from the named environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::MissingToken`] if the variable is unset or
    /// empty, or any error from [`GithubApi::new`].
    pub fn from_env(
        api_url: impl Into<String>,
        repository: impl Into<String>,
        token_var: &str,
    ) -> PublishResult<Self> {
        let token = std::env::var(token_var)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| PublishError::MissingToken {
                var: token_var.to_string(),
            })?;

        Self::new(api_url, repository, token)
    }

    /// Returns the releases endpoint of the configured repository.
    #[must_use]
    pub fn releases_url(&self) -> String {
        format!("{}/repos/{}/releases", self.api_url, self.repository)
    }
}

impl ReleaseApi for GithubApi {
    fn create_release(&self, release: &NewRelease) -> PublishResult<CreatedRelease> {
        let url = self.releases_url();
        debug!(%url, tag = %release.tag_name, "creating release");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(release)
            .send()?;

        let response = check(response, |status, body| PublishError::ReleaseRejected {
            status,
            body,
        })?;

        // The release exists from here on, even if the body cannot be read.
        let status = response.status().as_u16();
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| PublishError::ReleaseUnreadable {
            status,
            reason: e.to_string(),
        })
    }

    fn upload_asset(
        &self,
        upload_url: &str,
        asset_name: &str,
        file: &Path,
    ) -> PublishResult<UploadedAsset> {
        debug!(url = %upload_url, asset = %asset_name, "uploading asset");
        let body = File::open(file)?;

        let response = self
            .client
            .post(upload_url)
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(CONTENT_TYPE, "application/zip")
            .query(&[("name", asset_name)])
            .body(body)
            .send()?;

        let response = check(response, |status, body| PublishError::UploadRejected {
            status,
            body,
        })?;
        Ok(response.json()?)
    }
}

/// Passes 2xx responses through and turns anything else into an error
/// carrying the status and body text.
fn check(
    response: Response,
    rejected: impl FnOnce(u16, String) -> PublishError,
) -> PublishResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(rejected(status.as_u16(), body))
}

fn is_valid_repository(repository: &str) -> bool {
    matches!(
        repository.split_once('/'),
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
    )
}
