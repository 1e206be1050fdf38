//! Configuration schema.

use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Product identity.
    #[serde(default)]
    pub product: ProductConfig,

    /// Manifest configuration.
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// Version configuration.
    #[serde(default)]
    pub version: VersionConfig,

    /// Archive configuration.
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// GitHub release configuration.
    #[serde(default)]
    pub github: GithubConfig,
}

/// Product identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Short name, used in archive file names.
    #[serde(default = "default_product_name")]
    pub name: String,

    /// Human-readable name, used in release titles.
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: default_product_name(),
            display_name: default_display_name(),
        }
    }
}

fn default_product_name() -> String {
    "luker-otclient".to_string()
}

fn default_display_name() -> String {
    "Luker OTClient".to_string()
}

/// Manifest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Manifest output path.
    #[serde(default = "default_manifest_path")]
    pub path: String,

    /// Top-level directories to hash.
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Directory names pruned at any depth.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: default_manifest_path(),
            include: default_include(),
            exclude: default_exclude(),
        }
    }
}

fn default_manifest_path() -> String {
    "updater/manifest.json".to_string()
}

fn default_include() -> Vec<String> {
    ["bin", "data", "assets", "conf", "storeimages"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_exclude() -> Vec<String> {
    [
        "minimap",
        "screenshots",
        "logs",
        ".git",
        "updater",
        "__pycache__",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Version configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionConfig {
    /// Plain-text version file.
    #[serde(default = "default_version_path")]
    pub path: String,

    /// Tag prefix (e.g., "v").
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            path: default_version_path(),
            tag_prefix: default_tag_prefix(),
        }
    }
}

fn default_version_path() -> String {
    "updater/version.txt".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

/// Archive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Directory that receives the zip builds.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "updater/builds".to_string()
}

/// GitHub release configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Target repository as `owner/name`.
    #[serde(default = "default_repository")]
    pub repository: String,

    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Create release as draft.
    #[serde(default)]
    pub draft: bool,

    /// Mark release as prerelease.
    #[serde(default)]
    pub prerelease: bool,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            api_url: default_api_url(),
            token_env: default_token_env(),
            draft: false,
            prerelease: false,
        }
    }
}

fn default_repository() -> String {
    "luker-development/luker-otclient".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}
