//! Configuration management for clientpack.
//!
//! This crate handles loading and validating the `clientpack.toml` file and
//! resolving the project root that every configured path is relative to.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, Project, find_config_from, load_config, load_project};
pub use schema::{
    ArchiveConfig, Config, GithubConfig, ManifestConfig, ProductConfig, VersionConfig,
};
