//! CLI commands.

pub mod package;
pub mod publish;

use std::path::Path;

use anyhow::{Context, Result};
use clientpack_config::Project;
use tracing::debug;

/// Loads the project from an explicit config file or the current directory.
pub fn load_project(config: Option<&Path>) -> Result<Project> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let project =
        clientpack_config::load_project(config, &cwd).context("failed to load configuration")?;

    debug!(root = %project.root.display(), source = ?project.source, "loaded project");
    Ok(project)
}
