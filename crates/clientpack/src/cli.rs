//! CLI definition.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::commands;

/// Package changed client files into a versioned update archive.
#[derive(Debug, Parser)]
#[command(name = "clientpack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Bump the version before packaging (major, minor, patch or an explicit version)
    #[arg(long, value_name = "MODE", num_args = 0..=1, default_missing_value = "patch")]
    pub bump: Option<String>,

    /// Publish the archive as a GitHub release
    #[arg(long)]
    pub release: bool,

    /// Compute the changeset without writing or publishing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Runs the packaging steps, then publishes if requested.
    pub fn run(self) -> Result<()> {
        let project = commands::load_project(self.config.as_deref())?;
        let report = commands::package::run(&project, self.bump.as_deref(), self.dry_run)?;

        if self.release {
            commands::publish::run(&project, &report, self.dry_run);
        }

        println!("Done.");
        Ok(())
    }
}
