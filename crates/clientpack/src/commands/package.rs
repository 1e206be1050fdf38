//! Package command: bump, manifest, diff and zip.

use anyhow::{Context, Result};
use clientpack_config::Project;
use clientpack_core::{Bump, Pipeline, PipelineOptions, PipelineReport};

/// Runs the packaging pipeline and prints its progress.
pub fn run(project: &Project, bump: Option<&str>, dry_run: bool) -> Result<PipelineReport> {
    let bump = bump.map(str::trim).filter(|mode| !mode.is_empty()).map(|mode| {
        let Ok(bump) = mode.parse::<Bump>();
        bump
    });

    let pipeline = Pipeline::from_project(project);
    let options = PipelineOptions { bump, dry_run };
    let report = pipeline.run(&options).context("packaging failed")?;

    print_report(&report, dry_run);
    Ok(report)
}

fn print_report(report: &PipelineReport, dry_run: bool) {
    if report.bumped() {
        println!(
            "Version bumped: {} -> {}",
            report.previous_version, report.version
        );
    }
    println!("Generating manifest for version: {}", report.version);

    if dry_run {
        println!("  Would update {}", report.manifest_path.display());
    } else {
        println!("Manifest updated: {}", report.manifest_path.display());
    }

    let removed = report.changeset.removed();
    if !removed.is_empty() {
        println!("Removed since last build ({}):", removed.len());
        for path in removed {
            println!("  - {path}");
        }
    }

    if report.changeset.is_empty() {
        println!("No file changes detected, skipping zip creation.");
        return;
    }

    if dry_run {
        println!(
            "  Would create {} ({} changed files)",
            report.archive_path.display(),
            report.changeset.len()
        );
        for path in report.changeset.changed() {
            println!("  + {path}");
        }
        println!("\nDry run completed. No changes were made.");
        return;
    }

    if let Some(archive) = &report.archive {
        println!(
            "Build created: {} ({} changed files)",
            archive.path.display(),
            archive.written
        );
        for path in &archive.skipped {
            println!("  Skipped vanished file: {path}");
        }
    }
}
