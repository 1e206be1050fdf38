//! Publish command: GitHub release with the archive attached.

use clientpack_config::Project;
use clientpack_core::PipelineReport;
use clientpack_github::{GithubApi, PublishOutcome, ReleasePublisher};
use tracing::info;

/// Publishes the archive produced by this run.
///
/// Failures are printed and never abort the process.
pub fn run(project: &Project, report: &PipelineReport, dry_run: bool) {
    let github = &project.config.github;

    if dry_run {
        println!(
            "  Would create release {}{} on {}",
            project.config.version.tag_prefix, report.version, github.repository
        );
        return;
    }

    let Some(archive) = &report.archive else {
        info!("no archive produced, skipping release");
        println!("No build to publish, skipping release.");
        return;
    };

    let api = match GithubApi::from_env(&github.api_url, &github.repository, &github.token_env) {
        Ok(api) => api,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    let publisher = ReleasePublisher::new(api, &project.config.product.display_name)
        .with_tag_prefix(&project.config.version.tag_prefix)
        .with_draft(github.draft)
        .with_prerelease(github.prerelease);

    println!("Creating GitHub release...");
    match publisher.publish(&report.version, &archive.path) {
        PublishOutcome::Published { tag, asset } => {
            println!("Release uploaded successfully: {} ({tag})", asset.name);
        }
        PublishOutcome::ReleaseWithoutAsset { tag, release, error } => {
            println!("{error}");
            println!(
                "Release {tag} was created without its asset: {}",
                release.html_url.as_deref().unwrap_or("no URL returned")
            );
        }
        PublishOutcome::Failed { error } => {
            println!("{error}");
        }
    }
}
