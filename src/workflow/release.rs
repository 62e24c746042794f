//! Release lifecycle
//!
//! Start cuts `release/{version}` and writes the changelog entry. Finish
//! merges the branch into `develop` and `main`, tags `main`, publishes the
//! GitHub release and removes the branch.

use crate::error::{Error, Result};
use crate::platform::{HostingService, NewPullRequest, RELEASE_LABEL, web_url};
use crate::target::Selector;
use crate::types::{
    BranchKind, DEVELOP_BRANCH, MAIN_BRANCH, ORIGIN, PullRequest, Release, ReleaseKind,
    RepositoryHandle, Version, classify, next_version,
};
use crate::workflow::changelog::{CHANGELOG_FILE, ChangelogEntry, insert_entry, release_notes};
use crate::workflow::WorkflowContext;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Order release pull requests are opened and merged in
pub const RELEASE_PR_BASES: [&str; 2] = [DEVELOP_BRANCH, MAIN_BRANCH];

/// Result of starting a release
#[derive(Debug, Clone)]
pub struct ReleaseStarted {
    /// Repository being released
    pub repo: RepositoryHandle,
    /// Version the release will carry
    pub version: Version,
    /// Release branch created and checked out
    pub branch: String,
    /// Changelog that received the new entry
    pub changelog: PathBuf,
}

/// Result of finishing a release
#[derive(Debug, Clone)]
pub struct ReleaseFinished {
    /// Repository released
    pub repo: RepositoryHandle,
    /// Released version
    pub version: Version,
    /// Merged release pull requests, in merge order
    pub prs: Vec<PullRequest>,
    /// Published release
    pub release: Release,
}

/// `release <target> start`
///
/// `date` is the release date written into the changelog entry.
pub async fn start_release(
    ctx: &mut WorkflowContext<'_>,
    selector: &Selector,
    date: NaiveDate,
) -> Result<ReleaseStarted> {
    let repo = ctx.resolve(selector).await?;

    let latest = ctx.git.latest_tag(&repo.path).await?;
    ctx.progress
        .on_message(&format!(
            "Current version from tag: {}",
            latest.as_deref().unwrap_or("0.0.0")
        ))
        .await;

    let choices = ReleaseKind::ALL.map(ReleaseKind::as_str);
    let choice = ctx
        .prompter
        .select("What type of release is this?", &choices, 0)?;
    let kind = ReleaseKind::ALL
        .get(choice)
        .copied()
        .ok_or_else(|| Error::Internal(format!("release choice {choice} out of range")))?;
    let version = next_version(latest.as_deref(), kind)?;
    ctx.progress
        .on_message(&format!("Next version will be: {version}"))
        .await;

    let branch = version.branch_name();
    ctx.progress
        .on_step(&format!("Creating branch {branch}"))
        .await;
    ctx.git.create_branch(&branch, "HEAD", &repo.path).await?;
    ctx.git.switch_branch(&branch, &repo.path).await?;
    ctx.progress
        .on_step_done(&format!("Switched to new branch {branch}"))
        .await;

    let added = ctx
        .prompter
        .list("Enter 'Added' items (one per line, empty line to finish)")?;
    let changed = ctx
        .prompter
        .list("Enter 'Changed' items (one per line, empty line to finish)")?;
    let fixed = ctx
        .prompter
        .list("Enter 'Fixed' items (one per line, empty line to finish)")?;

    let remote_url = ctx.git.remote_url(ORIGIN, &repo.path).await?;
    let entry = ChangelogEntry {
        version,
        web_url: web_url(&remote_url),
        date,
        added,
        changed,
        fixed,
    };

    ctx.progress.on_step(&format!("Updating {CHANGELOG_FILE}")).await;
    let changelog = ctx.git.workdir(&repo.path).join(CHANGELOG_FILE);
    let existing = if changelog.exists() {
        Some(fs::read_to_string(&changelog)?)
    } else {
        None
    };
    fs::write(&changelog, insert_entry(existing.as_deref(), &entry.render()))?;
    ctx.progress
        .on_step_done(&format!("Updated {CHANGELOG_FILE}"))
        .await;

    info!("Started release {version} in {}", repo.path);
    ctx.remember(&repo)?;
    Ok(ReleaseStarted {
        repo,
        version,
        branch,
        changelog,
    })
}

/// `release <target> finish`
#[allow(clippy::too_many_lines)]
pub async fn finish_release(
    ctx: &mut WorkflowContext<'_>,
    platform: &dyn HostingService,
    selector: &Selector,
) -> Result<ReleaseFinished> {
    let repo = ctx.resolve(selector).await?;
    let branch = ctx.git.current_branch(&repo.path).await?;
    let BranchKind::Release { version: raw } = classify(&branch) else {
        return Err(Error::NotOnReleaseBranch(branch));
    };
    let version = Version::parse(&raw).map_err(|_| Error::InvalidReleaseBranch(branch.clone()))?;
    let tag = version.tag_name();

    let remote = platform.get_repo(&repo.remote_name).await?;
    let label = platform.get_or_create_label(&remote, RELEASE_LABEL).await?;

    ctx.progress
        .on_step(&format!("Pushing {branch} to origin"))
        .await;
    ctx.git.push_branch(&branch, true, &repo.path).await?;
    ctx.progress.on_step_done(&format!("Pushed {branch}")).await;

    let title = format!("Release {tag}");
    let body = format!("Release branch for version {version}");
    let mut prs = Vec::with_capacity(RELEASE_PR_BASES.len());
    for base in RELEASE_PR_BASES {
        ctx.progress
            .on_step(&format!("Creating and merging pull request into {base}"))
            .await;
        let pr = platform
            .create_pr(&remote, &NewPullRequest {
                title: &title,
                body: &body,
                head: &branch,
                base,
                labels: vec![label.name.clone()],
            })
            .await?;
        platform.merge_pr(&remote, &pr).await?;
        ctx.progress
            .on_step_done(&format!("Merged pull request #{} into {base}", pr.number))
            .await;
        ctx.progress.on_pr_merged(&pr).await;
        prs.push(pr);
    }

    ctx.progress.on_step(&format!("Tagging {tag}")).await;
    ctx.git.switch_branch(MAIN_BRANCH, &repo.path).await?;
    ctx.git.pull(MAIN_BRANCH, &repo.path).await?;
    ctx.git
        .create_tag(&tag, &format!("Release {version}"), &repo.path)
        .await?;
    ctx.git.push_tags(&repo.path).await?;
    ctx.progress
        .on_step_done(&format!("Created and pushed tag {tag}"))
        .await;

    let previous = ctx
        .git
        .list_tags(&repo.path)
        .await?
        .into_iter()
        .find(|t| *t != tag);
    debug!("Previous tag for {tag}: {previous:?}");
    let commits = match previous {
        Some(previous) => platform.compare_commits(&remote, &previous, &tag).await?,
        None => vec!["Initial Release".to_string()],
    };

    let extra_notes = ctx
        .prompter
        .multiline("Enter any additional notes for the GitHub release")?;
    let notes = release_notes(&remote.html_url, &tag, &commits, &extra_notes);

    ctx.progress.on_step("Publishing GitHub release").await;
    let release = platform
        .create_release(&remote, &tag, &format!("Release {version}"), &notes)
        .await?;
    ctx.progress
        .on_step_done(&format!("Published release {tag}"))
        .await;
    ctx.progress.on_release_published(&release).await;

    ctx.progress
        .on_step(&format!("Cleaning up {branch}"))
        .await;
    ctx.git.delete_local_branch(&branch, &repo.path).await?;
    ctx.git.delete_remote_branch(&branch, &repo.path).await?;
    ctx.git.switch_branch(DEVELOP_BRANCH, &repo.path).await?;
    ctx.git.pull(DEVELOP_BRANCH, &repo.path).await?;
    ctx.progress
        .on_step_done(&format!("Deleted {branch} and switched to {DEVELOP_BRANCH}"))
        .await;

    info!("Released {tag} in {}", repo.path);
    ctx.remember(&repo)?;
    Ok(ReleaseFinished {
        repo,
        version,
        prs,
        release,
    })
}
