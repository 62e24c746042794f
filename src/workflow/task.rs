//! Feature and bugfix lifecycles
//!
//! A task lives on a `{kind}/{issue}-{slug}` branch. Start opens the issue
//! and the branch; finish turns the branch into a merged pull request against
//! `develop` and removes it.

use crate::error::{Error, Result};
use crate::platform::{HostingService, NewIssue, NewPullRequest};
use crate::target::Selector;
use crate::types::{
    BranchKind, DEVELOP_BRANCH, Issue, PullRequest, RepositoryHandle, TaskKind, classify,
};
use crate::workflow::WorkflowContext;
use std::fmt::Write;
use tracing::info;

/// Result of starting a task
#[derive(Debug, Clone)]
pub struct TaskStarted {
    /// Repository the task lives in
    pub repo: RepositoryHandle,
    /// Issue opened for the task
    pub issue: Issue,
    /// Branch created and checked out
    pub branch: String,
}

/// Result of finishing a task
#[derive(Debug, Clone)]
pub struct TaskFinished {
    /// Repository the task lived in
    pub repo: RepositoryHandle,
    /// Merged pull request
    pub pr: PullRequest,
}

/// Pull request title for a task branch slug
///
/// `login-page` with issue 4 becomes `Login page (#4)`.
pub fn pr_title(slug: &str, issue_number: Option<u64>) -> String {
    let words = slug.replace('-', " ").to_lowercase();
    let mut chars = words.chars();
    let mut title: String = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();
    if let Some(n) = issue_number {
        let _ = write!(title, " (#{n})");
    }
    title
}

/// `feature|bugfix <target> start <name>`
pub async fn start_task(
    ctx: &mut WorkflowContext<'_>,
    platform: &dyn HostingService,
    kind: TaskKind,
    selector: &Selector,
    name: &str,
) -> Result<TaskStarted> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput(format!(
            "a {kind} name is required when starting a {kind}"
        )));
    }

    let repo = ctx.resolve(selector).await?;
    let description = ctx
        .prompter
        .multiline(&format!("Describe the {kind} '{name}'"))?;

    ctx.progress
        .on_step(&format!("Creating issue in {}", repo.remote_name))
        .await;
    let remote = platform.get_repo(&repo.remote_name).await?;
    let issue = platform
        .create_issue(&remote, &NewIssue {
            title: name,
            body: &description,
            assignee: platform.username(),
            labels: vec![kind.label().to_string()],
        })
        .await?;
    ctx.progress
        .on_step_done(&format!("Created issue #{}", issue.number))
        .await;
    ctx.progress.on_issue_created(&issue).await;

    let branch = kind.branch_name(issue.number, name);
    ctx.progress
        .on_step(&format!("Creating branch {branch}"))
        .await;
    ctx.git.create_branch(&branch, "HEAD", &repo.path).await?;
    ctx.git.switch_branch(&branch, &repo.path).await?;
    ctx.progress
        .on_step_done(&format!("Switched to new branch {branch}"))
        .await;

    info!("Started {kind} {branch} in {}", repo.path);
    ctx.remember(&repo)?;
    Ok(TaskStarted {
        repo,
        issue,
        branch,
    })
}

/// `feature|bugfix <target> finish`
pub async fn finish_task(
    ctx: &mut WorkflowContext<'_>,
    platform: &dyn HostingService,
    kind: TaskKind,
    selector: &Selector,
) -> Result<TaskFinished> {
    let repo = ctx.resolve(selector).await?;
    let branch = ctx.git.current_branch(&repo.path).await?;

    let (issue_number, slug) = match classify(&branch) {
        BranchKind::Task {
            kind: found,
            issue_number,
            slug,
        } if found == kind => (issue_number, slug),
        _ => {
            return Err(Error::NotOnTaskBranch {
                kind: kind.prefix().to_string(),
                branch,
            });
        }
    };

    let title = pr_title(&slug, issue_number);
    let description = ctx
        .prompter
        .multiline(&format!("Describe the pull request for '{title}'"))?;
    let body = match issue_number {
        Some(n) if description.is_empty() => format!("Closes #{n}"),
        Some(n) => format!("Closes #{n}\n\n{description}"),
        None => description,
    };

    ctx.progress
        .on_step(&format!("Pushing {branch} to origin"))
        .await;
    ctx.git.push_branch(&branch, true, &repo.path).await?;
    ctx.progress.on_step_done(&format!("Pushed {branch}")).await;

    ctx.progress
        .on_step(&format!("Creating pull request into {DEVELOP_BRANCH}"))
        .await;
    let remote = platform.get_repo(&repo.remote_name).await?;
    let pr = platform
        .create_pr(&remote, &NewPullRequest {
            title: &title,
            body: &body,
            head: &branch,
            base: DEVELOP_BRANCH,
            labels: vec![kind.label().to_string()],
        })
        .await?;
    ctx.progress
        .on_step_done(&format!("Created pull request #{}", pr.number))
        .await;

    ctx.progress
        .on_step(&format!("Merging pull request #{}", pr.number))
        .await;
    platform.merge_pr(&remote, &pr).await?;
    ctx.progress
        .on_step_done(&format!("Merged pull request #{}", pr.number))
        .await;
    ctx.progress.on_pr_merged(&pr).await;

    ctx.progress
        .on_step(&format!("Updating {DEVELOP_BRANCH}"))
        .await;
    ctx.git.switch_branch(DEVELOP_BRANCH, &repo.path).await?;
    ctx.git.pull(DEVELOP_BRANCH, &repo.path).await?;
    ctx.progress
        .on_step_done(&format!("Switched to {DEVELOP_BRANCH} and pulled"))
        .await;

    ctx.progress
        .on_step(&format!("Deleting branch {branch}"))
        .await;
    ctx.git.delete_local_branch(&branch, &repo.path).await?;
    ctx.git.delete_remote_branch(&branch, &repo.path).await?;
    ctx.progress
        .on_step_done(&format!("Deleted {branch} locally and on origin"))
        .await;

    info!("Finished {kind} {branch} in {}", repo.path);
    ctx.remember(&repo)?;
    Ok(TaskFinished { repo, pr })
}
