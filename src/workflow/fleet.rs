//! Fleet-wide commands
//!
//! Some commands act on the root project and every submodule in turn. Each
//! action states its access at the type level: read-only actions record a
//! failing repository and move on, mutating actions stop the fleet at the
//! first failure so later repositories are never touched.

use crate::error::Result;
use crate::platform::web_url;
use crate::repo::GitOps;
use crate::types::{ORIGIN, RepoStatus, RepositoryHandle, issue_number_of};
use crate::workflow::ProgressCallback;
use crate::workflow::commit::commit_message;
use async_trait::async_trait;
use tracing::{debug, warn};

/// How an action treats the repositories it runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Inspects only; failures are collected
    ReadOnly,
    /// Changes repositories or remotes; the first failure aborts
    Mutating,
}

/// An action applied to each repository of the project
#[async_trait]
pub trait FleetAction: Send + Sync {
    /// Per-repository result
    type Output: Send;

    /// Failure policy of the action
    const ACCESS: Access;

    /// Apply the action to one repository
    async fn apply(&self, git: &dyn GitOps, repo: &RepositoryHandle) -> Result<Self::Output>;

    /// Progress labels (running, done) for `repo`; `None` runs silently
    fn step(&self, _repo: &RepositoryHandle) -> Option<(String, String)> {
        None
    }
}

/// Outcome of a fleet run, in processing order
#[derive(Debug)]
pub struct FleetReport<T> {
    /// Each visited repository with its result
    pub outcomes: Vec<(RepositoryHandle, Result<T>)>,
}

impl<T> FleetReport<T> {
    /// Whether any repository failed
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|(_, r)| r.is_err())
    }
}

/// Run `action` over `repos` in order
///
/// For [`Access::Mutating`] actions the first error is returned and the
/// remaining repositories are skipped. For [`Access::ReadOnly`] actions every
/// repository is visited and errors are kept in the report.
pub async fn run_fleet<A: FleetAction>(
    git: &dyn GitOps,
    repos: &[RepositoryHandle],
    action: &A,
    progress: &dyn ProgressCallback,
) -> Result<FleetReport<A::Output>> {
    let mut outcomes = Vec::with_capacity(repos.len());

    for repo in repos {
        debug!("Fleet action on {}", repo.path);
        let step = action.step(repo);
        if let Some((running, _)) = &step {
            progress.on_step(running).await;
        }
        match action.apply(git, repo).await {
            Ok(output) => {
                if let Some((_, done)) = &step {
                    progress.on_step_done(done).await;
                }
                outcomes.push((repo.clone(), Ok(output)));
            }
            Err(e) => match A::ACCESS {
                Access::Mutating => return Err(e),
                Access::ReadOnly => {
                    warn!("{} failed: {e}", repo.display_name);
                    progress.on_error(&e).await;
                    outcomes.push((repo.clone(), Err(e)));
                }
            },
        }
    }

    Ok(FleetReport { outcomes })
}

/// Working tree status of each repository
pub struct StatusAction;

#[async_trait]
impl FleetAction for StatusAction {
    type Output = RepoStatus;
    const ACCESS: Access = Access::ReadOnly;

    async fn apply(&self, git: &dyn GitOps, repo: &RepositoryHandle) -> Result<RepoStatus> {
        git.status(&repo.path).await
    }
}

/// Web URL of each repository's `origin`, `None` when it has no remote
pub struct LinkAction;

#[async_trait]
impl FleetAction for LinkAction {
    type Output = Option<String>;
    const ACCESS: Access = Access::ReadOnly;

    async fn apply(&self, git: &dyn GitOps, repo: &RepositoryHandle) -> Result<Option<String>> {
        match git.remote_url(ORIGIN, &repo.path).await {
            Ok(url) => Ok(Some(web_url(&url))),
            Err(e) => {
                debug!("No remote for {}: {e}", repo.path);
                Ok(None)
            }
        }
    }
}

/// Push every branch of each repository
pub struct PushAction;

#[async_trait]
impl FleetAction for PushAction {
    type Output = ();
    const ACCESS: Access = Access::Mutating;

    async fn apply(&self, git: &dyn GitOps, repo: &RepositoryHandle) -> Result<()> {
        git.push_all(&repo.path).await
    }

    fn step(&self, repo: &RepositoryHandle) -> Option<(String, String)> {
        Some((
            format!("Pushing all branches for {}", repo.display_name),
            format!("Pushed all branches for {}", repo.display_name),
        ))
    }
}

/// Stage the given files in each repository
pub struct StageAction {
    /// Paths relative to each repository
    pub files: Vec<String>,
}

#[async_trait]
impl FleetAction for StageAction {
    type Output = ();
    const ACCESS: Access = Access::Mutating;

    async fn apply(&self, git: &dyn GitOps, repo: &RepositoryHandle) -> Result<()> {
        git.stage(&self.files, &repo.path).await
    }
}

/// Commit staged changes in each repository that has any
///
/// Repositories with nothing staged are skipped and report `false`. A
/// repository on a task branch gets the issue suffix on its message.
pub struct CommitAction {
    /// Commit message before any issue suffix
    pub message: String,
}

#[async_trait]
impl FleetAction for CommitAction {
    type Output = bool;
    const ACCESS: Access = Access::Mutating;

    async fn apply(&self, git: &dyn GitOps, repo: &RepositoryHandle) -> Result<bool> {
        commit_if_staged(git, repo, &self.message).await
    }
}

/// Stage everything, then commit, in each repository
///
/// Staging and committing happen per repository so the root, visited last,
/// records the submodule commits made just before it.
pub struct AddCommitAction {
    /// Commit message before any issue suffix
    pub message: String,
}

#[async_trait]
impl FleetAction for AddCommitAction {
    type Output = bool;
    const ACCESS: Access = Access::Mutating;

    async fn apply(&self, git: &dyn GitOps, repo: &RepositoryHandle) -> Result<bool> {
        git.stage(&[".".to_string()], &repo.path).await?;
        commit_if_staged(git, repo, &self.message).await
    }
}

async fn commit_if_staged(git: &dyn GitOps, repo: &RepositoryHandle, message: &str) -> Result<bool> {
    let status = git.status(&repo.path).await?;
    if status.staged.is_empty() {
        warn!("Nothing staged in {}, skipping commit", repo.display_name);
        return Ok(false);
    }
    let issue = issue_number_of(&status.branch);
    git.commit(&commit_message(message, issue), &repo.path).await?;
    Ok(true)
}
