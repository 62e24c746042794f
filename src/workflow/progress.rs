//! Step-by-step progress reporting for workflows
//!
//! Workflows report what they are doing through this trait so the CLI can
//! render spinners while tests stay silent.

use crate::error::Error;
use crate::types::{Issue, PullRequest, Release};
use async_trait::async_trait;

/// Receives workflow progress
///
/// Steps are strictly sequential: every `on_step` is followed by one
/// `on_step_done` unless the workflow fails first.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when a step starts (e.g. "Pushing feature/4-login to origin")
    async fn on_step(&self, step: &str);

    /// Called when the current step completed
    async fn on_step_done(&self, message: &str);

    /// Called when an issue is created
    async fn on_issue_created(&self, issue: &Issue);

    /// Called when a pull request is merged
    async fn on_pr_merged(&self, pr: &PullRequest);

    /// Called when a release is published
    async fn on_release_published(&self, release: &Release);

    /// Called when a repository fails but the command carries on
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// Discards every update
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_step(&self, _step: &str) {}
    async fn on_step_done(&self, _message: &str) {}
    async fn on_issue_created(&self, _issue: &Issue) {}
    async fn on_pr_merged(&self, _pr: &PullRequest) {}
    async fn on_release_published(&self, _release: &Release) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
