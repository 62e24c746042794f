//! Hosting platform services
//!
//! Provides the repository, issue, pull request, label and release
//! operations the workflows need from GitHub.

mod factory;
mod github;
mod urls;

pub use factory::create_hosting_service;
pub use github::GitHubService;
pub use urls::web_url;

use crate::error::Result;
use crate::types::{Issue, Label, NewRepository, PullRequest, Release, RemoteRepo};
use async_trait::async_trait;

/// Label definition used by [`HostingService::get_or_create_label`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSpec<'a> {
    /// Label name
    pub name: &'a str,
    /// Hex color without `#`
    pub color: &'a str,
    /// Description shown on the hosting service
    pub description: &'a str,
}

/// Label marking release pull requests
pub const RELEASE_LABEL: LabelSpec<'static> = LabelSpec {
    name: "release",
    color: "0FB8B2",
    description: "Indicates a release pull request",
};

/// Issue to open
#[derive(Debug, Clone)]
pub struct NewIssue<'a> {
    /// Title
    pub title: &'a str,
    /// Markdown body
    pub body: &'a str,
    /// Login to assign
    pub assignee: &'a str,
    /// Label names
    pub labels: Vec<String>,
}

/// Pull request to open
#[derive(Debug, Clone)]
pub struct NewPullRequest<'a> {
    /// Title
    pub title: &'a str,
    /// Markdown body
    pub body: &'a str,
    /// Source branch
    pub head: &'a str,
    /// Target branch
    pub base: &'a str,
    /// Label names
    pub labels: Vec<String>,
}

/// Hosting service trait for repository, issue, PR and release operations
///
/// Every call is attempted once; failures surface as [`crate::error::Error`].
#[async_trait]
pub trait HostingService: Send + Sync {
    /// Create a repository in the configured organization
    async fn create_repo(&self, repo: &NewRepository) -> Result<RemoteRepo>;

    /// Look up a repository of the configured organization by name
    async fn get_repo(&self, name: &str) -> Result<RemoteRepo>;

    /// Change the default branch of a repository
    async fn set_default_branch(&self, repo: &RemoteRepo, branch: &str) -> Result<()>;

    /// Publish a release for an existing tag
    async fn create_release(
        &self,
        repo: &RemoteRepo,
        tag: &str,
        name: &str,
        body: &str,
    ) -> Result<Release>;

    /// One formatted line per commit between `base` and `head`, oldest first
    async fn compare_commits(&self, repo: &RemoteRepo, base: &str, head: &str)
    -> Result<Vec<String>>;

    /// Fetch a label, creating it only when it does not exist
    async fn get_or_create_label(&self, repo: &RemoteRepo, label: LabelSpec<'_>) -> Result<Label>;

    /// Open an issue
    async fn create_issue(&self, repo: &RemoteRepo, issue: &NewIssue<'_>) -> Result<Issue>;

    /// Open a pull request, label it and assign it to the configured user
    async fn create_pr(&self, repo: &RemoteRepo, pr: &NewPullRequest<'_>) -> Result<PullRequest>;

    /// Merge a pull request
    async fn merge_pr(&self, repo: &RemoteRepo, pr: &PullRequest) -> Result<()>;

    /// Login of the authenticated user
    fn username(&self) -> &str;

    /// Organization repositories are created in
    fn organization(&self) -> &str;
}
