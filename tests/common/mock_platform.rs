//! Mock hosting service for testing

use async_trait::async_trait;
use gfr::error::{Error, Result};
use gfr::platform::{HostingService, LabelSpec, NewIssue, NewPullRequest};
use gfr::types::{Issue, Label, NewRepository, PullRequest, Release, RemoteRepo};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::fixtures::make_remote_repo;

/// Call record for `create_issue`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueCall {
    pub repo: String,
    pub title: String,
    pub body: String,
    pub assignee: String,
    pub labels: Vec<String>,
}

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub repo: String,
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Call record for `create_release`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReleaseCall {
    pub tag: String,
    pub name: String,
    pub body: String,
}

/// Simple mock hosting service
///
/// Issues and PRs share one auto-incrementing number sequence, as on GitHub.
/// Labels are created on first request and found afterwards.
pub struct MockHostingService {
    organization: String,
    username: String,
    next_number: AtomicU64,
    labels: Mutex<HashSet<String>>,
    compare_response: Mutex<Vec<String>>,
    // Call tracking
    create_repo_calls: Mutex<Vec<NewRepository>>,
    get_repo_calls: Mutex<Vec<String>>,
    default_branch_calls: Mutex<Vec<(String, String)>>,
    create_issue_calls: Mutex<Vec<CreateIssueCall>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    merge_calls: Mutex<Vec<u64>>,
    label_created_calls: Mutex<Vec<String>>,
    compare_calls: Mutex<Vec<(String, String)>>,
    create_release_calls: Mutex<Vec<CreateReleaseCall>>,
    // Error injection
    error_on_create_repo: Mutex<Option<Error>>,
    error_on_create_pr: Mutex<Option<String>>,
    error_on_merge: Mutex<Option<String>>,
}

impl MockHostingService {
    pub fn new() -> Self {
        Self::for_user("acme", "octocat")
    }

    pub fn for_user(organization: &str, username: &str) -> Self {
        Self {
            organization: organization.to_string(),
            username: username.to_string(),
            next_number: AtomicU64::new(1),
            labels: Mutex::new(HashSet::new()),
            compare_response: Mutex::new(Vec::new()),
            create_repo_calls: Mutex::new(Vec::new()),
            get_repo_calls: Mutex::new(Vec::new()),
            default_branch_calls: Mutex::new(Vec::new()),
            create_issue_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            label_created_calls: Mutex::new(Vec::new()),
            compare_calls: Mutex::new(Vec::new()),
            create_release_calls: Mutex::new(Vec::new()),
            error_on_create_repo: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
            error_on_merge: Mutex::new(None),
        }
    }

    /// Start numbering issues and PRs at `n`
    pub fn start_numbering_at(&self, n: u64) {
        self.next_number.store(n, Ordering::SeqCst);
    }

    /// Make a label already exist on the remote
    pub fn add_existing_label(&self, name: &str) {
        self.labels.lock().unwrap().insert(name.to_string());
    }

    /// Commit summaries returned by `compare_commits`
    pub fn set_compare_response(&self, commits: &[&str]) {
        *self.compare_response.lock().unwrap() =
            commits.iter().map(ToString::to_string).collect();
    }

    // === Error injection ===

    pub fn fail_create_repo(&self, error: Error) {
        *self.error_on_create_repo.lock().unwrap() = Some(error);
    }

    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification ===

    pub fn get_create_repo_calls(&self) -> Vec<NewRepository> {
        self.create_repo_calls.lock().unwrap().clone()
    }

    pub fn get_repo_calls(&self) -> Vec<String> {
        self.get_repo_calls.lock().unwrap().clone()
    }

    pub fn get_default_branch_calls(&self) -> Vec<(String, String)> {
        self.default_branch_calls.lock().unwrap().clone()
    }

    pub fn get_create_issue_calls(&self) -> Vec<CreateIssueCall> {
        self.create_issue_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_merge_calls(&self) -> Vec<u64> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn get_label_created_calls(&self) -> Vec<String> {
        self.label_created_calls.lock().unwrap().clone()
    }

    pub fn get_compare_calls(&self) -> Vec<(String, String)> {
        self.compare_calls.lock().unwrap().clone()
    }

    pub fn get_create_release_calls(&self) -> Vec<CreateReleaseCall> {
        self.create_release_calls.lock().unwrap().clone()
    }

    fn next_number(&self) -> u64 {
        self.next_number.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for MockHostingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostingService for MockHostingService {
    async fn create_repo(&self, repo: &NewRepository) -> Result<RemoteRepo> {
        self.create_repo_calls.lock().unwrap().push(repo.clone());
        if let Some(error) = self.error_on_create_repo.lock().unwrap().take() {
            return Err(error);
        }
        Ok(make_remote_repo(&self.organization, &repo.name))
    }

    async fn get_repo(&self, name: &str) -> Result<RemoteRepo> {
        self.get_repo_calls.lock().unwrap().push(name.to_string());
        Ok(make_remote_repo(&self.organization, name))
    }

    async fn set_default_branch(&self, repo: &RemoteRepo, branch: &str) -> Result<()> {
        self.default_branch_calls
            .lock()
            .unwrap()
            .push((repo.name.clone(), branch.to_string()));
        Ok(())
    }

    async fn create_release(
        &self,
        repo: &RemoteRepo,
        tag: &str,
        name: &str,
        body: &str,
    ) -> Result<Release> {
        self.create_release_calls
            .lock()
            .unwrap()
            .push(CreateReleaseCall {
                tag: tag.to_string(),
                name: name.to_string(),
                body: body.to_string(),
            });
        Ok(Release {
            tag_name: tag.to_string(),
            html_url: format!("{}/releases/tag/{tag}", repo.html_url),
        })
    }

    async fn compare_commits(
        &self,
        _repo: &RemoteRepo,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>> {
        self.compare_calls
            .lock()
            .unwrap()
            .push((base.to_string(), head.to_string()));
        Ok(self.compare_response.lock().unwrap().clone())
    }

    async fn get_or_create_label(&self, _repo: &RemoteRepo, label: LabelSpec<'_>) -> Result<Label> {
        let created = self.labels.lock().unwrap().insert(label.name.to_string());
        if created {
            self.label_created_calls
                .lock()
                .unwrap()
                .push(label.name.to_string());
        }
        Ok(Label {
            name: label.name.to_string(),
            color: label.color.to_string(),
            description: Some(label.description.to_string()),
        })
    }

    async fn create_issue(&self, repo: &RemoteRepo, issue: &NewIssue<'_>) -> Result<Issue> {
        self.create_issue_calls
            .lock()
            .unwrap()
            .push(CreateIssueCall {
                repo: repo.name.clone(),
                title: issue.title.to_string(),
                body: issue.body.to_string(),
                assignee: issue.assignee.to_string(),
                labels: issue.labels.clone(),
            });
        let number = self.next_number();
        Ok(Issue {
            number,
            html_url: format!("{}/issues/{number}", repo.html_url),
        })
    }

    async fn create_pr(&self, repo: &RemoteRepo, pr: &NewPullRequest<'_>) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            repo: repo.name.clone(),
            head: pr.head.to_string(),
            base: pr.base.to_string(),
            title: pr.title.to_string(),
            body: pr.body.to_string(),
            labels: pr.labels.clone(),
        });
        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        let number = self.next_number();
        Ok(PullRequest {
            number,
            html_url: format!("{}/pull/{number}", repo.html_url),
            base_ref: pr.base.to_string(),
            head_ref: pr.head.to_string(),
            title: pr.title.to_string(),
        })
    }

    async fn merge_pr(&self, _repo: &RemoteRepo, pr: &PullRequest) -> Result<()> {
        self.merge_calls.lock().unwrap().push(pr.number);
        if let Some(msg) = self.error_on_merge.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn organization(&self) -> &str {
        &self.organization
    }
}
