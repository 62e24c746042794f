//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::{HostingService, LabelSpec, NewIssue, NewPullRequest};
use crate::types::{Issue, Label, NewRepository, PullRequest, Release, RemoteRepo};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::{self, commits::Commit};
use serde_json::json;
use tracing::debug;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    organization: String,
    username: String,
}

/// Whether GitHub answered the call with `status`
fn has_status(err: &octocrab::Error, status: u16) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == status)
}

/// First line of a commit message plus its short SHA
fn summarize_commit(sha: &str, message: &str) -> String {
    let subject = message.lines().next().unwrap_or_default();
    let short = sha.get(..7).unwrap_or(sha);
    format!("{subject} ({short})")
}

fn summarize(commit: &Commit) -> String {
    summarize_commit(&commit.sha, &commit.commit.message)
}

fn url_string<U: ToString>(url: Option<&U>) -> String {
    url.map(ToString::to_string).unwrap_or_default()
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_base` overrides the API root (GitHub Enterprise or a test server).
    pub fn new(
        token: &str,
        organization: String,
        username: String,
        api_base: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(base_url) = api_base {
            builder = builder
                .base_uri(base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            organization,
            username,
        })
    }

    fn remote_repo(&self, repo: models::Repository) -> RemoteRepo {
        let owner = repo
            .owner
            .map_or_else(|| self.organization.clone(), |o| o.login);
        RemoteRepo {
            full_name: repo
                .full_name
                .unwrap_or_else(|| format!("{owner}/{}", repo.name)),
            html_url: url_string(repo.html_url.as_ref()),
            clone_url: url_string(repo.clone_url.as_ref()),
            name: repo.name,
            owner,
        }
    }

    async fn get_label(&self, repo: &RemoteRepo, name: &str) -> Result<Option<Label>> {
        debug!("GET label {name} in {}", repo.full_name);
        match self
            .client
            .issues(&repo.owner, &repo.name)
            .get_label(urlencoding::encode(name))
            .await
        {
            Ok(label) => Ok(Some(label.into())),
            Err(e) if has_status(&e, 404) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl From<models::Label> for Label {
    fn from(label: models::Label) -> Self {
        Self {
            name: label.name,
            color: label.color,
            description: label.description,
        }
    }
}

impl From<models::pulls::PullRequest> for PullRequest {
    fn from(pr: models::pulls::PullRequest) -> Self {
        Self {
            number: pr.number,
            html_url: url_string(pr.html_url.as_ref()),
            base_ref: pr.base.ref_field,
            head_ref: pr.head.ref_field,
            title: pr.title.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl HostingService for GitHubService {
    async fn create_repo(&self, repo: &NewRepository) -> Result<RemoteRepo> {
        // octocrab has no builder for organization repositories
        let route = format!("/orgs/{}/repos", self.organization);
        let body = json!({
            "name": repo.name,
            "description": repo.description,
            "private": repo.private,
            "auto_init": repo.auto_init,
        });
        debug!("POST {route} ({})", repo.name);

        match self
            .client
            .post::<_, models::Repository>(&route, Some(&body))
            .await
        {
            Ok(created) => Ok(self.remote_repo(created)),
            Err(e) if has_status(&e, 422) => Err(Error::RepositoryExists(repo.name.clone())),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_repo(&self, name: &str) -> Result<RemoteRepo> {
        debug!("GET repository {}/{name}", self.organization);
        let repo = self.client.repos(&self.organization, name).get().await?;
        Ok(self.remote_repo(repo))
    }

    async fn set_default_branch(&self, repo: &RemoteRepo, branch: &str) -> Result<()> {
        let route = format!("/repos/{}/{}", repo.owner, repo.name);
        debug!("PATCH {route} default_branch={branch}");
        let _: models::Repository = self
            .client
            .patch(&route, Some(&json!({ "default_branch": branch })))
            .await?;
        Ok(())
    }

    async fn create_release(
        &self,
        repo: &RemoteRepo,
        tag: &str,
        name: &str,
        body: &str,
    ) -> Result<Release> {
        debug!("creating release {tag} in {}", repo.full_name);
        let release = self
            .client
            .repos(&repo.owner, &repo.name)
            .releases()
            .create(tag)
            .name(name)
            .body(body)
            .send()
            .await?;
        Ok(Release {
            tag_name: release.tag_name,
            html_url: release.html_url.to_string(),
        })
    }

    async fn compare_commits(
        &self,
        repo: &RemoteRepo,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>> {
        debug!("comparing {base}...{head} in {}", repo.full_name);
        let comparison = self
            .client
            .commits(&repo.owner, &repo.name)
            .compare(base, head)
            .send()
            .await?;
        Ok(comparison.commits.iter().map(summarize).collect())
    }

    async fn get_or_create_label(&self, repo: &RemoteRepo, label: LabelSpec<'_>) -> Result<Label> {
        if let Some(existing) = self.get_label(repo, label.name).await? {
            return Ok(existing);
        }

        debug!("creating label {} in {}", label.name, repo.full_name);
        let created = self
            .client
            .issues(&repo.owner, &repo.name)
            .create_label(label.name, label.color, label.description)
            .await?;
        Ok(created.into())
    }

    async fn create_issue(&self, repo: &RemoteRepo, issue: &NewIssue<'_>) -> Result<Issue> {
        debug!("opening issue '{}' in {}", issue.title, repo.full_name);
        let created = self
            .client
            .issues(&repo.owner, &repo.name)
            .create(issue.title)
            .body(issue.body)
            .labels(issue.labels.clone())
            .assignees(vec![issue.assignee.to_string()])
            .send()
            .await?;
        Ok(Issue {
            number: created.number,
            html_url: created.html_url.to_string(),
        })
    }

    async fn create_pr(&self, repo: &RemoteRepo, pr: &NewPullRequest<'_>) -> Result<PullRequest> {
        debug!("opening pull request {} -> {} in {}", pr.head, pr.base, repo.full_name);
        let created = self
            .client
            .pulls(&repo.owner, &repo.name)
            .create(pr.title, pr.head, pr.base)
            .body(pr.body)
            .send()
            .await?;

        // PRs share the issue number space for labels and assignees
        let issues = self.client.issues(&repo.owner, &repo.name);
        if !pr.labels.is_empty() {
            issues.add_labels(created.number, &pr.labels).await?;
        }
        issues
            .add_assignees(created.number, &[self.username.as_str()])
            .await?;

        Ok(created.into())
    }

    async fn merge_pr(&self, repo: &RemoteRepo, pr: &PullRequest) -> Result<()> {
        debug!("merging pull request #{} in {}", pr.number, repo.full_name);
        let result = self
            .client
            .pulls(&repo.owner, &repo.name)
            .merge(pr.number)
            .send()
            .await?;
        if result.merged {
            Ok(())
        } else {
            Err(Error::GitHubApi(format!(
                "pull request #{} was not merged: {}",
                pr.number,
                result.message.unwrap_or_default()
            )))
        }
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn organization(&self) -> &str {
        &self.organization
    }
}
