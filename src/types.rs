//! Core types for gfr

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Relative path that denotes the root project
pub const ROOT_PATH: &str = ".";

/// Integration branch every task and release flows into
pub const DEVELOP_BRANCH: &str = "develop";

/// Production branch that carries release tags
pub const MAIN_BRANCH: &str = "main";

/// Documentation branch created by `init`
pub const DOC_BRANCH: &str = "doc";

/// Remote every workflow pushes to
pub const ORIGIN: &str = "origin";

/// A resolved repository target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    /// Path relative to the project root (`.` for the root itself)
    pub path: String,
    /// Human readable name for console output
    pub display_name: String,
    /// Repository name on the hosting service
    pub remote_name: String,
}

impl RepositoryHandle {
    /// Handle for the root project
    pub fn root(remote_name: impl Into<String>) -> Self {
        Self {
            path: ROOT_PATH.to_string(),
            display_name: "root project".to_string(),
            remote_name: remote_name.into(),
        }
    }

    /// Handle for a submodule
    pub fn submodule(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            display_name: path.clone(),
            remote_name: path.clone(),
            path,
        }
    }

    /// Whether this handle points at the root project
    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }
}

/// Working tree snapshot of one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStatus {
    /// Current branch name
    pub branch: String,
    /// Files with index changes
    pub staged: Vec<String>,
    /// Files with worktree changes
    pub unstaged: Vec<String>,
    /// Files unknown to git
    pub untracked: Vec<String>,
}

impl RepoStatus {
    /// Whether nothing is staged, modified or untracked
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }
}

/// A repository on the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepo {
    /// Owner (organization) login
    pub owner: String,
    /// Repository name
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    /// Web URL
    pub html_url: String,
    /// HTTPS clone URL
    pub clone_url: String,
}

/// Request to create a repository
#[derive(Debug, Clone)]
pub struct NewRepository {
    /// Repository name
    pub name: String,
    /// Short description
    pub description: String,
    /// Private visibility
    pub private: bool,
    /// Create an initial commit with a README
    pub auto_init: bool,
}

/// An issue on the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Web URL
    pub html_url: String,
}

/// A pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// A repository label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,
    /// Hex color without `#`
    pub color: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// A published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Tag the release points at
    pub tag_name: String,
    /// Web URL
    pub html_url: String,
}

/// Kind of task lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// New functionality, labelled `enhancement`
    Feature,
    /// Defect fix, labelled `bug`
    Bugfix,
}

impl TaskKind {
    /// Branch prefix (without the slash)
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Bugfix => "bugfix",
        }
    }

    /// Label applied to issues and PRs of this kind
    pub const fn label(self) -> &'static str {
        match self {
            Self::Feature => "enhancement",
            Self::Bugfix => "bug",
        }
    }

    /// Branch name for a task linked to an issue
    pub fn branch_name(self, issue_number: u64, task_name: &str) -> String {
        format!("{}/{issue_number}-{}", self.prefix(), slugify(task_name))
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// What a branch name says about the workflow it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchKind {
    /// `feature/...` or `bugfix/...`
    Task {
        /// Lifecycle the branch belongs to
        kind: TaskKind,
        /// Linked issue number, when the name carries one
        issue_number: Option<u64>,
        /// Text after the issue number (or after the prefix)
        slug: String,
    },
    /// `release/<version>`
    Release {
        /// Raw version suffix
        version: String,
    },
    /// Anything else (`develop`, `main`, ...)
    Other,
}

fn task_branch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(feature|bugfix)/(?:(\d+)-)?(.*)$").expect("hardcoded regex is valid")
    })
}

/// Classify a branch name into its lifecycle
pub fn classify(branch: &str) -> BranchKind {
    if let Some(caps) = task_branch_re().captures(branch) {
        let kind = if &caps[1] == "feature" {
            TaskKind::Feature
        } else {
            TaskKind::Bugfix
        };
        return BranchKind::Task {
            kind,
            issue_number: caps.get(2).and_then(|m| m.as_str().parse().ok()),
            slug: caps[3].to_string(),
        };
    }

    if let Some(version) = branch.strip_prefix("release/") {
        return BranchKind::Release {
            version: version.to_string(),
        };
    }

    BranchKind::Other
}

/// Issue number encoded in a task branch, if any
pub fn issue_number_of(branch: &str) -> Option<u64> {
    match classify(branch) {
        BranchKind::Task { issue_number, .. } => issue_number,
        _ => None,
    }
}

/// Lower-case a task name and turn spaces into hyphens
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Release bump selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    /// Bump minor, reset patch
    Minor,
    /// Bump major, reset minor and patch
    Major,
}

impl ReleaseKind {
    /// Choices in prompt order
    pub const ALL: [Self; 2] = [Self::Minor, Self::Major];

    /// Prompt label
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

/// Three-component semantic version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
}

impl Version {
    /// Parse `1.2.3` or `v1.2.3`
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let parts: Vec<&str> = digits.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(Error::InvalidVersion(raw.to_string()));
        };
        let component = |s: &str| {
            s.parse::<u64>()
                .map_err(|_| Error::InvalidVersion(raw.to_string()))
        };
        Ok(Self {
            major: component(*major)?,
            minor: component(*minor)?,
            patch: component(*patch)?,
        })
    }

    /// Next version for a release kind; patch always resets
    #[must_use]
    pub const fn bump(self, kind: ReleaseKind) -> Self {
        match kind {
            ReleaseKind::Major => Self {
                major: self.major + 1,
                minor: 0,
                patch: 0,
            },
            ReleaseKind::Minor => Self {
                major: self.major,
                minor: self.minor + 1,
                patch: 0,
            },
        }
    }

    /// `release/<version>`
    pub fn branch_name(self) -> String {
        format!("release/{self}")
    }

    /// `v<version>`
    pub fn tag_name(self) -> String {
        format!("v{self}")
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Compute the next release version from the latest tag (if any)
pub fn next_version(latest_tag: Option<&str>, kind: ReleaseKind) -> Result<Version> {
    let current = match latest_tag {
        Some(tag) if !tag.trim().is_empty() => Version::parse(tag)?,
        _ => Version::default(),
    };
    Ok(current.bump(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version() {
        assert_eq!(
            next_version(Some("0.0.0"), ReleaseKind::Minor).unwrap().to_string(),
            "0.1.0"
        );
        assert_eq!(
            next_version(Some("1.2.3"), ReleaseKind::Major).unwrap().to_string(),
            "2.0.0"
        );
        assert_eq!(
            next_version(None, ReleaseKind::Major).unwrap().to_string(),
            "1.0.0"
        );
        assert_eq!(
            next_version(Some("v1.2.3"), ReleaseKind::Minor).unwrap().to_string(),
            "1.3.0"
        );
    }

    #[test]
    fn test_version_rejects_garbage() {
        assert!(matches!(
            Version::parse("1.2"),
            Err(Error::InvalidVersion(_))
        ));
        assert!(matches!(
            Version::parse("one.two.three"),
            Err(Error::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_version_names() {
        let v = Version::parse("2.1.0").unwrap();
        assert_eq!(v.branch_name(), "release/2.1.0");
        assert_eq!(v.tag_name(), "v2.1.0");
    }

    #[test]
    fn test_classify_task_branch_round_trip() {
        for kind in [TaskKind::Feature, TaskKind::Bugfix] {
            let branch = kind.branch_name(42, "Login Page");
            assert_eq!(branch, format!("{}/42-login-page", kind.prefix()));
            assert_eq!(
                classify(&branch),
                BranchKind::Task {
                    kind,
                    issue_number: Some(42),
                    slug: "login-page".to_string(),
                }
            );
            assert_eq!(issue_number_of(&branch), Some(42));
        }
    }

    #[test]
    fn test_classify_task_branch_without_issue() {
        assert_eq!(
            classify("feature/quick-fix"),
            BranchKind::Task {
                kind: TaskKind::Feature,
                issue_number: None,
                slug: "quick-fix".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_release_and_other() {
        assert_eq!(
            classify("release/1.4.0"),
            BranchKind::Release {
                version: "1.4.0".to_string()
            }
        );
        assert_eq!(classify("develop"), BranchKind::Other);
        assert_eq!(classify("features/1-x"), BranchKind::Other);
        assert_eq!(issue_number_of("release/1.4.0"), None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Logout Button Broken"), "logout-button-broken");
        assert_eq!(slugify("  API v2 "), "api-v2");
    }
}
