//! Repository operations
//!
//! [`GitOps`] is the seam between the workflows and the `git` executable.
//! Every path argument is relative to the facade's base directory (`.` for
//! the project root), so callers never depend on the process working
//! directory.

mod git;
mod parse;

pub use git::GitCli;
pub use parse::{parse_porcelain_status, parse_submodule_paths};

use crate::error::Result;
use crate::types::RepoStatus;
use async_trait::async_trait;
use std::path::PathBuf;

/// Git operations used by the workflows
#[async_trait]
pub trait GitOps: Send + Sync {
    /// Absolute directory for a relative repository path
    fn workdir(&self, path: &str) -> PathBuf;

    /// Whether `path` holds a git repository (`.git` directory or file)
    fn is_repository(&self, path: &str) -> bool {
        self.workdir(path).join(".git").exists()
    }

    /// Top-level directory of the repository containing `path`
    async fn toplevel(&self, path: &str) -> Result<PathBuf>;

    /// `git init` on `main`
    async fn init(&self, path: &str) -> Result<()>;

    /// Add the `origin` remote
    async fn add_remote(&self, url: &str, path: &str) -> Result<()>;

    /// Fetch a remote
    async fn fetch(&self, remote: &str, path: &str) -> Result<()>;

    /// Pull a branch from `origin`
    async fn pull(&self, branch: &str, path: &str) -> Result<()>;

    /// Name of the checked-out branch
    async fn current_branch(&self, path: &str) -> Result<String>;

    /// Create a branch at `start_point` without switching
    async fn create_branch(&self, name: &str, start_point: &str, path: &str) -> Result<()>;

    /// Check out an existing branch
    async fn switch_branch(&self, name: &str, path: &str) -> Result<()>;

    /// Push one branch to `origin`
    async fn push_branch(&self, name: &str, set_upstream: bool, path: &str) -> Result<()>;

    /// Push every local branch to `origin`
    async fn push_all(&self, path: &str) -> Result<()>;

    /// Push every tag to `origin`
    async fn push_tags(&self, path: &str) -> Result<()>;

    /// Create an annotated tag
    async fn create_tag(&self, name: &str, message: &str, path: &str) -> Result<()>;

    /// Most recent tag reachable from HEAD, if any
    async fn latest_tag(&self, path: &str) -> Result<Option<String>>;

    /// All tags, newest version first
    async fn list_tags(&self, path: &str) -> Result<Vec<String>>;

    /// Submodule paths declared in `.gitmodules`
    async fn list_submodules(&self, path: &str) -> Result<Vec<String>>;

    /// `git add <files>`
    async fn stage(&self, files: &[String], path: &str) -> Result<()>;

    /// `git commit -m <message>`
    async fn commit(&self, message: &str, path: &str) -> Result<()>;

    /// URL of a remote
    async fn remote_url(&self, remote: &str, path: &str) -> Result<String>;

    /// Branch plus staged, unstaged and untracked files
    async fn status(&self, path: &str) -> Result<RepoStatus>;

    /// Force-delete a local branch
    async fn delete_local_branch(&self, name: &str, path: &str) -> Result<()>;

    /// Delete a branch on `origin`
    async fn delete_remote_branch(&self, name: &str, path: &str) -> Result<()>;

    /// Clone `url` as `repo_name` inside `target_dir`, returning the new checkout
    async fn clone_into(&self, url: &str, repo_name: &str, target_dir: &str) -> Result<PathBuf>;

    /// Register `url` as a submodule at `path` of the repository at `parent_path`
    async fn add_submodule(&self, url: &str, path: &str, parent_path: &str) -> Result<()>;
}
