//! `git` executable backed implementation of [`GitOps`]

use crate::error::{Error, Result};
use crate::repo::{GitOps, parse_porcelain_status, parse_submodule_paths};
use crate::types::{MAIN_BRANCH, ORIGIN, RepoStatus};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Runs `git` in directories below a fixed base directory
#[derive(Debug, Clone)]
pub struct GitCli {
    base: PathBuf,
}

impl GitCli {
    /// Create a facade rooted at `base` (made absolute against the process cwd)
    pub fn new(base: &Path) -> Result<Self> {
        let base = if base.is_absolute() {
            base.to_path_buf()
        } else {
            std::env::current_dir()?.join(base)
        };
        Ok(Self { base })
    }

    /// Base directory all relative paths are joined to
    pub fn base(&self) -> &Path {
        &self.base
    }

    async fn run(&self, args: &[&str], path: &str) -> Result<String> {
        self.run_in(&self.workdir(path), args).await
    }

    async fn run_in(&self, cwd: &Path, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        debug!("Running `{command}` in {}", cwd.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound && cwd.is_dir() {
                    Error::GitNotFound
                } else {
                    Error::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!("`{command}` failed: {stderr}");
            return Err(Error::Git { command, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[async_trait]
impl GitOps for GitCli {
    fn workdir(&self, path: &str) -> PathBuf {
        if path.is_empty() || path == "." {
            self.base.clone()
        } else {
            self.base.join(path)
        }
    }

    async fn toplevel(&self, path: &str) -> Result<PathBuf> {
        let dir = self.workdir(path);
        match self.run_in(&dir, &["rev-parse", "--show-toplevel"]).await {
            Ok(out) => Ok(PathBuf::from(out.trim())),
            Err(Error::Git { .. }) => Err(Error::NotAGitRepository(dir)),
            Err(e) => Err(e),
        }
    }

    async fn init(&self, path: &str) -> Result<()> {
        let initial = format!("--initial-branch={MAIN_BRANCH}");
        self.run(&["init", &initial], path).await?;
        Ok(())
    }

    async fn add_remote(&self, url: &str, path: &str) -> Result<()> {
        self.run(&["remote", "add", ORIGIN, url], path).await?;
        Ok(())
    }

    async fn fetch(&self, remote: &str, path: &str) -> Result<()> {
        self.run(&["fetch", remote], path).await?;
        Ok(())
    }

    async fn pull(&self, branch: &str, path: &str) -> Result<()> {
        self.run(&["pull", ORIGIN, branch], path).await?;
        Ok(())
    }

    async fn current_branch(&self, path: &str) -> Result<String> {
        let out = self.run(&["rev-parse", "--abbrev-ref", "HEAD"], path).await?;
        Ok(out.trim().to_string())
    }

    async fn create_branch(&self, name: &str, start_point: &str, path: &str) -> Result<()> {
        self.run(&["branch", name, start_point], path).await?;
        Ok(())
    }

    async fn switch_branch(&self, name: &str, path: &str) -> Result<()> {
        self.run(&["checkout", name], path).await?;
        Ok(())
    }

    async fn push_branch(&self, name: &str, set_upstream: bool, path: &str) -> Result<()> {
        let mut args = vec!["push"];
        if set_upstream {
            args.push("-u");
        }
        args.extend([ORIGIN, name]);
        self.run(&args, path).await?;
        Ok(())
    }

    async fn push_all(&self, path: &str) -> Result<()> {
        self.run(&["push", ORIGIN, "--all"], path).await?;
        Ok(())
    }

    async fn push_tags(&self, path: &str) -> Result<()> {
        self.run(&["push", ORIGIN, "--tags"], path).await?;
        Ok(())
    }

    async fn create_tag(&self, name: &str, message: &str, path: &str) -> Result<()> {
        self.run(&["tag", "-a", name, "-m", message], path).await?;
        Ok(())
    }

    async fn latest_tag(&self, path: &str) -> Result<Option<String>> {
        match self.run(&["describe", "--tags", "--abbrev=0"], path).await {
            Ok(tag) => Ok(Some(tag.trim().to_string()).filter(|t| !t.is_empty())),
            // No tags yet, or no commits yet
            Err(Error::Git { stderr, .. })
                if stderr.contains("No names found")
                    || stderr.contains("No tags can describe")
                    || stderr.contains("cannot describe anything") =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_tags(&self, path: &str) -> Result<Vec<String>> {
        let out = self.run(&["tag", "--list", "--sort=-v:refname"], path).await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    async fn list_submodules(&self, path: &str) -> Result<Vec<String>> {
        if !self.workdir(path).join(".gitmodules").is_file() {
            return Ok(Vec::new());
        }
        let args = [
            "config",
            "--file",
            ".gitmodules",
            "--get-regexp",
            r"^submodule\..*\.path$",
        ];
        match self.run(&args, path).await {
            Ok(out) => Ok(parse_submodule_paths(&out)),
            // `--get-regexp` exits 1 when nothing matches
            Err(Error::Git { stderr, .. }) if stderr.is_empty() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn stage(&self, files: &[String], path: &str) -> Result<()> {
        let mut args = vec!["add", "--"];
        args.extend(files.iter().map(String::as_str));
        self.run(&args, path).await?;
        Ok(())
    }

    async fn commit(&self, message: &str, path: &str) -> Result<()> {
        self.run(&["commit", "-m", message], path).await?;
        Ok(())
    }

    async fn remote_url(&self, remote: &str, path: &str) -> Result<String> {
        let out = self.run(&["remote", "get-url", remote], path).await?;
        Ok(out.trim().to_string())
    }

    async fn status(&self, path: &str) -> Result<RepoStatus> {
        let branch = self.current_branch(path).await?;
        let out = self.run(&["status", "--porcelain"], path).await?;
        Ok(parse_porcelain_status(&branch, &out))
    }

    async fn delete_local_branch(&self, name: &str, path: &str) -> Result<()> {
        self.run(&["branch", "-D", name], path).await?;
        Ok(())
    }

    async fn delete_remote_branch(&self, name: &str, path: &str) -> Result<()> {
        self.run(&["push", ORIGIN, "--delete", name], path).await?;
        Ok(())
    }

    async fn clone_into(&self, url: &str, repo_name: &str, target_dir: &str) -> Result<PathBuf> {
        let target = self.workdir(target_dir);
        let destination = target.join(repo_name);
        if destination.exists() {
            return Err(Error::InvalidInput(format!(
                "destination path '{}' already exists",
                destination.display()
            )));
        }
        std::fs::create_dir_all(&target)?;
        self.run_in(&target, &["clone", url, repo_name]).await?;
        Ok(destination)
    }

    async fn add_submodule(&self, url: &str, path: &str, parent_path: &str) -> Result<()> {
        self.run(&["submodule", "add", url, path], parent_path).await?;
        Ok(())
    }
}
