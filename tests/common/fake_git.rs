//! In-memory git facade for workflow tests
//!
//! Records every call as `(path, command)` and keeps just enough state
//! (branches, staged files, tags, remotes) for the workflows to make
//! decisions. Files the workflows write go to a real base directory.

use async_trait::async_trait;
use gfr::error::{Error, Result};
use gfr::repo::GitOps;
use gfr::types::RepoStatus;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    in_repository: bool,
    submodules: Vec<String>,
    branches: HashMap<String, String>,
    pending: HashMap<String, Vec<String>>,
    staged: HashMap<String, Vec<String>>,
    tags: HashMap<String, Vec<String>>,
    remotes: HashMap<String, String>,
    calls: Vec<(String, String)>,
    failures: HashMap<(String, String), String>,
}

/// Fake [`GitOps`] with call tracking and failure injection
pub struct FakeGit {
    base: PathBuf,
    state: Mutex<State>,
}

impl FakeGit {
    /// A project at `base` with the given submodules, every repo on `develop`
    pub fn project(base: &Path, submodules: &[&str]) -> Self {
        let state = State {
            in_repository: true,
            submodules: submodules.iter().map(ToString::to_string).collect(),
            ..State::default()
        };
        Self {
            base: base.to_path_buf(),
            state: Mutex::new(state),
        }
    }

    /// A directory that is not inside any repository
    pub fn outside_repository(base: &Path) -> Self {
        let fake = Self::project(base, &[]);
        fake.state.lock().unwrap().in_repository = false;
        fake
    }

    // === Setup ===

    pub fn set_branch(&self, path: &str, branch: &str) {
        self.state
            .lock()
            .unwrap()
            .branches
            .insert(path.to_string(), branch.to_string());
    }

    /// Unstaged changes that `stage(["."])` will pick up
    pub fn set_pending(&self, path: &str, files: &[&str]) {
        self.state
            .lock()
            .unwrap()
            .pending
            .insert(path.to_string(), files.iter().map(ToString::to_string).collect());
    }

    pub fn set_staged(&self, path: &str, files: &[&str]) {
        self.state
            .lock()
            .unwrap()
            .staged
            .insert(path.to_string(), files.iter().map(ToString::to_string).collect());
    }

    /// Tags, newest first
    pub fn set_tags(&self, path: &str, tags: &[&str]) {
        self.state
            .lock()
            .unwrap()
            .tags
            .insert(path.to_string(), tags.iter().map(ToString::to_string).collect());
    }

    pub fn set_remote(&self, path: &str, url: &str) {
        self.state
            .lock()
            .unwrap()
            .remotes
            .insert(path.to_string(), url.to_string());
    }

    /// Make operation `op` fail in `path` with the given stderr
    pub fn fail(&self, op: &str, path: &str, stderr: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((op.to_string(), path.to_string()), stderr.to_string());
    }

    // === Verification ===

    /// Every call as `(path, command)`
    pub fn calls(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Commands run in `path`, in order
    pub fn calls_in(&self, path: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(p, _)| p == path)
            .map(|(_, c)| c)
            .collect()
    }

    /// Paths an operation ran in, in order
    pub fn paths_for(&self, op: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(_, c)| c == op || c.starts_with(&format!("{op} ")))
            .map(|(p, _)| p)
            .collect()
    }

    /// Mutating operations only, as `(path, command)`
    pub fn mutations(&self) -> Vec<(String, String)> {
        const READS: [&str; 7] = [
            "toplevel",
            "current_branch",
            "status",
            "latest_tag",
            "list_tags",
            "list_submodules",
            "remote_url",
        ];
        self.calls()
            .into_iter()
            .filter(|(_, c)| !READS.iter().any(|r| c == r || c.starts_with(&format!("{r} "))))
            .collect()
    }

    fn record(&self, op: &str, args: &[&str], path: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let command = if args.is_empty() {
            op.to_string()
        } else {
            format!("{op} {}", args.join(" "))
        };
        state.calls.push((path.to_string(), command.clone()));
        match state.failures.get(&(op.to_string(), path.to_string())) {
            Some(stderr) => Err(Error::Git {
                command: format!("git {command}"),
                stderr: stderr.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GitOps for FakeGit {
    fn workdir(&self, path: &str) -> PathBuf {
        if path.is_empty() || path == "." {
            self.base.clone()
        } else {
            self.base.join(path)
        }
    }

    async fn toplevel(&self, path: &str) -> Result<PathBuf> {
        self.record("toplevel", &[], path)?;
        if self.state.lock().unwrap().in_repository {
            Ok(self.base.clone())
        } else {
            Err(Error::NotAGitRepository(self.workdir(path)))
        }
    }

    async fn init(&self, path: &str) -> Result<()> {
        self.record("init", &[], path)
    }

    async fn add_remote(&self, url: &str, path: &str) -> Result<()> {
        self.record("add_remote", &[url], path)?;
        self.set_remote(path, url);
        Ok(())
    }

    async fn fetch(&self, remote: &str, path: &str) -> Result<()> {
        self.record("fetch", &[remote], path)
    }

    async fn pull(&self, branch: &str, path: &str) -> Result<()> {
        self.record("pull", &[branch], path)
    }

    async fn current_branch(&self, path: &str) -> Result<String> {
        self.record("current_branch", &[], path)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .branches
            .get(path)
            .cloned()
            .unwrap_or_else(|| "develop".to_string()))
    }

    async fn create_branch(&self, name: &str, start_point: &str, path: &str) -> Result<()> {
        self.record("create_branch", &[name, start_point], path)
    }

    async fn switch_branch(&self, name: &str, path: &str) -> Result<()> {
        self.record("switch_branch", &[name], path)?;
        self.set_branch(path, name);
        Ok(())
    }

    async fn push_branch(&self, name: &str, set_upstream: bool, path: &str) -> Result<()> {
        let upstream = if set_upstream { "-u" } else { "" };
        let args: Vec<&str> = [upstream, name].into_iter().filter(|a| !a.is_empty()).collect();
        self.record("push_branch", &args, path)
    }

    async fn push_all(&self, path: &str) -> Result<()> {
        self.record("push_all", &[], path)
    }

    async fn push_tags(&self, path: &str) -> Result<()> {
        self.record("push_tags", &[], path)
    }

    async fn create_tag(&self, name: &str, message: &str, path: &str) -> Result<()> {
        self.record("create_tag", &[name, message], path)?;
        self.state
            .lock()
            .unwrap()
            .tags
            .entry(path.to_string())
            .or_default()
            .insert(0, name.to_string());
        Ok(())
    }

    async fn latest_tag(&self, path: &str) -> Result<Option<String>> {
        self.record("latest_tag", &[], path)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .tags
            .get(path)
            .and_then(|t| t.first().cloned()))
    }

    async fn list_tags(&self, path: &str) -> Result<Vec<String>> {
        self.record("list_tags", &[], path)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .tags
            .get(path)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_submodules(&self, path: &str) -> Result<Vec<String>> {
        self.record("list_submodules", &[], path)?;
        Ok(self.state.lock().unwrap().submodules.clone())
    }

    async fn stage(&self, files: &[String], path: &str) -> Result<()> {
        let args: Vec<&str> = files.iter().map(String::as_str).collect();
        self.record("stage", &args, path)?;
        let mut state = self.state.lock().unwrap();
        let pending = state.pending.remove(path).unwrap_or_default();
        let picked: Vec<String> = if files.iter().any(|f| f == ".") {
            pending
        } else {
            files.to_vec()
        };
        state.staged.entry(path.to_string()).or_default().extend(picked);
        Ok(())
    }

    async fn commit(&self, message: &str, path: &str) -> Result<()> {
        self.record("commit", &[message], path)?;
        self.state.lock().unwrap().staged.remove(path);
        Ok(())
    }

    async fn remote_url(&self, remote: &str, path: &str) -> Result<String> {
        self.record("remote_url", &[remote], path)?;
        self.state
            .lock()
            .unwrap()
            .remotes
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Git {
                command: format!("git remote get-url {remote}"),
                stderr: format!("error: No such remote '{remote}'"),
            })
    }

    async fn status(&self, path: &str) -> Result<RepoStatus> {
        let branch = self.current_branch(path).await?;
        self.record("status", &[], path)?;
        let state = self.state.lock().unwrap();
        Ok(RepoStatus {
            branch,
            staged: state.staged.get(path).cloned().unwrap_or_default(),
            unstaged: state.pending.get(path).cloned().unwrap_or_default(),
            untracked: Vec::new(),
        })
    }

    async fn delete_local_branch(&self, name: &str, path: &str) -> Result<()> {
        self.record("delete_local_branch", &[name], path)
    }

    async fn delete_remote_branch(&self, name: &str, path: &str) -> Result<()> {
        self.record("delete_remote_branch", &[name], path)
    }

    async fn clone_into(&self, url: &str, repo_name: &str, target_dir: &str) -> Result<PathBuf> {
        self.record("clone_into", &[url, repo_name], target_dir)?;
        Ok(self.workdir(target_dir).join(repo_name))
    }

    async fn add_submodule(&self, url: &str, path: &str, parent_path: &str) -> Result<()> {
        self.record("add_submodule", &[url, path], parent_path)
    }
}
