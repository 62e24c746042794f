//! Workflow orchestrators
//!
//! Every command resolves its target once, then drives the git and hosting
//! facades through a fixed sequence of steps, one at a time. Steps that
//! already ran are left in place when a later step fails.

mod assets;
mod changelog;
mod commit;
mod fleet;
mod progress;
mod project;
mod prompt;
mod release;
mod task;

pub use assets::{ASSET_KEYS, add_asset, asset_content};
pub use changelog::{
    CHANGELOG_FILE, CHANGELOG_TEMPLATE, ChangelogEntry, insert_entry, release_notes,
};
pub use commit::{add, add_commit, commit, commit_message, root_commit_message};
pub use fleet::{
    Access, AddCommitAction, CommitAction, FleetAction, FleetReport, LinkAction, PushAction,
    StageAction, StatusAction, run_fleet,
};
pub use progress::{NoopProgress, ProgressCallback};
pub use project::{
    BranchSwitch, ProjectCreated, add_microservice, create_project, init_project, switch_to_branch,
};
pub use prompt::{MULTILINE_TERMINATOR, Prompter, read_list, read_multiline};
pub use release::{RELEASE_PR_BASES, ReleaseFinished, ReleaseStarted, finish_release, start_release};
pub use task::{TaskFinished, TaskStarted, finish_task, pr_title, start_task};

use crate::error::Result;
use crate::repo::GitOps;
use crate::state::StateStore;
use crate::target::{Selector, Topology, resolve};
use crate::types::{ROOT_PATH, RepositoryHandle};
use tracing::debug;

/// Facades and state shared by every workflow
pub struct WorkflowContext<'a> {
    /// Git facade rooted at the project directory
    pub git: &'a dyn GitOps,
    /// Operator prompts
    pub prompter: &'a dyn Prompter,
    /// Progress reporting
    pub progress: &'a dyn ProgressCallback,
    /// Last-used target store of the project
    pub state: StateStore,
}

impl<'a> WorkflowContext<'a> {
    /// Bundle the facades with the state store of the project at the git base
    pub fn new(
        git: &'a dyn GitOps,
        prompter: &'a dyn Prompter,
        progress: &'a dyn ProgressCallback,
    ) -> Self {
        let state = StateStore::for_root(&git.workdir(ROOT_PATH));
        Self {
            git,
            prompter,
            progress,
            state,
        }
    }

    /// Root name and submodule list of the project
    pub async fn topology(&self) -> Result<Topology> {
        let root_dir = self.git.workdir(ROOT_PATH);
        let root_name = root_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let submodules = self.git.list_submodules(ROOT_PATH).await?;
        debug!("Project {root_name} has submodules {submodules:?}");
        Ok(Topology {
            root_name,
            submodules,
        })
    }

    /// Resolve a selector against the current topology and stored state
    pub async fn resolve(&mut self, selector: &Selector) -> Result<RepositoryHandle> {
        let topology = self.topology().await?;
        let last_used = match selector {
            Selector::LastUsed => self.state.last_used()?,
            _ => None,
        };
        let handle = resolve(selector, &topology, last_used.as_deref())?;
        debug!("Resolved {selector} to {}", handle.path);
        Ok(handle)
    }

    /// Persist `handle` as the last target
    pub fn remember(&mut self, handle: &RepositoryHandle) -> Result<()> {
        self.state.set_last_used(&handle.path)
    }
}
