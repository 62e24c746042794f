//! CLI commands
//!
//! Command implementations for the `ggg` binary.

mod commit;
mod inspect;
mod progress;
mod project;
mod prompt;
mod release;
pub mod style;
mod task;

pub use commit::{run_ac, run_acp, run_add, run_commit, run_push};
pub use inspect::{run_link, run_status};
pub use project::{run_addasset, run_addmicro, run_create, run_hello, run_init, run_switch};
pub use release::run_release;
pub use task::run_task;

use anstream::eprintln;
use gfr::error::{Error, Result};
use gfr::repo::{GitCli, GitOps};
use gfr::types::ROOT_PATH;
use std::path::Path;
use style::Stylize;

/// Start or finish, for the lifecycle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LifecycleAction {
    /// Begin the lifecycle
    Start,
    /// Complete the lifecycle
    Finish,
}

/// Git facade rooted at the top level of the repository containing `path`
async fn open_project(path: &Path) -> Result<GitCli> {
    let git = GitCli::new(path)?;
    let root = git.toplevel(ROOT_PATH).await?;
    GitCli::new(&root)
}

/// Print a failed command's error
pub fn print_error(err: &Error) {
    eprintln!("{}: {err}", "error".error());
}

/// Print the notice for an operator-cancelled command
pub fn print_cancelled() {
    eprintln!("\n{}", "Operation cancelled by user.".warn());
}
