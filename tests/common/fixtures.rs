//! Test data factories for gfr types

use gfr::repo::GitOps;
use gfr::state::{STATE_FILE_NAME, StateStore};
use gfr::types::{PullRequest, RemoteRepo};
use gfr::workflow::{NoopProgress, Prompter, WorkflowContext};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Create a remote repository in `owner`
pub fn make_remote_repo(owner: &str, name: &str) -> RemoteRepo {
    RemoteRepo {
        owner: owner.to_string(),
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        html_url: format!("https://github.com/{owner}/{name}"),
        clone_url: format!("https://github.com/{owner}/{name}.git"),
    }
}

/// Create a pull request
pub fn make_pr(number: u64, head: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/acme/shop/pull/{number}"),
        base_ref: base.to_string(),
        head_ref: head.to_string(),
        title: format!("PR for {head}"),
    }
}

/// Workflow context over the given fakes with silent progress
pub fn context<'a>(git: &'a dyn GitOps, prompter: &'a dyn Prompter) -> WorkflowContext<'a> {
    static PROGRESS: NoopProgress = NoopProgress;
    WorkflowContext::new(git, prompter, &PROGRESS)
}

/// Write the state file of a project directly
pub fn write_state(root: &Path, last_used: &str) {
    fs::write(
        root.join(STATE_FILE_NAME),
        format!("last_used_microservice: {last_used}\n"),
    )
    .unwrap();
}

/// Read the stored last target of a project
pub fn read_last_used(root: &Path) -> Option<String> {
    StateStore::for_root(root).last_used().unwrap()
}

/// Whether a usable `git` binary is on PATH
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Run git in `dir`, panicking on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Initialize a repository on `main` with one commit and a local identity
pub fn init_repo(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "-q", "-b", "main"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "tag.gpgsign", "false"]);
    fs::write(dir.join("README.md"), "# test\n").unwrap();
    git(dir, &["add", "README.md"]);
    git(dir, &["commit", "-q", "-m", "Initial commit"]);
}
