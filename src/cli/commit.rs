//! add, commit, ac, acp and push commands

use crate::cli::open_project;
use crate::cli::progress::CliProgress;
use crate::cli::prompt::DialoguerPrompter;
use crate::cli::style::{Stylize, check};
use anstream::println;
use gfr::error::Result;
use gfr::target::Target;
use gfr::workflow::{self, PushAction, WorkflowContext, run_fleet};
use std::path::Path;

/// Run the add command
pub async fn run_add(path: &Path, target: &str, files: &[String]) -> Result<()> {
    let git = open_project(path).await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
    workflow::add(&mut ctx, &Target::parse(target), files).await
}

/// Run the commit command
pub async fn run_commit(path: &Path, target: &str, message: &str) -> Result<()> {
    let git = open_project(path).await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
    workflow::commit(&mut ctx, &Target::parse(target), message).await
}

/// Run the ac command
pub async fn run_ac(path: &Path, target: &str, message: &str) -> Result<()> {
    let git = open_project(path).await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
    workflow::add_commit(&mut ctx, &Target::parse(target), message).await
}

/// Run the acp command
pub async fn run_acp(path: &Path, target: &str, message: &str) -> Result<()> {
    run_ac(path, target, message).await?;
    run_push(path).await?;
    println!(
        "\n{} {}",
        check(),
        "Add, commit and push completed".success()
    );
    Ok(())
}

/// Run the push command: every branch of the root, then each submodule
pub async fn run_push(path: &Path) -> Result<()> {
    let git = open_project(path).await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let ctx = WorkflowContext::new(&git, &prompter, &progress);
    let topology = ctx.topology().await?;

    println!(
        "Found {} submodule(s)",
        topology.submodules.len().to_string().accent()
    );
    run_fleet(ctx.git, &topology.root_first(), &PushAction, ctx.progress).await?;
    println!("\n{} {}", check(), "All repositories pushed".success());
    Ok(())
}
