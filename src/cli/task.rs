//! feature and bugfix commands

use crate::cli::progress::CliProgress;
use crate::cli::prompt::DialoguerPrompter;
use crate::cli::style::{Stylize, check};
use crate::cli::{LifecycleAction, open_project};
use anstream::println;
use gfr::error::Result;
use gfr::platform::create_hosting_service;
use gfr::target::Selector;
use gfr::types::TaskKind;
use gfr::workflow::{WorkflowContext, finish_task, start_task};
use std::path::Path;

/// Run `feature` or `bugfix`
pub async fn run_task(
    path: &Path,
    kind: TaskKind,
    target: &str,
    action: LifecycleAction,
    name: &str,
) -> Result<()> {
    let git = open_project(path).await?;
    let platform = create_hosting_service().await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
    let selector = Selector::parse(target);

    match action {
        LifecycleAction::Start => {
            let started = start_task(&mut ctx, platform.as_ref(), kind, &selector, name).await?;
            println!(
                "\n{} Started {kind} on {} in {}",
                check(),
                started.branch.accent(),
                started.repo.display_name.emphasis()
            );
        }
        LifecycleAction::Finish => {
            let finished = finish_task(&mut ctx, platform.as_ref(), kind, &selector).await?;
            println!(
                "\n{} {} merged in {}",
                check(),
                finished.pr.title.accent(),
                finished.repo.display_name.emphasis()
            );
        }
    }
    Ok(())
}
