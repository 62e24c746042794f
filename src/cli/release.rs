//! release command

use crate::cli::progress::CliProgress;
use crate::cli::prompt::DialoguerPrompter;
use crate::cli::style::{Stylize, check};
use crate::cli::{LifecycleAction, open_project};
use anstream::println;
use gfr::error::Result;
use gfr::platform::create_hosting_service;
use gfr::target::Selector;
use gfr::workflow::{CHANGELOG_FILE, WorkflowContext, finish_release, start_release};
use std::path::Path;

/// Run `release start|finish`
pub async fn run_release(path: &Path, target: &str, action: LifecycleAction) -> Result<()> {
    let git = open_project(path).await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let selector = Selector::parse(target);

    match action {
        LifecycleAction::Start => {
            let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
            let today = chrono::Local::now().date_naive();
            let started = start_release(&mut ctx, &selector, today).await?;
            println!(
                "\n{} Release {} started on {}",
                check(),
                started.version.to_string().accent(),
                started.branch.emphasis()
            );
            println!(
                "{}",
                format!("Review {CHANGELOG_FILE}, then run 'ggg add' and 'ggg commit'.").muted()
            );
        }
        LifecycleAction::Finish => {
            let platform = create_hosting_service().await?;
            let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
            let finished = finish_release(&mut ctx, platform.as_ref(), &selector).await?;
            println!(
                "\n{} Release {} has been published",
                check(),
                finished.version.to_string().accent()
            );
        }
    }
    Ok(())
}
