//! status and link commands

use crate::cli::open_project;
use crate::cli::prompt::DialoguerPrompter;
use crate::cli::style::{Stream, Stylize, cross, hyperlink_url};
use anstream::println;
use gfr::error::Result;
use gfr::types::RepositoryHandle;
use gfr::workflow::{LinkAction, NoopProgress, StatusAction, WorkflowContext, run_fleet};
use std::path::Path;

fn listing_name(repo: &RepositoryHandle) -> &str {
    if repo.is_root() {
        "root"
    } else {
        &repo.display_name
    }
}

/// Run the status command
///
/// A repository whose status cannot be read is reported in place and the
/// remaining repositories are still shown.
pub async fn run_status(path: &Path) -> Result<()> {
    let git = open_project(path).await?;
    let prompter = DialoguerPrompter::default();
    let ctx = WorkflowContext::new(&git, &prompter, &NoopProgress);
    let topology = ctx.topology().await?;
    let report = run_fleet(ctx.git, &topology.root_first(), &StatusAction, ctx.progress).await?;

    println!("\n{}", "Project Status Overview".emphasis());
    for (repo, outcome) in &report.outcomes {
        let name = listing_name(repo);
        let status = match outcome {
            Ok(status) => status,
            Err(e) => {
                println!(
                    "{} {}: {}",
                    cross().for_stdout(),
                    name.accent(),
                    e.to_string().error().for_stdout()
                );
                continue;
            }
        };

        println!("{}: {}", name.accent(), status.branch.warn().for_stdout());
        for (heading, files, staged) in [
            ("Staged changes", &status.staged, true),
            ("Unstaged changes", &status.unstaged, false),
            ("Untracked changes", &status.untracked, false),
        ] {
            if files.is_empty() {
                continue;
            }
            println!("  {heading}:");
            for file in files {
                if staged {
                    println!("  - {}", file.success());
                } else {
                    println!("  - {}", file.error().for_stdout());
                }
            }
        }
    }
    Ok(())
}

/// Run the link command
pub async fn run_link(path: &Path) -> Result<()> {
    let git = open_project(path).await?;
    let prompter = DialoguerPrompter::default();
    let ctx = WorkflowContext::new(&git, &prompter, &NoopProgress);
    let topology = ctx.topology().await?;
    let report = run_fleet(ctx.git, &topology.root_first(), &LinkAction, ctx.progress).await?;

    let width = report
        .outcomes
        .iter()
        .map(|(repo, _)| listing_name(repo).len())
        .max()
        .unwrap_or(0);

    println!("{}", "Project GitHub Links".emphasis());
    for (repo, outcome) in &report.outcomes {
        let name = format!("{:width$}", listing_name(repo));
        match outcome {
            Ok(Some(url)) => println!("  {}  {}", name.accent(), hyperlink_url(Stream::Stdout, url)),
            Ok(None) | Err(_) => println!("  {}  {}", name.accent(), "No remote found".muted()),
        }
    }
    Ok(())
}
