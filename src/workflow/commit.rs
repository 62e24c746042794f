//! Staging and committing
//!
//! A commit in a submodule is followed by a commit in the root project that
//! records the new submodule pointer, so the root history always says which
//! service moved and why.

use crate::error::Result;
use crate::target::{Target, Topology};
use crate::types::{ROOT_PATH, RepositoryHandle, issue_number_of};
use crate::workflow::{
    AddCommitAction, CommitAction, FleetAction, StageAction, WorkflowContext, run_fleet,
};
use tracing::{debug, info};

/// Commit message for the target repository, with ` (#n)` for a known issue
pub fn commit_message(message: &str, issue_number: Option<u64>) -> String {
    match issue_number {
        Some(n) => format!("{message} (#{n})"),
        None => message.to_string(),
    }
}

/// Root commit message recording a submodule commit
pub fn root_commit_message(service: &str, message: &str, issue_number: Option<u64>) -> String {
    match issue_number {
        Some(n) => format!("update {service} with issue number {n}: [{message}]"),
        None => format!("update {service}: [{message}]"),
    }
}

/// `add <target> <files...>`
pub async fn add(ctx: &mut WorkflowContext<'_>, target: &Target, files: &[String]) -> Result<()> {
    match target {
        Target::AllRepositories => {
            let topology = ctx.topology().await?;
            ctx.progress.on_step("Staging files in every repository").await;
            run_fleet(
                ctx.git,
                &topology.root_last(),
                &StageAction {
                    files: files.to_vec(),
                },
                ctx.progress,
            )
            .await?;
            ctx.progress.on_step_done("Staged changes in every repository").await;
            Ok(())
        }
        Target::One(selector) => {
            let repo = ctx.resolve(selector).await?;
            ctx.progress
                .on_step(&format!("Staging files in {}", repo.display_name))
                .await;
            ctx.git.stage(files, &repo.path).await?;
            ctx.progress
                .on_step_done(&format!("Staged changes in {}", repo.display_name))
                .await;
            ctx.remember(&repo)
        }
    }
}

/// `commit <target> <message>`
pub async fn commit(ctx: &mut WorkflowContext<'_>, target: &Target, message: &str) -> Result<()> {
    match target {
        Target::AllRepositories => {
            let topology = ctx.topology().await?;
            commit_fleet(ctx, &topology, &CommitAction {
                message: message.to_string(),
            })
            .await
        }
        Target::One(selector) => {
            let repo = ctx.resolve(selector).await?;
            commit_one(ctx, &repo, message).await?;
            ctx.remember(&repo)
        }
    }
}

/// `ac <target> <message>`: stage everything, then commit
pub async fn add_commit(
    ctx: &mut WorkflowContext<'_>,
    target: &Target,
    message: &str,
) -> Result<()> {
    match target {
        Target::AllRepositories => {
            let topology = ctx.topology().await?;
            commit_fleet(ctx, &topology, &AddCommitAction {
                message: message.to_string(),
            })
            .await
        }
        Target::One(_) => {
            add(ctx, target, &[ROOT_PATH.to_string()]).await?;
            commit(ctx, target, message).await
        }
    }
}

async fn commit_fleet<A>(ctx: &WorkflowContext<'_>, topology: &Topology, action: &A) -> Result<()>
where
    A: FleetAction<Output = bool>,
{
    ctx.progress.on_step("Committing in every repository").await;
    let report = run_fleet(ctx.git, &topology.root_last(), action, ctx.progress).await?;
    let committed: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|(_, r)| matches!(r, Ok(true)))
        .map(|(repo, _)| repo.display_name.as_str())
        .collect();
    if committed.is_empty() {
        ctx.progress.on_step_done("Nothing to commit").await;
    } else {
        ctx.progress
            .on_step_done(&format!("Committed in {}", committed.join(", ")))
            .await;
    }
    Ok(())
}

async fn commit_one(ctx: &WorkflowContext<'_>, repo: &RepositoryHandle, message: &str) -> Result<()> {
    let branch = ctx.git.current_branch(&repo.path).await?;
    let issue = issue_number_of(&branch);
    if let Some(n) = issue {
        debug!("Branch {branch} links issue #{n}");
        ctx.progress
            .on_message(&format!("Found issue number #{n} from branch '{branch}'"))
            .await;
    }

    ctx.progress
        .on_step(&format!("Committing in {}", repo.display_name))
        .await;
    ctx.git
        .commit(&commit_message(message, issue), &repo.path)
        .await?;
    ctx.progress
        .on_step_done(&format!("Committed in {}", repo.display_name))
        .await;

    if repo.is_root() {
        return Ok(());
    }

    ctx.progress
        .on_step(&format!(
            "Recording updated {} submodule in root project",
            repo.display_name
        ))
        .await;
    ctx.git.stage(&[repo.path.clone()], ROOT_PATH).await?;
    ctx.git
        .commit(&root_commit_message(&repo.path, message, issue), ROOT_PATH)
        .await?;
    info!("Committed submodule update for {} in root project", repo.path);
    ctx.progress
        .on_step_done("Committed submodule update in root project")
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_message_suffix() {
        assert_eq!(commit_message("Add login", Some(6)), "Add login (#6)");
        assert_eq!(commit_message("Add login", None), "Add login");
    }

    #[test]
    fn test_root_commit_message() {
        assert_eq!(
            root_commit_message("svcA", "Add login", None),
            "update svcA: [Add login]"
        );
        assert_eq!(
            root_commit_message("svcA", "Add login", Some(6)),
            "update svcA with issue number 6: [Add login]"
        );
    }
}
