//! Project and microservice bootstrap, plus branch shortcuts

use crate::error::{Error, Result};
use crate::platform::HostingService;
use crate::types::{
    DEVELOP_BRANCH, DOC_BRANCH, MAIN_BRANCH, NewRepository, ORIGIN, ROOT_PATH, RemoteRepo,
};
use crate::workflow::WorkflowContext;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// A repository created on GitHub and set up locally
#[derive(Debug, Clone)]
pub struct ProjectCreated {
    /// Repository on the hosting service
    pub remote: RemoteRepo,
    /// Local working directory
    pub path: PathBuf,
}

/// Outcome of `dev` / `doc`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchSwitch {
    /// The branch was already checked out
    AlreadyOn,
    /// The branch is now checked out
    Switched,
}

struct RepositoryDetails {
    name: String,
    description: String,
    private: bool,
}

fn ask_details(
    ctx: &WorkflowContext<'_>,
    default_name: Option<&str>,
    private_first: bool,
) -> Result<RepositoryDetails> {
    let name = ctx
        .prompter
        .input("Enter repository name", default_name)?
        .trim()
        .to_string();
    if name.is_empty() {
        return Err(Error::InvalidInput("repository name cannot be empty".to_string()));
    }
    let description = ctx.prompter.input("Enter repository description", None)?;
    let choices = if private_first {
        ["Private", "Public"]
    } else {
        ["Public", "Private"]
    };
    let choice = ctx
        .prompter
        .select("Select repository visibility", &choices, 0)?;
    let private = choices.get(choice) == Some(&"Private");

    Ok(RepositoryDetails {
        name,
        description: description.trim().to_string(),
        private,
    })
}

fn dir_name(ctx: &WorkflowContext<'_>, path: &str) -> String {
    ctx.git
        .workdir(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `init`: turn the current directory into a new project on GitHub
///
/// The remote is created with a README, then `main` is fetched and `develop`
/// and `doc` branch off it. `develop` becomes the default branch.
pub async fn init_project(
    ctx: &mut WorkflowContext<'_>,
    platform: &dyn HostingService,
) -> Result<ProjectCreated> {
    if ctx.git.is_repository(ROOT_PATH) {
        return Err(Error::InvalidInput(
            "this directory already holds a git repository".to_string(),
        ));
    }

    let default_name = dir_name(ctx, ROOT_PATH);
    let details = ask_details(ctx, Some(&default_name), false)?;

    ctx.progress
        .on_step(&format!(
            "Creating repository {}/{}",
            platform.organization(),
            details.name
        ))
        .await;
    let remote = platform
        .create_repo(&NewRepository {
            name: details.name,
            description: details.description,
            private: details.private,
            auto_init: true,
        })
        .await?;
    ctx.progress
        .on_step_done(&format!("Created {}", remote.full_name))
        .await;

    ctx.progress.on_step("Initializing local repository").await;
    ctx.git.init(ROOT_PATH).await?;
    ctx.git.add_remote(&remote.clone_url, ROOT_PATH).await?;
    ctx.git.fetch(ORIGIN, ROOT_PATH).await?;
    ctx.git.switch_branch(MAIN_BRANCH, ROOT_PATH).await?;
    ctx.progress
        .on_step_done(&format!("Checked out {MAIN_BRANCH} from origin"))
        .await;

    ctx.progress
        .on_step(&format!("Creating {DEVELOP_BRANCH} and {DOC_BRANCH}"))
        .await;
    for branch in [DEVELOP_BRANCH, DOC_BRANCH] {
        ctx.git.create_branch(branch, MAIN_BRANCH, ROOT_PATH).await?;
        ctx.git.push_branch(branch, true, ROOT_PATH).await?;
    }
    platform.set_default_branch(&remote, DEVELOP_BRANCH).await?;
    ctx.git.switch_branch(DEVELOP_BRANCH, ROOT_PATH).await?;
    ctx.progress
        .on_step_done(&format!("Pushed branches, {DEVELOP_BRANCH} is the default"))
        .await;

    info!("Initialized project {}", remote.full_name);
    Ok(ProjectCreated {
        remote,
        path: ctx.git.workdir(ROOT_PATH),
    })
}

/// `create`: create a repository on GitHub and clone it here
pub async fn create_project(
    ctx: &mut WorkflowContext<'_>,
    platform: &dyn HostingService,
) -> Result<ProjectCreated> {
    let details = ask_details(ctx, None, false)?;
    let readme = ctx
        .prompter
        .confirm("Initialize the repository with a README?", true)?;

    ctx.progress
        .on_step(&format!(
            "Creating repository {}/{}",
            platform.organization(),
            details.name
        ))
        .await;
    let remote = platform
        .create_repo(&NewRepository {
            name: details.name,
            description: details.description,
            private: details.private,
            auto_init: readme,
        })
        .await?;
    ctx.progress
        .on_step_done(&format!("Created {}", remote.full_name))
        .await;

    ctx.progress
        .on_step(&format!("Cloning {}", remote.full_name))
        .await;
    let path = ctx
        .git
        .clone_into(&remote.clone_url, &remote.name, ROOT_PATH)
        .await?;
    ctx.progress
        .on_step_done(&format!("Cloned into {}", path.display()))
        .await;

    Ok(ProjectCreated { remote, path })
}

/// `addmicro <directory>`: publish a directory as a new repository and
/// register it as a submodule of the current project
pub async fn add_microservice(
    ctx: &mut WorkflowContext<'_>,
    platform: &dyn HostingService,
    directory: &str,
) -> Result<ProjectCreated> {
    ctx.git.toplevel(ROOT_PATH).await?;
    let path = ctx.git.workdir(directory);
    if !path.is_dir() {
        return Err(Error::InvalidInput(format!(
            "directory '{directory}' not found"
        )));
    }
    if ctx.git.is_repository(directory) {
        return Err(Error::InvalidInput(format!(
            "'{directory}' is already a git repository"
        )));
    }

    let default_name = dir_name(ctx, directory);
    let details = ask_details(ctx, Some(&default_name), true)?;

    ctx.progress
        .on_step(&format!(
            "Creating repository {}/{}",
            platform.organization(),
            details.name
        ))
        .await;
    let remote = platform
        .create_repo(&NewRepository {
            name: details.name,
            description: details.description,
            private: details.private,
            auto_init: false,
        })
        .await?;
    ctx.progress
        .on_step_done(&format!("Created {}", remote.full_name))
        .await;

    ctx.progress
        .on_step(&format!("Initializing repository in {directory}"))
        .await;
    ctx.git.init(directory).await?;
    ctx.git.add_remote(&remote.clone_url, directory).await?;
    fs::write(path.join(".gitkeep"), "")?;
    ctx.git.stage(&[".gitkeep".to_string()], directory).await?;
    ctx.git.commit("Initial commit", directory).await?;
    ctx.progress.on_step_done("Created initial commit").await;

    ctx.progress
        .on_step(&format!("Pushing {MAIN_BRANCH} and {DEVELOP_BRANCH}"))
        .await;
    ctx.git.create_branch(DEVELOP_BRANCH, "HEAD", directory).await?;
    ctx.git.push_branch(MAIN_BRANCH, true, directory).await?;
    ctx.git.push_branch(DEVELOP_BRANCH, true, directory).await?;
    ctx.git.switch_branch(DEVELOP_BRANCH, directory).await?;
    ctx.progress
        .on_step_done(&format!("Pushed branches, switched to {DEVELOP_BRANCH}"))
        .await;

    ctx.progress
        .on_step("Adding submodule to the parent project")
        .await;
    ctx.git
        .add_submodule(&remote.clone_url, directory, ROOT_PATH)
        .await?;
    ctx.progress
        .on_step_done(&format!("Added {directory} as a submodule"))
        .await;

    info!("Microservice {} added at {directory}", remote.full_name);
    Ok(ProjectCreated { remote, path })
}

/// `dev` / `doc`: check out a long-lived branch of the root project
pub async fn switch_to_branch(ctx: &WorkflowContext<'_>, branch: &str) -> Result<BranchSwitch> {
    let current = ctx.git.current_branch(ROOT_PATH).await?;
    if current == branch {
        return Ok(BranchSwitch::AlreadyOn);
    }

    ctx.progress
        .on_step(&format!("Switching to branch {branch}"))
        .await;
    match ctx.git.switch_branch(branch, ROOT_PATH).await {
        Ok(()) => {
            ctx.progress
                .on_step_done(&format!("Switched to branch {branch}"))
                .await;
            Ok(BranchSwitch::Switched)
        }
        Err(Error::Git { stderr, .. })
            if stderr.contains("did not match any file(s) known to git") =>
        {
            Err(Error::InvalidInput(format!(
                "branch '{branch}' does not exist locally. Try running `git fetch` or creating it first"
            )))
        }
        Err(e) => Err(e),
    }
}
