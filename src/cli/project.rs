//! Project bootstrap commands plus dev, doc, addasset and hello

use crate::cli::open_project;
use crate::cli::progress::CliProgress;
use crate::cli::prompt::DialoguerPrompter;
use crate::cli::style::{Stream, Stylize, check, hyperlink_url};
use anstream::println;
use gfr::error::Result;
use gfr::platform::create_hosting_service;
use gfr::repo::GitCli;
use gfr::target::Selector;
use gfr::workflow::{
    BranchSwitch, ProjectCreated, WorkflowContext, add_asset, add_microservice, create_project,
    init_project, switch_to_branch,
};
use std::path::Path;

fn print_created(created: &ProjectCreated) {
    println!(
        "\n{} {} is ready at {}",
        check(),
        created.remote.full_name.accent(),
        created.path.display()
    );
    println!("  {}", hyperlink_url(Stream::Stdout, &created.remote.html_url));
}

/// Run the init command
pub async fn run_init(path: &Path) -> Result<()> {
    let git = GitCli::new(path)?;
    let platform = create_hosting_service().await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
    let created = init_project(&mut ctx, platform.as_ref()).await?;
    print_created(&created);
    Ok(())
}

/// Run the create command
pub async fn run_create(path: &Path) -> Result<()> {
    let git = GitCli::new(path)?;
    let platform = create_hosting_service().await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
    let created = create_project(&mut ctx, platform.as_ref()).await?;
    print_created(&created);
    Ok(())
}

/// Run the addmicro command
pub async fn run_addmicro(path: &Path, directory: &str) -> Result<()> {
    let git = GitCli::new(path)?;
    let platform = create_hosting_service().await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
    let created = add_microservice(&mut ctx, platform.as_ref(), directory).await?;
    print_created(&created);
    println!(
        "{}",
        "It has been added as a submodule to your current project.".muted()
    );
    Ok(())
}

/// Run the addasset command
pub async fn run_addasset(path: &Path, target: &str, asset: &str, dest: &str) -> Result<()> {
    let git = open_project(path).await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let mut ctx = WorkflowContext::new(&git, &prompter, &progress);
    let created = add_asset(&mut ctx, &Selector::parse(target), asset, dest).await?;
    println!(
        "\n{} Asset {} created",
        check(),
        created.display().to_string().accent()
    );
    println!(
        "{}",
        "Remember to stage and commit the new file using 'ggg add' and 'ggg commit'.".muted()
    );
    Ok(())
}

/// Run dev or doc
pub async fn run_switch(path: &Path, branch: &str) -> Result<()> {
    let git = open_project(path).await?;
    let (prompter, progress) = (DialoguerPrompter::default(), CliProgress::default());
    let ctx = WorkflowContext::new(&git, &prompter, &progress);
    if switch_to_branch(&ctx, branch).await? == BranchSwitch::AlreadyOn {
        println!(
            "{}",
            format!("You are already on the '{branch}' branch.").warn().for_stdout()
        );
    }
    Ok(())
}

/// Run the hello command
pub fn run_hello() {
    println!("Hello from Git Flow assistant of Rahmasir!");
}
