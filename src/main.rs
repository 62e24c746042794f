//! ggg - Git Flow assistant for multi-repository projects
//!
//! CLI binary driving a root project and its microservice submodules through
//! Git Flow, with issues, pull requests and releases on GitHub.

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::LifecycleAction;
use gfr::error::Error;
use gfr::types::{DEVELOP_BRANCH, DOC_BRANCH, TaskKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "ggg")]
#[command(about = "Git Flow assistant for a root project and its microservices")]
#[command(version)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage files in a repository ('.' root, '-' last used, a submodule, or ALL)
    Add {
        /// Target repository
        target: String,
        /// Files to stage ('.' for everything)
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Commit staged changes, recording submodule commits in the root
    Commit {
        /// Target repository ('.', '-', a submodule, or ALL)
        target: String,
        /// Commit message
        message: String,
    },

    /// Push all branches of the root project and every submodule
    Push,

    /// Stage everything and commit
    Ac {
        /// Target repository ('.', '-', a submodule, or ALL)
        target: String,
        /// Commit message
        message: String,
    },

    /// Stage everything, commit, and push every repository
    Acp {
        /// Target repository ('.', '-', a submodule, or ALL)
        target: String,
        /// Commit message
        message: String,
    },

    /// Show the working tree status of every repository
    Status,

    /// Show the GitHub link of every repository
    Link,

    /// Start or finish a feature
    Feature {
        /// Target repository ('.', '-', or a submodule)
        target: String,
        /// start or finish
        #[arg(value_enum)]
        action: LifecycleAction,
        /// Feature name (required for start)
        name: Vec<String>,
    },

    /// Start or finish a bugfix
    Bugfix {
        /// Target repository ('.', '-', or a submodule)
        target: String,
        /// start or finish
        #[arg(value_enum)]
        action: LifecycleAction,
        /// Bugfix name (required for start)
        name: Vec<String>,
    },

    /// Start or finish a release
    Release {
        /// Target repository ('.', '-', or a submodule)
        target: String,
        /// start or finish
        #[arg(value_enum)]
        action: LifecycleAction,
    },

    /// Create a file in a repository from a built-in asset
    #[command(visible_alias = "adda")]
    Addasset {
        /// Target repository ('.', '-', or a submodule)
        target: String,
        /// Asset key (e.g. mit)
        asset: String,
        /// File name to create
        dest: String,
    },

    /// Publish a directory as a new repository and add it as a submodule
    #[command(visible_alias = "am")]
    Addmicro {
        /// Directory holding the microservice
        directory: String,
    },

    /// Create a repository on GitHub and clone it here
    Create,

    /// Turn the current directory into a new Git Flow project on GitHub
    Init,

    /// Switch the root project to the develop branch
    Dev,

    /// Switch the root project to the doc branch
    Doc,

    /// Say hello
    Hello,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "gfr=debug,ggg=debug" } else { "gfr=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Commands, path: &Path) -> gfr::error::Result<()> {
    match command {
        Commands::Add { target, files } => cli::run_add(path, &target, &files).await,
        Commands::Commit { target, message } => cli::run_commit(path, &target, &message).await,
        Commands::Push => cli::run_push(path).await,
        Commands::Ac { target, message } => cli::run_ac(path, &target, &message).await,
        Commands::Acp { target, message } => cli::run_acp(path, &target, &message).await,
        Commands::Status => cli::run_status(path).await,
        Commands::Link => cli::run_link(path).await,
        Commands::Feature {
            target,
            action,
            name,
        } => cli::run_task(path, TaskKind::Feature, &target, action, &name.join(" ")).await,
        Commands::Bugfix {
            target,
            action,
            name,
        } => cli::run_task(path, TaskKind::Bugfix, &target, action, &name.join(" ")).await,
        Commands::Release { target, action } => cli::run_release(path, &target, action).await,
        Commands::Addasset {
            target,
            asset,
            dest,
        } => cli::run_addasset(path, &target, &asset, &dest).await,
        Commands::Addmicro { directory } => cli::run_addmicro(path, &directory).await,
        Commands::Create => cli::run_create(path).await,
        Commands::Init => cli::run_init(path).await,
        Commands::Dev => cli::run_switch(path, DEVELOP_BRANCH).await,
        Commands::Doc => cli::run_switch(path, DOC_BRANCH).await,
        Commands::Hello => {
            cli::run_hello();
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let command = tokio::spawn(async move { run(cli.command, &path).await });

    // Prompts block their worker thread, so the interrupt is watched here
    let outcome = tokio::select! {
        joined = command => joined?,
        _ = tokio::signal::ctrl_c() => Err(Error::Cancelled),
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(Error::Cancelled) => {
            cli::print_cancelled();
            // A prompt may still hold a worker thread; leave without joining it
            std::process::exit(0);
        }
        Err(e) => {
            cli::print_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
