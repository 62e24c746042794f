//! Error types for gfr

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the library
#[derive(Debug, Error)]
pub enum Error {
    /// The working directory is not inside a git repository
    #[error("not a git repository: {}", .0.display())]
    NotAGitRepository(PathBuf),

    /// The selector names something that is not a submodule of the project
    #[error("'{0}' is not a valid submodule in this project")]
    UnknownSubmodule(String),

    /// `-` was used but no target has been recorded yet
    #[error("no last used microservice found, please specify a service")]
    NoLastUsedTarget,

    /// A git command exited non-zero
    #[error("git command failed: {command}\n{stderr}")]
    Git {
        /// The command line that was run
        command: String,
        /// Diagnostic output of the command
        stderr: String,
    },

    /// The git executable could not be started
    #[error("`git` command not found, is Git installed and in your PATH?")]
    GitNotFound,

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Repository creation was rejected with 422
    #[error("repository '{0}' likely already exists")]
    RepositoryExists(String),

    /// Missing or invalid credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Finishing a task while not on one of its branches
    #[error("you must be on a '{kind}/' branch to finish a {kind}, current branch is '{branch}'")]
    NotOnTaskBranch {
        /// Task kind (`feature` or `bugfix`)
        kind: String,
        /// Branch the target is actually on
        branch: String,
    },

    /// Finishing a release while not on a release branch
    #[error("you must be on a release branch to finish a release, current branch is '{0}'")]
    NotOnReleaseBranch(String),

    /// A release branch whose suffix cannot be tagged
    #[error("release branch suffix must be MAJOR.MINOR.PATCH, got '{0}'")]
    InvalidReleaseBranch(String),

    /// The asset destination already exists
    #[error("file '{}' already exists", .0.display())]
    AssetAlreadyExists(PathBuf),

    /// Unknown asset key
    #[error("asset '{key}' not found, available assets are: {available}")]
    AssetNotFound {
        /// Requested key
        key: String,
        /// Comma-separated list of known keys
        available: String,
    },

    /// A tag or branch suffix is not a `major.minor.patch` version
    #[error("invalid version '{0}', expected major.minor.patch")]
    InvalidVersion(String),

    /// Bad command input
    #[error("{0}")]
    InvalidInput(String),

    /// The state file could not be read or written
    #[error("state file error: {0}")]
    State(String),

    /// The operator interrupted an interactive step
    #[error("operation cancelled by user")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(source.message.clone()),
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::State(err.to_string())
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        let dialoguer::Error::IO(io) = err;
        if io.kind() == std::io::ErrorKind::Interrupted {
            Self::Cancelled
        } else {
            Self::Io(io)
        }
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
