//! Credentials for the hosting service
//!
//! Reads the token, organization and username from the environment (after
//! `.env` has been loaded by the binary), falling back to the `gh` CLI for
//! the token.

mod github;

pub use github::{GitHubCredentials, get_github_credentials, resolve_credentials};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the `gh` CLI
    Cli,
    /// Token from environment variable
    EnvVar,
}
