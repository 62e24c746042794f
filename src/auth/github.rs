//! GitHub credentials

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use std::env;
use tokio::process::Command;

/// Environment variable holding the API token
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
/// Environment variable naming the organization repositories live in
pub const ORGANIZATION_VAR: &str = "GITHUB_ORGANIZATION";
/// Environment variable naming the user issues and PRs are assigned to
pub const USERNAME_VAR: &str = "GITHUB_USERNAME";
/// Environment variable selecting a GitHub Enterprise host
pub const HOST_VAR: &str = "GH_HOST";

/// Everything needed to talk to GitHub on behalf of the operator
#[derive(Debug, Clone)]
pub struct GitHubCredentials {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
    /// Organization repositories are created in
    pub organization: String,
    /// Login issues and pull requests are assigned to
    pub username: String,
    /// Enterprise hostname, `None` for github.com
    pub host: Option<String>,
}

impl GitHubCredentials {
    /// API root for the configured host
    pub fn api_base(&self) -> Option<String> {
        self.host
            .as_deref()
            .filter(|h| *h != "github.com")
            .map(|h| format!("https://{h}/api/v3"))
    }
}

/// Build credentials from a variable lookup and an optional `gh` CLI token
///
/// Environment tokens win over the CLI token. Every missing value is named in
/// the error.
pub fn resolve_credentials(
    lookup: impl Fn(&str) -> Option<String>,
    cli_token: Option<String>,
) -> Result<GitHubCredentials> {
    let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let token = get(TOKEN_VAR)
        .or_else(|| get("GH_TOKEN"))
        .map(|t| (t, AuthSource::EnvVar))
        .or_else(|| cli_token.map(|t| (t, AuthSource::Cli)));
    let organization = get(ORGANIZATION_VAR);
    let username = get(USERNAME_VAR);

    let mut missing = Vec::new();
    if token.is_none() {
        missing.push(TOKEN_VAR);
    }
    if organization.is_none() {
        missing.push(ORGANIZATION_VAR);
    }
    if username.is_none() {
        missing.push(USERNAME_VAR);
    }

    match (token, organization, username) {
        (Some((token, source)), Some(organization), Some(username)) => Ok(GitHubCredentials {
            token,
            source,
            organization,
            username,
            host: get(HOST_VAR),
        }),
        _ => Err(Error::Auth(format!(
            "missing {}. Set them in the environment or a .env file",
            missing.join(", ")
        ))),
    }
}

/// Load GitHub credentials from the process environment
///
/// Priority for the token:
/// 1. `GITHUB_TOKEN` environment variable
/// 2. `GH_TOKEN` environment variable
/// 3. gh CLI (`gh auth token`)
pub async fn get_github_credentials() -> Result<GitHubCredentials> {
    let has_env_token = ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .any(|name| env::var(name).is_ok_and(|v| !v.trim().is_empty()));
    let cli_token = if has_env_token {
        None
    } else {
        get_gh_cli_token().await
    };

    resolve_credentials(|name| env::var(name).ok(), cli_token)
}

async fn get_gh_cli_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_token_wins_over_cli() {
        let creds = resolve_credentials(
            lookup(&[
                ("GITHUB_TOKEN", "env-token"),
                ("GITHUB_ORGANIZATION", "acme"),
                ("GITHUB_USERNAME", "octo"),
            ]),
            Some("cli-token".to_string()),
        )
        .unwrap();
        assert_eq!(creds.token, "env-token");
        assert_eq!(creds.source, AuthSource::EnvVar);
        assert_eq!(creds.organization, "acme");
        assert_eq!(creds.username, "octo");
        assert_eq!(creds.api_base(), None);
    }

    #[test]
    fn test_cli_token_fallback() {
        let creds = resolve_credentials(
            lookup(&[("GITHUB_ORGANIZATION", "acme"), ("GITHUB_USERNAME", "octo")]),
            Some("cli-token".to_string()),
        )
        .unwrap();
        assert_eq!(creds.token, "cli-token");
        assert_eq!(creds.source, AuthSource::Cli);
    }

    #[test]
    fn test_missing_values_are_named() {
        let err = resolve_credentials(lookup(&[("GITHUB_TOKEN", "t"), ("GITHUB_USERNAME", " ")]), None)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("GITHUB_ORGANIZATION"));
        assert!(msg.contains("GITHUB_USERNAME"));
        assert!(!msg.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_enterprise_host() {
        let creds = resolve_credentials(
            lookup(&[
                ("GITHUB_TOKEN", "t"),
                ("GITHUB_ORGANIZATION", "acme"),
                ("GITHUB_USERNAME", "octo"),
                ("GH_HOST", "git.example.com"),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(creds.api_base().as_deref(), Some("https://git.example.com/api/v3"));
    }
}
