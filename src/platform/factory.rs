//! Platform service factory
//!
//! Creates the hosting service from the operator's credentials.

use crate::auth::get_github_credentials;
use crate::error::Result;
use crate::platform::{GitHubService, HostingService};

/// Create the hosting service
///
/// Credentials are checked before any client is built, so a missing value
/// fails without touching the network.
pub async fn create_hosting_service() -> Result<Box<dyn HostingService>> {
    let creds = get_github_credentials().await?;
    Ok(Box::new(GitHubService::new(
        &creds.token,
        creds.organization.clone(),
        creds.username.clone(),
        creds.api_base().as_deref(),
    )?))
}
