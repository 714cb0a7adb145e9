//! Repository and user endpoints
//!
//! - `GET /repos/{owner}/{repo}` - repository lookup (404 is `None`)
//! - `GET /user` - the account the token belongs to
//! - `POST /user/repos` - repository creation under that account

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::GitHubClient;
use crate::GitHubError;

/// Subset of the repository object returned by GitHub
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryResponse {
    pub name: String,
    pub full_name: String,
    pub owner: AccountResponse,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default)]
    pub private: bool,
    pub html_url: Option<String>,
}

fn default_branch() -> String {
    ghupload_core::domain::DEFAULT_BRANCH.to_string()
}

/// Subset of the user object returned by GitHub
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub login: String,
}

/// Request body for `POST /user/repos`
#[derive(Debug, Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    auto_init: bool,
}

/// Fetches `owner/name`, returning `Ok(None)` on 404
pub async fn get_repository(
    client: &GitHubClient,
    owner: &str,
    name: &str,
) -> Result<Option<RepositoryResponse>, GitHubError> {
    let response = client
        .request(Method::GET, &["repos", owner, name])?
        .send()
        .await?;

    if response.status() == StatusCode::NOT_FOUND {
        debug!(owner, name, "Repository not found");
        return Ok(None);
    }
    if !response.status().is_success() {
        return Err(GitHubError::from_response(response).await);
    }

    let repo: RepositoryResponse = response
        .json()
        .await
        .map_err(|e| GitHubError::InvalidResponse(format!("repository {owner}/{name}: {e}")))?;
    Ok(Some(repo))
}

/// Fetches the account the token authenticates as
pub async fn get_authenticated_user(client: &GitHubClient) -> Result<AccountResponse, GitHubError> {
    let response = client.request(Method::GET, &["user"])?.send().await?;

    if !response.status().is_success() {
        return Err(GitHubError::from_response(response).await);
    }

    let user: AccountResponse = response
        .json()
        .await
        .map_err(|e| GitHubError::InvalidResponse(format!("user: {e}")))?;
    debug!(login = %user.login, "Authenticated");
    Ok(user)
}

/// Creates an empty repository owned by the authenticated account
///
/// GitHub answers 422 when the name is already taken.
pub async fn create_repository(
    client: &GitHubClient,
    name: &str,
    description: &str,
    private: bool,
) -> Result<RepositoryResponse, GitHubError> {
    let body = CreateRepositoryRequest {
        name,
        description,
        private,
        auto_init: false,
    };

    let response = client
        .request(Method::POST, &["user", "repos"])?
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GitHubError::from_response(response).await);
    }

    let repo: RepositoryResponse = response
        .json()
        .await
        .map_err(|e| GitHubError::InvalidResponse(format!("created repository {name}: {e}")))?;
    info!(repo = %repo.full_name, private = repo.private, "Repository created on GitHub");
    Ok(repo)
}
