//! Repository contents API
//!
//! - `GET /repos/{owner}/{repo}/contents/{path}?ref={branch}` looks up a file
//! - `PUT /repos/{owner}/{repo}/contents/{path}` creates it, or replaces it
//!   when the current blob `sha` is supplied
//!
//! GitHub checks the supplied `sha` against the current blob and refuses the
//! write with 409 when they differ, which makes updates conditional.

use base64::Engine;
use ghupload_core::domain::newtypes::{BranchName, RelativePath};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::GitHubClient;
use crate::GitHubError;

/// Metadata returned for a file by the contents API
#[derive(Debug, Clone, Deserialize)]
pub struct ContentMetadata {
    /// Blob SHA of the current content
    pub sha: String,
    /// Path relative to the repository root
    pub path: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// `file`, `dir`, `symlink` or `submodule`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Response body of a successful `PUT`
#[derive(Debug, Clone, Deserialize)]
pub struct PutContentResponse {
    pub content: Option<ContentMetadata>,
    pub commit: CommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

/// Request body for `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    /// Base64-encoded file content
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

fn contents_segments<'a>(owner: &'a str, repo: &'a str, path: &'a RelativePath) -> Vec<&'a str> {
    let mut segments = vec!["repos", owner, repo, "contents"];
    segments.extend(path.segments());
    segments
}

/// Looks up `path` on `branch`
///
/// Returns `Ok(None)` when GitHub answers 404. A path that resolves to a
/// directory listing is [`GitHubError::NotAFile`].
pub async fn get_content(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    path: &RelativePath,
    branch: &BranchName,
) -> Result<Option<ContentMetadata>, GitHubError> {
    let response = client
        .request(Method::GET, &contents_segments(owner, repo, path))?
        .query(&[("ref", branch.as_str())])
        .send()
        .await?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        debug!(path = %path, branch = %branch, "Remote file absent");
        return Ok(None);
    }
    if !status.is_success() {
        return Err(GitHubError::from_response(response).await);
    }

    let body: serde_json::Value = response.json().await?;
    if body.is_array() {
        return Err(GitHubError::NotAFile(path.to_string()));
    }
    let metadata: ContentMetadata = serde_json::from_value(body)
        .map_err(|e| GitHubError::InvalidResponse(format!("contents of {path}: {e}")))?;
    if metadata.kind != "file" {
        return Err(GitHubError::NotAFile(path.to_string()));
    }

    debug!(path = %path, sha = %metadata.sha, size = metadata.size, "Remote file present");
    Ok(Some(metadata))
}

/// Creates `path` on `branch`, or replaces it when `sha` is given
#[allow(clippy::too_many_arguments)]
pub async fn put_content(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    path: &RelativePath,
    content: &[u8],
    message: &str,
    branch: &BranchName,
    sha: Option<&str>,
) -> Result<PutContentResponse, GitHubError> {
    let body = PutContentRequest {
        message,
        content: base64::engine::general_purpose::STANDARD.encode(content),
        branch: branch.as_str(),
        sha,
    };

    let response = client
        .request(Method::PUT, &contents_segments(owner, repo, path))?
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GitHubError::from_response(response).await);
    }

    let put: PutContentResponse = response
        .json()
        .await
        .map_err(|e| GitHubError::InvalidResponse(format!("PUT {path}: {e}")))?;
    debug!(path = %path, commit = %put.commit.sha, bytes = content.len(), "Wrote remote file");
    Ok(put)
}
