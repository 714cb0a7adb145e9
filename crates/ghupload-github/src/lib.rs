//! ghupload GitHub - GitHub REST API adapter
//!
//! Provides async access to:
//! - The contents API (per-path lookup, create and update on a branch)
//! - Repository lookup and creation for the authenticated account
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client and endpoint construction
//! - [`contents`] - `GET`/`PUT /repos/{owner}/{repo}/contents/{path}`
//! - [`repos`] - `GET /repos/{owner}/{repo}`, `GET /user`, `POST /user/repos`
//! - [`provider`] - Implementations of the core `IRemoteStore` and
//!   `IRepositoryHost` ports

pub mod client;
pub mod contents;
pub mod provider;
pub mod repos;

use ghupload_core::ports::RemoteError;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when communicating with the GitHub API
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The token is missing, invalid or expired (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token lacks the required scope or access (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The resource changed concurrently (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request was well-formed but refused, e.g. missing `sha` (422)
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// Primary or secondary rate limit hit (429, or 403 with no remaining quota)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// A server-side error occurred (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status
    #[error("Unexpected status ({status}): {message}")]
    Status { status: u16, message: String },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The path refers to a directory, not a file
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// The configured API base URL cannot address endpoints
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// The kind of call an error came from. A 422 means different things for
/// creates and updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
}

/// Error body returned by the GitHub API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GitHubError {
    /// Classifies a non-success response
    ///
    /// Consumes the body to extract GitHub's `message` field.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let rate_limit_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("no message").to_string()
                } else {
                    body.clone()
                }
            });

        Self::from_status(status, rate_limit_exhausted, message)
    }

    /// Classifies a status code and message
    pub fn from_status(status: StatusCode, rate_limit_exhausted: bool, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN if rate_limit_exhausted => Self::RateLimited(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            StatusCode::UNPROCESSABLE_ENTITY => Self::Unprocessable(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(message),
            s if s.is_server_error() => Self::ServerError {
                status: s.as_u16(),
                message,
            },
            s => Self::Status {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Maps this error onto the port-level [`RemoteError`]
    pub fn into_remote(self, operation: Operation) -> RemoteError {
        match self {
            Self::Unauthorized(m) | Self::Forbidden(m) => RemoteError::Permission(m),
            Self::Conflict(m) => RemoteError::Conflict(m),
            // creating a path that already exists is reported as 422
            Self::Unprocessable(m) if operation == Operation::Create => RemoteError::Conflict(m),
            Self::Unprocessable(m) => RemoteError::Rejected {
                status: 422,
                message: m,
            },
            Self::NotFound(m) => RemoteError::Rejected {
                status: 404,
                message: m,
            },
            Self::RateLimited(m) => RemoteError::Transport(format!("rate limited: {m}")),
            Self::ServerError { status, message } => {
                RemoteError::Transport(format!("server error {status}: {message}"))
            }
            Self::NetworkError(e) => RemoteError::Transport(e.to_string()),
            Self::InvalidResponse(m) => RemoteError::Transport(format!("invalid response: {m}")),
            Self::Status { status, message } => RemoteError::Rejected { status, message },
            Self::NotAFile(path) => RemoteError::Rejected {
                status: 200,
                message: format!("{path} is a directory on the remote"),
            },
            Self::InvalidBaseUrl(m) => RemoteError::Rejected {
                status: 0,
                message: format!("invalid API base URL: {m}"),
            },
        }
    }
}
