//! GitHub REST API client
//!
//! Provides an authenticated HTTP client for the GitHub REST API v3.
//! Handles the authorization, user agent and media type headers, and builds
//! endpoint URLs from path segments so that file names are percent-encoded.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ghupload_github::client::GitHubClient;
//! use reqwest::Method;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = GitHubClient::new("ghp_token")?;
//! let response = client.request(Method::GET, &["user"])?.send().await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;
use url::Url;

use crate::GitHubError;

/// Base URL for the public GitHub REST API
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Media type recommended by GitHub for REST v3
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

const DEFAULT_USER_AGENT: &str = concat!("ghupload/", env!("CARGO_PKG_VERSION"));

/// HTTP client for GitHub REST API calls
///
/// Wraps `reqwest::Client` with the bearer token and base URL. The token is
/// opaque; it is never inspected or logged.
pub struct GitHubClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: Url,
    /// Personal access token or app token
    token: String,
    /// Value of the `User-Agent` header, which GitHub requires
    user_agent: String,
    /// Per-request limit, covering connect through the end of the body
    timeout: Option<Duration>,
}

impl GitHubClient {
    /// Creates a client for the public GitHub API
    ///
    /// # Arguments
    /// * `token` - A GitHub token with `repo` scope
    pub fn new(token: impl Into<String>) -> Result<Self, GitHubError> {
        Self::with_base_url(token, GITHUB_API_URL)
    }

    /// Creates a client with a custom base URL (GitHub Enterprise, or tests)
    ///
    /// # Arguments
    /// * `token` - A GitHub token
    /// * `base_url` - API root, e.g. `https://github.example.com/api/v3`
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl AsRef<str>,
    ) -> Result<Self, GitHubError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| GitHubError::InvalidBaseUrl(format!("{}: {e}", base_url.as_ref())))?;
        if base_url.cannot_be_a_base() {
            return Err(GitHubError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            token: token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        })
    }

    /// Bounds every request made through this client
    ///
    /// An elapsed timeout surfaces as [`GitHubError::NetworkError`], which
    /// maps to a transport failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GitHubError> {
        self.client = Client::builder().timeout(timeout).build()?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Overrides the `User-Agent` header
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Builds the URL for an endpoint given its path segments
    ///
    /// Each segment is percent-encoded on its own, so a segment may contain
    /// spaces, `#` or `?` without changing the URL structure.
    pub fn endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, GitHubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GitHubError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments.iter().map(AsRef::as_ref));
        Ok(url)
    }

    /// Creates an authenticated request builder for the given method and
    /// endpoint segments
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, PUT, ...)
    /// * `segments` - Path segments below the base URL, e.g. `["user", "repos"]`
    pub fn request<S: AsRef<str>>(
        &self,
        method: Method,
        segments: &[S],
    ) -> Result<RequestBuilder, GitHubError> {
        let url = self.endpoint(segments)?;
        debug!(%method, url = %url, "GitHub request");
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION))
    }
}
