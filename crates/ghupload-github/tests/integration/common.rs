//! Shared test helpers for GitHub API integration tests
//!
//! Each helper mounts wiremock endpoints mimicking the GitHub REST API and
//! returns a client pointing at the mock server.

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghupload_github::client::GitHubClient;

pub const OWNER: &str = "octocat";
pub const REPO: &str = "demo";
pub const TOKEN: &str = "test-token";

/// Starts a mock server with `GET /user` answering as `octocat`, and returns
/// a (MockServer, GitHubClient) tuple.
pub async fn setup_github_mock() -> (MockServer, Arc<GitHubClient>) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "login": OWNER,
            "id": 1,
            "type": "User"
        })))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url(TOKEN, server.uri()).expect("valid mock URL");

    (server, Arc::new(client))
}

/// Contents API path for `file` in the test repository
pub fn contents_path(file: &str) -> String {
    format!("/repos/{OWNER}/{REPO}/contents/{file}")
}

/// Body GitHub returns for an existing file
pub fn file_body(file: &str, sha: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "file",
        "encoding": "base64",
        "size": 2,
        "name": file.rsplit('/').next().unwrap_or(file),
        "path": file,
        "content": "aGk=",
        "sha": sha
    })
}

/// Body GitHub returns for a successful PUT
pub fn put_body(file: &str, sha: &str) -> serde_json::Value {
    serde_json::json!({
        "content": file_body(file, sha),
        "commit": {"sha": "c0ffee", "message": "commit"}
    })
}

/// Body GitHub returns for a repository
pub fn repo_body(owner: &str, name: &str, private: bool) -> serde_json::Value {
    serde_json::json!({
        "id": 42,
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "owner": {"login": owner},
        "private": private,
        "html_url": format!("https://github.com/{owner}/{name}"),
        "default_branch": "main"
    })
}

/// Mounts a JSON error response for `verb` on `route`
pub async fn mount_error(server: &MockServer, verb: &str, route: &str, status: u16, message: &str) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "message": message,
                "documentation_url": "https://docs.github.com/rest"
            })),
        )
        .mount(server)
        .await;
}
