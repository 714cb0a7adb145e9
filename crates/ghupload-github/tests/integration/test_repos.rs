//! Integration tests for repository resolution and creation

use std::sync::Arc;
use std::time::{Duration, Instant};

use ghupload_core::domain::newtypes::RepoSlug;
use ghupload_core::ports::{IRepositoryHost, NewRepository, RemoteError};
use ghupload_core::usecases::{EnsureRepositoryUseCase, RepositoryError};
use ghupload_github::client::GitHubClient;
use ghupload_github::provider::GitHubRepositoryHost;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::{self, OWNER};

async fn mount_repo(server: &MockServer, owner: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{owner}/{name}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::repo_body(owner, name, false)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_with_explicit_owner() {
    let (server, client) = common::setup_github_mock().await;
    mount_repo(&server, "rust-lang", "book").await;

    let host = GitHubRepositoryHost::new(client);
    let info = host
        .resolve(&RepoSlug::parse("rust-lang/book").unwrap())
        .await
        .expect("resolve failed")
        .expect("repository should exist");

    assert_eq!(info.slug.to_string(), "rust-lang/book");
    assert_eq!(info.default_branch, "main");
    assert_eq!(info.html_url.as_deref(), Some("https://github.com/rust-lang/book"));

    // no owner lookup needed
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/user"));
}

#[tokio::test]
async fn test_resolve_bare_name_uses_authenticated_login() {
    let (server, client) = common::setup_github_mock().await;
    mount_repo(&server, OWNER, "demo").await;

    let host = GitHubRepositoryHost::new(client);
    let info = host
        .resolve(&RepoSlug::parse("demo").unwrap())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(info.slug.owner(), Some(OWNER));
    assert_eq!(info.slug.name(), "demo");
}

#[tokio::test]
async fn test_authenticated_login_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"login": OWNER})))
        .expect(1)
        .mount(&server)
        .await;
    let client = GitHubClient::with_base_url("t", server.uri()).unwrap();

    let host = GitHubRepositoryHost::new(Arc::new(client));
    assert_eq!(host.authenticated_login().await.unwrap(), OWNER);
    assert_eq!(host.authenticated_login().await.unwrap(), OWNER);
}

#[tokio::test]
async fn test_bad_token_fails_login_with_permission_error() {
    let server = MockServer::start().await;
    common::mount_error(&server, "GET", "/user", 401, "Bad credentials").await;
    let client = GitHubClient::with_base_url("bad", server.uri()).unwrap();

    let host = GitHubRepositoryHost::new(Arc::new(client));
    let err = host.authenticated_login().await.unwrap_err();

    assert_eq!(err, RemoteError::Permission("Bad credentials".into()));
}

#[tokio::test]
async fn test_resolve_missing_repository_is_none() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_error(&server, "GET", "/repos/octocat/missing", 404, "Not Found").await;

    let host = GitHubRepositoryHost::new(client);
    let found = host
        .resolve(&RepoSlug::parse("octocat/missing").unwrap())
        .await
        .unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_create_repository() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .and(body_partial_json(serde_json::json!({
            "name": "fresh",
            "description": "Uploaded project",
            "private": true
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(common::repo_body(OWNER, "fresh", true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let host = GitHubRepositoryHost::new(client);
    let info = host
        .create(&NewRepository {
            name: "fresh".into(),
            description: "Uploaded project".into(),
            private: true,
        })
        .await
        .expect("create failed");

    assert_eq!(info.slug.to_string(), "octocat/fresh");
    assert!(info.private);
}

#[tokio::test]
async fn test_create_existing_repository_is_conflict() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_error(
        &server,
        "POST",
        "/user/repos",
        422,
        "Repository creation failed.",
    )
    .await;

    let host = GitHubRepositoryHost::new(client);
    let err = host
        .create(&NewRepository {
            name: "demo".into(),
            description: String::new(),
            private: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Conflict(_)));
}

#[tokio::test]
async fn test_stalled_repository_lookup_times_out() {
    let (server, _) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/demo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::repo_body(OWNER, "demo", false))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let client = GitHubClient::with_base_url(common::TOKEN, server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(300))
        .unwrap();

    let host = Arc::new(GitHubRepositoryHost::new(Arc::new(client)));
    let usecase = EnsureRepositoryUseCase::new(host);
    let started = Instant::now();
    let err = usecase
        .execute(&RepoSlug::parse("octocat/demo").unwrap(), None)
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(matches!(
        err,
        RepositoryError::Resolve {
            source: RemoteError::Transport(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_stalled_login_check_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"login": OWNER}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let client = GitHubClient::with_base_url(common::TOKEN, server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(300))
        .unwrap();

    let host = GitHubRepositoryHost::new(Arc::new(client));
    let err = host.authenticated_login().await.unwrap_err();

    assert!(matches!(err, RemoteError::Transport(_)));
}
