//! Integration tests for the contents API adapter
//!
//! Verifies existence checks, create and update requests, and the error
//! classification surfaced through `IRemoteStore`.

use ghupload_core::domain::newtypes::{BranchName, ContentVersion, RelativePath};
use ghupload_core::ports::{IRemoteStore, RemoteError};
use ghupload_github::provider::GitHubRemoteStore;
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::common::{self, OWNER, REPO};

fn rel(p: &str) -> RelativePath {
    RelativePath::new(p.to_string()).unwrap()
}

// ============================================================================
// exists
// ============================================================================

#[tokio::test]
async fn test_exists_returns_blob_sha() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path(common::contents_path("src/a.txt")))
        .and(query_param("ref", "main"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::file_body("src/a.txt", "sha-1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let found = store
        .exists(&rel("src/a.txt"), &BranchName::default())
        .await
        .expect("exists failed")
        .expect("file should exist");

    assert_eq!(found.version.as_str(), "sha-1");
    assert_eq!(found.path.as_str(), "src/a.txt");
}

#[tokio::test]
async fn test_exists_404_is_absent() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_error(&server, "GET", &common::contents_path("new.txt"), 404, "Not Found")
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let found = store
        .exists(&rel("new.txt"), &BranchName::default())
        .await
        .expect("exists failed");

    assert!(found.is_none());
}

#[tokio::test]
async fn test_exists_uses_requested_branch() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path(common::contents_path("a.txt")))
        .and(query_param("ref", "develop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_body("a.txt", "d1")))
        .expect(1)
        .mount(&server)
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let branch = BranchName::new("develop".to_string()).unwrap();
    let found = store.exists(&rel("a.txt"), &branch).await.unwrap();

    assert_eq!(found.unwrap().version.as_str(), "d1");
}

#[tokio::test]
async fn test_exists_encodes_path_segments() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/demo/contents/my%20docs/read%20me.md"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::file_body("my docs/read me.md", "s")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let found = store
        .exists(&rel("my docs/read me.md"), &BranchName::default())
        .await
        .unwrap();

    assert!(found.is_some());
}

#[tokio::test]
async fn test_exists_unauthorized_is_permission_error() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_error(
        &server,
        "GET",
        &common::contents_path("a.txt"),
        401,
        "Bad credentials",
    )
    .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let err = store
        .exists(&rel("a.txt"), &BranchName::default())
        .await
        .unwrap_err();

    assert_eq!(err, RemoteError::Permission("Bad credentials".into()));
}

#[tokio::test]
async fn test_exists_server_error_is_transport_not_absent() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_error(&server, "GET", &common::contents_path("a.txt"), 503, "unavailable")
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let err = store
        .exists(&rel("a.txt"), &BranchName::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Transport(_)));
}

#[tokio::test]
async fn test_exists_on_directory_is_rejected() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path(common::contents_path("docs")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([common::file_body("docs/a.md", "x")])),
        )
        .mount(&server)
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let err = store
        .exists(&rel("docs"), &BranchName::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Rejected { .. }));
}

#[tokio::test]
async fn test_rate_limited_403_is_transport() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path(common::contents_path("a.txt")))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .set_body_json(serde_json::json!({"message": "API rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let err = store
        .exists(&rel("a.txt"), &BranchName::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Transport(_)));
}

// ============================================================================
// create / update
// ============================================================================

#[tokio::test]
async fn test_create_sends_base64_content_without_sha() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("PUT"))
        .and(path(common::contents_path("a.txt")))
        .and(body_partial_json(serde_json::json!({
            "message": "Add a.txt",
            "content": "aGk=",
            "branch": "main"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(common::put_body("a.txt", "new")))
        .expect(1)
        .mount(&server)
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    store
        .create(&rel("a.txt"), b"hi", "Add a.txt", &BranchName::default())
        .await
        .expect("create failed");

    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("PUT request");
    let body: serde_json::Value = serde_json::from_slice(&put.body).unwrap();
    assert!(body.get("sha").is_none());
}

#[tokio::test]
async fn test_create_binary_content() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("PUT"))
        .and(path(common::contents_path("logo.png")))
        .and(body_partial_json(serde_json::json!({"content": "AAH/gA=="})))
        .respond_with(ResponseTemplate::new(201).set_body_json(common::put_body("logo.png", "b")))
        .expect(1)
        .mount(&server)
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    store
        .create(
            &rel("logo.png"),
            &[0x00, 0x01, 0xff, 0x80],
            "Add logo.png",
            &BranchName::default(),
        )
        .await
        .expect("create failed");
}

#[tokio::test]
async fn test_create_on_existing_path_is_conflict() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_error(
        &server,
        "PUT",
        &common::contents_path("a.txt"),
        422,
        "Invalid request.\n\n\"sha\" wasn't supplied.",
    )
    .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let err = store
        .create(&rel("a.txt"), b"hi", "Add a.txt", &BranchName::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Conflict(_)));
}

#[tokio::test]
async fn test_update_sends_expected_sha() {
    let (server, client) = common::setup_github_mock().await;
    Mock::given(method("PUT"))
        .and(path(common::contents_path("a.txt")))
        .and(body_partial_json(serde_json::json!({
            "message": "Update a.txt",
            "sha": "old-sha",
            "branch": "main"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::put_body("a.txt", "new-sha")))
        .expect(1)
        .mount(&server)
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    store
        .update(
            &rel("a.txt"),
            b"hi",
            "Update a.txt",
            &ContentVersion::new("old-sha".to_string()).unwrap(),
            &BranchName::default(),
        )
        .await
        .expect("update failed");
}

#[tokio::test]
async fn test_update_with_stale_sha_is_conflict() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_error(
        &server,
        "PUT",
        &common::contents_path("a.txt"),
        409,
        "a.txt does not match old-sha",
    )
    .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let err = store
        .update(
            &rel("a.txt"),
            b"hi",
            "Update a.txt",
            &ContentVersion::new("old-sha".to_string()).unwrap(),
            &BranchName::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, RemoteError::Conflict("a.txt does not match old-sha".into()));
}

#[tokio::test]
async fn test_update_forbidden_is_permission_error() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_error(
        &server,
        "PUT",
        &common::contents_path("a.txt"),
        403,
        "Resource not accessible by personal access token",
    )
    .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let err = store
        .update(
            &rel("a.txt"),
            b"hi",
            "Update a.txt",
            &ContentVersion::new("sha".to_string()).unwrap(),
            &BranchName::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Permission(_)));
}

#[tokio::test]
async fn test_other_client_error_is_rejected_with_status() {
    let (server, client) = common::setup_github_mock().await;
    common::mount_error(&server, "PUT", &common::contents_path("a.txt"), 400, "Bad request")
        .await;

    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    let err = store
        .create(&rel("a.txt"), b"hi", "Add a.txt", &BranchName::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RemoteError::Rejected {
            status: 400,
            message: "Bad request".into()
        }
    );
}
