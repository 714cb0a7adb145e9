//! End-to-end batch runs against the mocked GitHub API
//!
//! Wires the real local filesystem adapter, the batch runner and the GitHub
//! remote store together, as the CLI does.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ghupload_core::config::Config;
use ghupload_core::domain::newtypes::BranchName;
use ghupload_core::domain::{FailureKind, SyncOutcome};
use ghupload_core::usecases::{ReconcileFileUseCase, ReconcileOptions, SyncReadmeUseCase};
use ghupload_github::provider::GitHubRemoteStore;
use ghupload_sync::engine::BatchRunner;
use ghupload_sync::filesystem::LocalFileSystemAdapter;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::{
    matchers::{body_partial_json, method, path, path_regex},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::{self, OWNER, REPO};

fn write(root: &Path, rel: &str, content: &str) {
    let file = root.join(rel);
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    std::fs::write(file, content).unwrap();
}

fn reconciler(client: Arc<ghupload_github::client::GitHubClient>) -> Arc<ReconcileFileUseCase> {
    let store = GitHubRemoteStore::new(client, OWNER, REPO);
    Arc::new(ReconcileFileUseCase::new(
        Arc::new(store),
        Arc::new(LocalFileSystemAdapter::new()),
        ReconcileOptions::default(),
    ))
}

async fn mount_absent(server: &MockServer, file: &str) {
    common::mount_error(server, "GET", &common::contents_path(file), 404, "Not Found").await;
}

#[tokio::test]
async fn test_batch_uploads_only_non_excluded_files() {
    let (server, client) = common::setup_github_mock().await;
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "hi");
    write(dir.path(), "node_modules/x.js", "skip");
    write(dir.path(), ".env", "secret");

    mount_absent(&server, "a.txt").await;
    Mock::given(method("PUT"))
        .and(path(common::contents_path("a.txt")))
        .and(body_partial_json(serde_json::json!({"content": "aGk=", "message": "Add a.txt"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(common::put_body("a.txt", "s1")))
        .expect(1)
        .mount(&server)
        .await;

    let runner = BatchRunner::from_config(reconciler(client), &Config::default());
    let report = runner
        .run(dir.path(), &BranchName::default(), &CancellationToken::new())
        .await
        .expect("batch failed");

    assert_eq!(report.total, 1);
    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(report.failed, 0);

    // nothing excluded ever reached the API
    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| !r.url.path().contains("node_modules") && !r.url.path().ends_with(".env")));
}

#[tokio::test]
async fn test_batch_mixes_create_update_and_failure() {
    let (server, client) = common::setup_github_mock().await;
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "new");
    write(dir.path(), "b.txt", "changed");
    write(dir.path(), "c.txt", "conflicting");

    // a.txt: absent, created
    mount_absent(&server, "a.txt").await;
    Mock::given(method("PUT"))
        .and(path(common::contents_path("a.txt")))
        .respond_with(ResponseTemplate::new(201).set_body_json(common::put_body("a.txt", "a1")))
        .mount(&server)
        .await;

    // b.txt: present, updated
    Mock::given(method("GET"))
        .and(path(common::contents_path("b.txt")))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_body("b.txt", "b0")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(common::contents_path("b.txt")))
        .and(body_partial_json(serde_json::json!({"sha": "b0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::put_body("b.txt", "b1")))
        .mount(&server)
        .await;

    // c.txt: present, but changed before the update lands
    Mock::given(method("GET"))
        .and(path(common::contents_path("c.txt")))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_body("c.txt", "c0")))
        .mount(&server)
        .await;
    common::mount_error(
        &server,
        "PUT",
        &common::contents_path("c.txt"),
        409,
        "c.txt does not match c0",
    )
    .await;

    let runner = BatchRunner::from_config(reconciler(client), &Config::default());
    let report = runner
        .run(dir.path(), &BranchName::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.outcomes[0].1, SyncOutcome::Created);
    assert_eq!(report.outcomes[1].1, SyncOutcome::Updated);
    assert_eq!(report.outcomes[2].1.failure_kind(), Some(FailureKind::Conflict));

    // the conflicting file was written exactly once, no retry
    let requests = server.received_requests().await.unwrap();
    let c_puts = requests
        .iter()
        .filter(|r| r.method.as_str() == "PUT" && r.url.path().ends_with("/c.txt"))
        .count();
    assert_eq!(c_puts, 1);
}

#[tokio::test]
async fn test_readme_sync_creates_readme() {
    let (server, client) = common::setup_github_mock().await;
    mount_absent(&server, "README.md").await;
    Mock::given(method("PUT"))
        .and(path(common::contents_path("README.md")))
        .and(body_partial_json(serde_json::json!({"message": "Add README.md"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(common::put_body("README.md", "r1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let readme = SyncReadmeUseCase::new(reconciler(client));
    let outcome = readme
        .execute(REPO, "A demo", &BranchName::default())
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Created);
}

#[tokio::test]
async fn test_concurrent_batch_serializes_writes() {
    const PUT_DELAY: Duration = Duration::from_millis(250);

    let (server, client) = common::setup_github_mock().await;
    let dir = TempDir::new().unwrap();
    for i in 0..4 {
        let name = format!("f{i}.txt");
        write(dir.path(), &name, "x");
        mount_absent(&server, &name).await;
    }
    Mock::given(method("PUT"))
        .and(path_regex(r"^/repos/octocat/demo/contents/f[0-9]\.txt$"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(common::put_body("f.txt", "s"))
                .set_delay(PUT_DELAY),
        )
        .expect(4)
        .mount(&server)
        .await;

    let runner = BatchRunner::from_config(reconciler(client), &Config::default())
        .with_concurrency(4);
    let started = Instant::now();
    let report = runner
        .run(dir.path(), &BranchName::default(), &CancellationToken::new())
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.created, 4);
    assert_eq!(report.failed, 0);
    // one PUT at a time: four delayed writes cannot overlap
    assert!(
        elapsed >= PUT_DELAY * 4,
        "writes overlapped, batch took {elapsed:?}"
    );
}
