//! Integration tests for ghupload-github
//!
//! Uses wiremock to simulate the GitHub REST API and verifies end-to-end
//! behavior of the contents and repository adapters, including the
//! status-code classification seen by the core ports.

mod common;

mod test_contents;
mod test_reconcile;
mod test_repos;
