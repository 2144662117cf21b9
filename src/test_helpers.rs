//! Common test helper functions shared across test modules.
use std::fs;

use git2::Repository;
use tempfile::TempDir;

use crate::{
    git::{GitWorkspace, Workspace},
    github::types::ApiResponse,
};

/// Builds a PR file listing page the way GitHub returns it.
pub fn files_page<S: AsRef<str>>(paths: &[S]) -> ApiResponse {
    let entries: Vec<serde_json::Value> = paths
        .iter()
        .map(|p| serde_json::json!({"filename": p.as_ref(), "status": "modified"}))
        .collect();
    ApiResponse::new(200, serde_json::Value::Array(entries).to_string())
}

/// `n` distinct paths under `prefix`.
pub fn numbered_paths(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}-{i}.yaml")).collect()
}

/// Creates a repository with one commit holding `README.md`.
pub fn init_test_repo() -> (TempDir, GitWorkspace) {
    let tmp = TempDir::new().unwrap();
    Repository::init(tmp.path()).unwrap();

    let workspace = GitWorkspace::open(tmp.path()).unwrap();
    workspace.set_identity("test-bot", "bot@example.com").unwrap();

    fs::write(tmp.path().join("README.md"), "# charts\n").unwrap();
    workspace.add_all().unwrap();
    workspace.commit("initial").unwrap();

    (tmp, workspace)
}
