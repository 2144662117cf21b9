//! Manager that wraps raw GitHub REST access with typed operations
use log::*;

use crate::{
    Result,
    config::Config,
    github::{
        client::GithubClient,
        request::{CreatePullRequest, CreateRefRequest},
        traits::GithubApi,
        types::{
            ApiResponse, ApiResult, Branch, ChangedFile, GitRef, Method,
            PullRequestRef, WorkflowRun, WorkflowRuns,
        },
    },
};

/// Page size used when listing pull request files.
pub const FILES_PAGE_SIZE: usize = 100;

/// Status returned by the merge endpoint when the PR has been merged.
pub const MERGED_STATUS: u16 = 204;

pub struct GithubManager {
    api: Box<dyn GithubApi>,
}

impl GithubManager {
    pub fn new(api: Box<dyn GithubApi>) -> Self {
        Self { api }
    }

    /// Create a manager backed by the reqwest client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GithubClient::from_config(config)?;
        Ok(Self::new(Box::new(client)))
    }

    /// Issue a request with a method given by name: `get`, `post` or
    /// `delete`. Any other name is an unsupported operation.
    pub async fn api(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse> {
        let method: Method = method.parse()?;
        self.api.request(method, endpoint, body).await
    }

    pub async fn list_branches(&self, repo: &str) -> Result<Vec<Branch>> {
        let endpoint = format!("repos/{repo}/branches");
        let response = self.api.request(Method::Get, &endpoint, None).await?;
        response.json::<Vec<Branch>>().into_result()
    }

    /// Open a pull request. The typed result distinguishes a created PR
    /// from a response lacking a PR number.
    pub async fn create_pull_request(
        &self,
        repo: &str,
        req: &CreatePullRequest,
    ) -> Result<ApiResult<PullRequestRef>> {
        let endpoint = format!("repos/{repo}/pulls");
        let body = serde_json::to_value(req)?;
        let response =
            self.api.request(Method::Post, &endpoint, Some(body)).await?;
        Ok(response.json())
    }

    pub async fn is_pull_request_merged(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<bool> {
        let endpoint = format!("repos/{repo}/pulls/{number}/merge");
        let response = self.api.request(Method::Get, &endpoint, None).await?;
        Ok(response.status == MERGED_STATUS)
    }

    /// Commit sha the remote branch points at.
    pub async fn get_branch_sha(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<String> {
        let endpoint = format!("repos/{repo}/git/ref/heads/{branch}");
        let response = self.api.request(Method::Get, &endpoint, None).await?;
        let git_ref: GitRef = response.json().into_result()?;
        Ok(git_ref.object.sha)
    }

    pub async fn create_branch_ref(
        &self,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<()> {
        let endpoint = format!("repos/{repo}/git/refs");
        let req = CreateRefRequest {
            reference: format!("refs/heads/{branch}"),
            sha: sha.to_string(),
        };
        let body = serde_json::to_value(&req)?;
        let response =
            self.api.request(Method::Post, &endpoint, Some(body)).await?;
        response.json::<GitRef>().into_result()?;
        info!("created {repo}:{branch} at {sha}");
        Ok(())
    }

    /// Delete a remote branch. The raw response is returned so best-effort
    /// callers can ignore branches that are already gone.
    pub async fn delete_branch(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<ApiResponse> {
        let endpoint = format!("repos/{repo}/git/refs/heads/{branch}");
        self.api.request(Method::Delete, &endpoint, None).await
    }

    /// Workflow runs triggered for `branch`, newest first.
    pub async fn list_workflow_runs(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<WorkflowRun>> {
        let endpoint = format!("repos/{repo}/actions/runs?branch={branch}");
        let response = self.api.request(Method::Get, &endpoint, None).await?;
        let runs: WorkflowRuns = response.json().into_result()?;
        Ok(runs.workflow_runs)
    }

    pub async fn get_workflow_run(
        &self,
        repo: &str,
        run_id: u64,
    ) -> Result<WorkflowRun> {
        let endpoint = format!("repos/{repo}/actions/runs/{run_id}");
        let response = self.api.request(Method::Get, &endpoint, None).await?;
        response.json().into_result()
    }

    /// Lazy, one-shot listing of a pull request's changed files. Every call
    /// starts again from page 1.
    pub fn changed_files(&self, pr_api_url: &str) -> ChangedFilePages<'_> {
        ChangedFilePages {
            api: self.api.as_ref(),
            files_url: format!("{}/files", pr_api_url.trim_end_matches('/')),
            page: 1,
            done: false,
        }
    }
}

/// Paginator over `{pr_api_url}/files`. Stops after the first page that
/// holds fewer than [`FILES_PAGE_SIZE`] entries.
pub struct ChangedFilePages<'a> {
    api: &'a dyn GithubApi,
    files_url: String,
    page: u32,
    done: bool,
}

impl ChangedFilePages<'_> {
    /// Fetch the next page, or `None` once the listing is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<ChangedFile>>> {
        if self.done {
            return Ok(None);
        }

        let query = format!(
            "{}?per_page={FILES_PAGE_SIZE}&page={}",
            self.files_url, self.page
        );
        info!("Query files : {query}");

        let response = self.api.get_url(&query).await?;
        let files: Vec<ChangedFile> = response.json().into_result()?;

        self.page += 1;
        if files.len() < FILES_PAGE_SIZE {
            self.done = true;
        }

        Ok(Some(files))
    }

    /// Drain every remaining page.
    pub async fn collect_all(mut self) -> Result<Vec<ChangedFile>> {
        let mut all = vec![];
        while let Some(files) = self.next_page().await? {
            all.extend(files);
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ChartflowError,
        github::traits::MockGithubApi,
        test_helpers::{files_page, numbered_paths},
    };

    #[tokio::test]
    async fn unsupported_method_fails_before_request() {
        let mock = MockGithubApi::new();
        let manager = GithubManager::new(Box::new(mock));

        let result = manager.api("put", "repos/acme/charts", None).await;
        assert!(matches!(result, Err(ChartflowError::UnsupportedMethod(_))));
    }

    #[tokio::test]
    async fn dispatches_named_methods() {
        let mut mock = MockGithubApi::new();
        mock.expect_request()
            .withf(|method, endpoint, body| {
                *method == Method::Delete
                    && endpoint == "repos/acme/charts/git/refs/heads/tmp"
                    && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(ApiResponse::new(204, "")));

        let manager = GithubManager::new(Box::new(mock));
        let response = manager
            .api("delete", "repos/acme/charts/git/refs/heads/tmp", None)
            .await
            .unwrap();
        assert_eq!(response.status, 204);
    }

    #[tokio::test]
    async fn paginates_until_short_page() {
        let mut mock = MockGithubApi::new();
        mock.expect_get_url().times(3).returning(|url| {
            if url.ends_with("page=1") || url.ends_with("page=2") {
                Ok(files_page(&numbered_paths("docs/file", 100)))
            } else {
                Ok(files_page(&numbered_paths("docs/tail", 3)))
            }
        });

        let manager = GithubManager::new(Box::new(mock));
        let files = manager
            .changed_files("https://api.github.com/repos/acme/charts/pulls/9")
            .collect_all()
            .await
            .unwrap();

        assert_eq!(files.len(), 203);
    }

    #[tokio::test]
    async fn builds_paged_file_queries() {
        let mut mock = MockGithubApi::new();
        mock.expect_get_url()
            .withf(|url| {
                url == "https://api.github.com/repos/acme/charts/pulls/9/files?per_page=100&page=1"
            })
            .times(1)
            .returning(|_| Ok(files_page::<&str>(&[])));

        let manager = GithubManager::new(Box::new(mock));
        let mut pages = manager
            .changed_files("https://api.github.com/repos/acme/charts/pulls/9");

        assert_eq!(pages.next_page().await.unwrap(), Some(vec![]));
        assert_eq!(pages.next_page().await.unwrap(), None);
    }

    #[tokio::test]
    async fn error_payload_in_listing_is_unexpected() {
        let mut mock = MockGithubApi::new();
        mock.expect_get_url().returning(|_| {
            Ok(ApiResponse::new(404, r#"{"message": "Not Found"}"#))
        });

        let manager = GithubManager::new(Box::new(mock));
        let result = manager
            .changed_files("https://api.github.com/repos/acme/charts/pulls/9")
            .collect_all()
            .await;

        assert!(matches!(
            result,
            Err(ChartflowError::UnexpectedResponse { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn merge_status_reflects_204() {
        let mut mock = MockGithubApi::new();
        mock.expect_request()
            .withf(|_, endpoint, _| endpoint.ends_with("pulls/5/merge"))
            .returning(|_, _, _| Ok(ApiResponse::new(204, "")));
        mock.expect_request()
            .withf(|_, endpoint, _| endpoint.ends_with("pulls/6/merge"))
            .returning(|_, _, _| Ok(ApiResponse::new(404, "")));

        let manager = GithubManager::new(Box::new(mock));
        assert!(manager.is_pull_request_merged("acme/charts", 5).await.unwrap());
        assert!(!manager.is_pull_request_merged("acme/charts", 6).await.unwrap());
    }

    #[tokio::test]
    async fn creates_branch_ref_from_sha() {
        let mut mock = MockGithubApi::new();
        mock.expect_request()
            .withf(|method, endpoint, _| {
                *method == Method::Get
                    && endpoint == "repos/acme/charts/git/ref/heads/dev-gh-pages"
            })
            .returning(|_, _, _| {
                Ok(ApiResponse::new(
                    200,
                    r#"{"ref": "refs/heads/dev-gh-pages", "object": {"sha": "abc123", "type": "commit"}}"#,
                ))
            });
        mock.expect_request()
            .withf(|method, endpoint, body| {
                *method == Method::Post
                    && endpoint == "repos/acme/charts/git/refs"
                    && body.as_ref().is_some_and(|b| {
                        b["ref"] == "refs/heads/test-gh-pages" && b["sha"] == "abc123"
                    })
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(ApiResponse::new(
                    201,
                    r#"{"ref": "refs/heads/test-gh-pages", "object": {"sha": "abc123"}}"#,
                ))
            });

        let manager = GithubManager::new(Box::new(mock));
        let sha = manager
            .get_branch_sha("acme/charts", "dev-gh-pages")
            .await
            .unwrap();
        manager
            .create_branch_ref("acme/charts", "test-gh-pages", &sha)
            .await
            .unwrap();
    }
}
