//! Traits related to GitHub REST access
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    github::types::{ApiResponse, Method},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Issue `method` against an endpoint relative to the API base URL, or
    /// against an absolute URL.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse>;

    /// GET an absolute URL, e.g. a pull request's `api_url` file listing.
    async fn get_url(&self, url: &str) -> Result<ApiResponse>;
}
