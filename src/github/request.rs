use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
/// Request to open a new pull request.
pub struct CreatePullRequest {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
/// Request to create a git reference pointing at `sha`.
pub struct CreateRefRequest {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: String,
}
