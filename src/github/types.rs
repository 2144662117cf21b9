use serde::{Deserialize, de::DeserializeOwned};
use std::{fmt, str::FromStr};

use crate::{Result, error::ChartflowError};

/// HTTP verbs supported by the REST helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl FromStr for Method {
    type Err = ChartflowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "delete" => Ok(Method::Delete),
            _ => Err(ChartflowError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Raw status and body of a REST call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body into `T`. A body that does not have the expected
    /// shape yields [`ApiResult::Unexpected`] carrying the raw response.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        match serde_json::from_str::<T>(&self.body) {
            Ok(value) => ApiResult::Success(value),
            Err(_) => ApiResult::Unexpected {
                status: self.status,
                body: self.body.clone(),
            },
        }
    }
}

/// Typed outcome of a REST call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult<T> {
    Success(T),
    Unexpected { status: u16, body: String },
}

impl<T> ApiResult<T> {
    pub fn into_result(self) -> Result<T> {
        match self {
            ApiResult::Success(value) => Ok(value),
            ApiResult::Unexpected { status, body } => {
                Err(ChartflowError::unexpected_response(status, body))
            }
        }
    }
}

/// One entry of a pull request's file listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangedFile {
    #[serde(rename = "filename")]
    pub path: String,
}

/// Minimal pull request payload: only the number is required.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRef {
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitObject {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    pub object: GitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub head_branch: Option<String>,
}

impl WorkflowRun {
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some("completed")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRuns {
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}
