//! Custom error types for chartflow operations.

use thiserror::Error;

/// Main error type for chartflow operations.
#[derive(Error, Debug)]
pub enum ChartflowError {
    // Credential errors
    #[error("BOT_TOKEN environment variable not defined")]
    MissingCredentials,

    #[error("BOT_TOKEN set but BOT_NAME not specified")]
    MissingBotName,

    #[error("BOT_NAME set but BOT_TOKEN not specified")]
    MissingBotToken,

    #[error("Bad command arguments: {0}")]
    InvalidArgs(String),

    #[error("Configuration incomplete: {0}")]
    InvalidConfig(String),

    // GitHub REST
    #[error("Github API method {0} not implemented in helper function")]
    UnsupportedMethod(String),

    #[error("Unexpected response from GitHub: status: {status}, body: {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("GitHub request did not complete: {0}")]
    NetworkError(String),

    #[error("GitHub rejected the bot token: {0}")]
    AuthenticationError(String),

    // Functional scenario errors
    #[error("Scenario failed: {0}")]
    ScenarioFailed(String),

    #[error("git: {0}")]
    GitError(#[from] git2::Error),

    #[error("Not a semantic version: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Could not render template: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Malformed JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Malformed YAML: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    #[error("Malformed URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger already installed: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    #[error("I/O: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Crate wide result.
pub type Result<T> = std::result::Result<T, ChartflowError>;

impl ChartflowError {
    /// Non-success GitHub response.
    pub fn unexpected_response(status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            status,
            body: body.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Functional scenario step failure.
    pub fn scenario(msg: impl Into<String>) -> Self {
        Self::ScenarioFailed(msg.into())
    }
}

// 401 and 403 mean the token is wrong or lacks scope.
impl From<reqwest::Error> for ChartflowError {
    fn from(err: reqwest::Error) -> Self {
        match err.status().map(|s| s.as_u16()) {
            Some(401 | 403) => Self::AuthenticationError(err.to_string()),
            _ => Self::NetworkError(err.to_string()),
        }
    }
}

// Only the Authorization header is built from runtime input.
impl From<reqwest::header::InvalidHeaderValue> for ChartflowError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::AuthenticationError(format!("token is not a valid header: {err}"))
    }
}
