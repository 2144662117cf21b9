//! Process configuration resolved once from the environment.
//!
//! Every collaborator that needs credentials or CI flags receives a
//! reference to [`Config`] instead of reading the environment itself.
use log::*;
use secrecy::{ExposeSecret, SecretString};
use std::env;

use crate::{Result, error::ChartflowError};

/// Base URL for GitHub REST API calls.
pub const GITHUB_BASE_URL: &str = "https://api.github.com";
/// GitHub actions bot email used as the commit email for bot commits.
pub const GITHUB_ACTIONS_BOT_EMAIL: &str =
    "41898282+github-actions[bot]@users.noreply.github.com";
/// Name of the charts repository under the organization.
pub const CHARTS_REPO_NAME: &str = "charts";

pub const BOT_NAME_ENV: &str = "BOT_NAME";
pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";
pub const ORGANIZATION_ENV: &str = "REPOSITORY_ORGANIZATION";
pub const GITHUB_ACTIONS_ENV: &str = "GITHUB_ACTIONS";
pub const WORKFLOW_DEVELOPMENT_ENV: &str = "WORKFLOW_DEVELOPMENT";
pub const PR_BODY_ENV: &str = "PR_BODY";
pub const API_URL_ENV: &str = "CHARTFLOW_API_URL";
pub const TEST_REPO_ENV: &str = "CHARTFLOW_TEST_REPO";

/// Bot identity used to commit, push and call the GitHub API.
#[derive(Debug, Clone)]
pub struct BotCredential {
    pub name: String,
    pub token: SecretString,
}

impl BotCredential {
    /// HTTPS remote URL for `repository` with the token embedded.
    pub fn remote_url(&self, repository: &str) -> String {
        format!(
            "https://x-access-token:{}@github.com/{repository}",
            self.token.expose_secret()
        )
    }
}

/// Configuration assembled at process start.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: Option<String>,
    pub bot_token: Option<SecretString>,
    /// Organization owning the charts and development repositories.
    pub organization: Option<String>,
    /// True when running inside a GitHub Actions runner.
    pub github_actions: bool,
    /// Commit local work as a checkpoint before functional scenarios.
    pub workflow_development: bool,
    /// Body used for pull requests opened by functional scenarios.
    pub pr_body: Option<String>,
    pub api_base_url: String,
    /// Overrides the repository functional scenarios run against.
    pub test_repo: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_name: None,
            bot_token: None,
            organization: None,
            github_actions: false,
            workflow_development: false,
            pr_body: None,
            api_base_url: GITHUB_BASE_URL.to_string(),
            test_repo: None,
        }
    }
}

impl Config {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values are
    /// treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            bot_name: get(BOT_NAME_ENV),
            bot_token: get(BOT_TOKEN_ENV).map(SecretString::from),
            organization: get(ORGANIZATION_ENV),
            github_actions: get(GITHUB_ACTIONS_ENV).is_some(),
            workflow_development: get(WORKFLOW_DEVELOPMENT_ENV).is_some(),
            pr_body: get(PR_BODY_ENV),
            api_base_url: get(API_URL_ENV)
                .unwrap_or_else(|| GITHUB_BASE_URL.to_string()),
            test_repo: get(TEST_REPO_ENV),
        }
    }

    /// Resolve the bot credential, failing when either part is missing.
    pub fn bot_credential(&self) -> Result<BotCredential> {
        match (&self.bot_name, &self.bot_token) {
            (None, None) => Err(ChartflowError::MissingCredentials),
            (None, Some(_)) => Err(ChartflowError::MissingBotName),
            (Some(_), None) => Err(ChartflowError::MissingBotToken),
            (Some(name), Some(token)) => {
                info!("found bot name ({name}) and token.");
                Ok(BotCredential {
                    name: name.clone(),
                    token: token.clone(),
                })
            }
        }
    }

    pub fn organization(&self) -> Result<&str> {
        self.organization.as_deref().ok_or_else(|| {
            ChartflowError::invalid_config(format!(
                "{ORGANIZATION_ENV} environment variable not defined"
            ))
        })
    }

    /// `<organization>/charts`
    pub fn charts_repo(&self) -> Result<String> {
        Ok(format!("{}/{CHARTS_REPO_NAME}", self.organization()?))
    }

    /// Repository used by functional scenarios.
    pub fn test_repo(&self) -> Result<String> {
        match &self.test_repo {
            Some(repo) => Ok(repo.clone()),
            None => self.charts_repo(),
        }
    }
}
