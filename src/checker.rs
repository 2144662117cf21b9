//! Classifies pull requests as release-only, charts-only or release
//! branch submissions.
//!
//! Cheap string checks always run before the paginated file listing, and
//! every check stops at the first failing condition. A mismatch is a
//! negative answer, never an error. Errors are reserved for transport
//! failures and malformed REST responses.
use log::*;
use semver::Version;

use crate::{
    Result,
    chart_path::ChartPath,
    github::{manager::GithubManager, types::ChangedFile},
    release_info::{RELEASE_BODY_PREFIX, VERSION_FILE},
};

/// Prefix of branches opened by the release automation bot.
pub const DEV_PR_BRANCH_NAME_PREFIX: &str = "Auto-Release-";

/// Outcome of classifying a pull request, with the evidence behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrClassification {
    /// Only the release info file changed.
    ReleaseOnly { files: Vec<String> },
    /// Every changed file lives under a chart path.
    ChartsOnly { charts: Vec<ChartPath> },
    /// A bot opened release branch.
    ReleaseBranch {
        branch: String,
        version: String,
        body_prefix: String,
    },
    Indeterminate { reason: String },
}

/// Pull request metadata handed to [`ReleaseChecker::classify`].
#[derive(Debug, Clone, Default)]
pub struct PrContext<'a> {
    pub api_url: Option<&'a str>,
    pub sender: Option<&'a str>,
    pub branch: Option<&'a str>,
    pub body: Option<&'a str>,
}

/// True iff both versions parse and `candidate` is strictly newer.
pub fn is_newer_version(candidate: &str, current: &str) -> bool {
    match (Version::parse(candidate), Version::parse(current)) {
        (Ok(candidate), Ok(current)) => candidate > current,
        (Err(e), _) => {
            error!("invalid version {candidate}: {e}");
            false
        }
        (_, Err(e)) => {
            error!("invalid version {current}: {e}");
            false
        }
    }
}

/// Version carried by a release branch name, if the name has the release
/// prefix. The returned string is not validated.
pub fn branch_version(branch: &str) -> Option<&str> {
    branch.strip_prefix(DEV_PR_BRANCH_NAME_PREFIX)
}

pub struct ReleaseChecker<'a> {
    github: &'a GithubManager,
    bot_name: Option<&'a str>,
}

impl<'a> ReleaseChecker<'a> {
    pub fn new(github: &'a GithubManager, bot_name: Option<&'a str>) -> Self {
        Self { github, bot_name }
    }

    /// Every changed file of the pull request.
    pub async fn list_all_changed_files(
        &self,
        pr_api_url: &str,
    ) -> Result<Vec<ChangedFile>> {
        self.github.changed_files(pr_api_url).collect_all().await
    }

    /// True when every changed file is under a chart path. Pages after the
    /// first non-chart path are not fetched.
    pub async fn is_charts_only(&self, pr_api_url: &str) -> Result<bool> {
        Ok(self.charts_only_files(pr_api_url).await?.is_some())
    }

    /// Parsed chart paths when every changed file is a chart path.
    pub async fn charts_only_files(
        &self,
        pr_api_url: &str,
    ) -> Result<Option<Vec<ChartPath>>> {
        let mut pages = self.github.changed_files(pr_api_url);
        let mut charts = vec![];

        while let Some(files) = pages.next_page().await? {
            for file in files {
                match ChartPath::parse(&file.path) {
                    Some(chart) => charts.push(chart),
                    None => {
                        info!("PR includes non chart file: {}", file.path);
                        return Ok(None);
                    }
                }
            }
        }

        Ok(Some(charts))
    }

    /// True when the release info file is the only changed file.
    pub async fn is_version_file_only(&self, pr_api_url: &str) -> Result<bool> {
        let mut pages = self.github.changed_files(pr_api_url);
        let mut found = false;

        while let Some(files) = pages.next_page().await? {
            for file in files {
                if file.path != VERSION_FILE {
                    return Ok(false);
                }
                found = true;
            }
        }

        Ok(found)
    }

    /// Release branch version when the pull request is a bot release
    /// branch, checking sender, branch name, body and finally the file list.
    pub async fn release_branch_version(
        &self,
        sender: &str,
        branch: &str,
        body: &str,
        pr_api_url: &str,
    ) -> Result<Option<String>> {
        if self.bot_name != Some(sender) {
            info!("Sender indicates PR is not part of a release: {sender}");
            return Ok(None);
        }

        let Some(version) = branch_version(branch) else {
            info!("PR branch indicates PR is not part of a release: {branch}");
            return Ok(None);
        };

        if Version::parse(version).is_err() {
            info!(
                "Release part ({version}) of branch name {branch} is not a valid semantic version."
            );
            return Ok(None);
        }

        if !body.starts_with(&format!("{RELEASE_BODY_PREFIX} {version}")) {
            info!("PR title indicates PR is not part of a release: {body}");
            return Ok(None);
        }

        if !self.is_charts_only(pr_api_url).await? {
            return Ok(None);
        }

        Ok(Some(version.to_string()))
    }

    pub async fn is_release_branch(
        &self,
        sender: &str,
        branch: &str,
        body: &str,
        pr_api_url: &str,
    ) -> Result<bool> {
        Ok(self
            .release_branch_version(sender, branch, body, pr_api_url)
            .await?
            .is_some())
    }

    /// Classify a pull request. A release branch wins over release-only,
    /// which wins over charts-only.
    pub async fn classify(&self, pr: &PrContext<'_>) -> Result<PrClassification> {
        let Some(api_url) = pr.api_url else {
            return Ok(PrClassification::Indeterminate {
                reason: "no pull request api url".into(),
            });
        };

        if let (Some(sender), Some(branch), Some(body)) =
            (pr.sender, pr.branch, pr.body)
            && let Some(version) = self
                .release_branch_version(sender, branch, body, api_url)
                .await?
        {
            return Ok(PrClassification::ReleaseBranch {
                branch: branch.to_string(),
                body_prefix: format!("{RELEASE_BODY_PREFIX} {version}"),
                version,
            });
        }

        if self.is_version_file_only(api_url).await? {
            return Ok(PrClassification::ReleaseOnly {
                files: vec![VERSION_FILE.to_string()],
            });
        }

        if let Some(charts) = self.charts_only_files(api_url).await? {
            if charts.is_empty() {
                return Ok(PrClassification::Indeterminate {
                    reason: "pull request has no changed files".into(),
                });
            }
            return Ok(PrClassification::ChartsOnly { charts });
        }

        Ok(PrClassification::Indeterminate {
            reason: "pull request mixes chart and non chart files".into(),
        })
    }
}
