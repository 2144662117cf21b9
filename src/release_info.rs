//! Reader for the persisted release record `release/release_info.json`.
use log::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::Result;

/// Repository-relative path of the release record.
pub const VERSION_FILE: &str = "release/release_info.json";

/// Literal prefix of every release PR body.
pub const RELEASE_BODY_PREFIX: &str = "Charts workflow version";

/// Current release of the charts workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Semantic version of the release.
    pub version: String,
    /// Image to use for the release.
    #[serde(default)]
    pub image: String,
    /// Descriptive entries about the release content.
    #[serde(default, alias = "info")]
    pub notes: Vec<String>,
}

impl ReleaseInfo {
    /// Load the release record from a repository root.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = repo_root.join(VERSION_FILE);
        debug!("loading release info from {}", path.display());
        let content = fs::read_to_string(&path)?;
        let info: ReleaseInfo = serde_json::from_str(&content)?;
        Ok(info)
    }

    /// HTML-ish body used when publishing the release.
    pub fn release_body(&self) -> String {
        let mut body =
            format!("{RELEASE_BODY_PREFIX} {} <br><br>", self.version);
        body.push_str("This version includes:<br>");
        for note in self.notes.iter() {
            body.push_str(&format!("- {note}<br>"));
        }
        body
    }
}
