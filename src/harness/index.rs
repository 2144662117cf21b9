use serde::Deserialize;
use std::collections::HashMap;

use crate::Result;

/// File holding the chart repository index on the pages branch.
pub const INDEX_FILE: &str = "index.yaml";

#[derive(Debug, Default, Deserialize)]
pub struct ChartIndex {
    #[serde(default)]
    pub entries: HashMap<String, Vec<IndexRelease>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexRelease {
    pub version: String,
}

impl ChartIndex {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// True when `entry` lists a release with `version`.
    pub fn has_release(&self, entry: &str, version: &str) -> bool {
        self.entries
            .get(entry)
            .is_some_and(|releases| releases.iter().any(|r| r.version == version))
    }
}
