//! Parsed representation of a chart submission path.
//!
//! A chart path looks like
//! `charts/<category>/<vendor>/<chart>/<version>/<anything>` where the
//! category is one of `partners`, `redhat` or `community`.
use regex::Regex;
use std::{fmt, str::FromStr, sync::LazyLock};

use crate::error::ChartflowError;

/// Matches chart paths, anchored at the start of the path only.
static CHART_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^charts/(partners|redhat|community)/([\w-]+)/([\w-]+)/([\w.-]+)/.*",
    )
    .unwrap()
});

/// Submitter classification embedded in a chart path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartCategory {
    Partners,
    Redhat,
    Community,
}

impl ChartCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartCategory::Partners => "partners",
            ChartCategory::Redhat => "redhat",
            ChartCategory::Community => "community",
        }
    }
}

impl fmt::Display for ChartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartCategory {
    type Err = ChartflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partners" => Ok(ChartCategory::Partners),
            "redhat" => Ok(ChartCategory::Redhat),
            "community" => Ok(ChartCategory::Community),
            other => Err(ChartflowError::InvalidArgs(format!(
                "unknown chart category: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPath {
    pub category: ChartCategory,
    pub vendor: String,
    pub chart: String,
    pub version: String,
}

impl ChartPath {
    /// Parse a repository path. Returns `None` for anything outside the
    /// chart layout.
    pub fn parse(path: &str) -> Option<Self> {
        let caps = CHART_PATH_REGEX.captures(path)?;
        let category = caps.get(1)?.as_str().parse().ok()?;
        Some(Self {
            category,
            vendor: caps.get(2)?.as_str().to_string(),
            chart: caps.get(3)?.as_str().to_string(),
            version: caps.get(4)?.as_str().to_string(),
        })
    }

    pub fn is_chart_path(path: &str) -> bool {
        CHART_PATH_REGEX.is_match(path)
    }

    /// `charts/<category>/<vendor>/<chart>`
    pub fn chart_dir(&self) -> String {
        format!("charts/{}/{}/{}", self.category, self.vendor, self.chart)
    }
}
