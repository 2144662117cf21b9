//! Sender authorization against the repository `OWNERS` file.
use log::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::Result;

/// Repository-relative path of the approvers file.
pub const OWNERS_FILE: &str = "OWNERS";

#[derive(Debug, Default, Deserialize)]
struct Owners {
    #[serde(default)]
    approvers: Vec<String>,
}

/// Users allowed to submit release changes.
#[derive(Debug, Default, Clone)]
pub struct Approvers {
    users: Vec<String>,
}

impl Approvers {
    /// Load approvers from `<repo_root>/OWNERS`. A missing file yields an
    /// empty list, which authorizes nobody.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = repo_root.join(OWNERS_FILE);
        if !path.exists() {
            warn!("no {OWNERS_FILE} file found at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let owners: Owners = serde_yaml::from_str(&content)?;
        Ok(Self {
            users: owners.approvers,
        })
    }

    pub fn from_users(users: Vec<String>) -> Self {
        Self { users }
    }

    pub fn is_authorized(&self, sender: &str) -> bool {
        let authorized = self.users.iter().any(|u| u == sender);
        if authorized {
            info!("{sender} is authorized to submit release changes");
        } else {
            info!("{sender} is not listed as an approver");
        }
        authorized
    }
}
