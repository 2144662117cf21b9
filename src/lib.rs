pub mod chart_path;
pub mod checker;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod harness;
pub mod output;
pub mod owners;
pub mod pull_request;
pub mod release_info;

pub use error::{ChartflowError, Result};

#[cfg(test)]
pub mod test_helpers;
