//! Create pull request command implementation.
use log::*;
use std::io::Write;

use crate::{
    Result,
    cli::CreatePrArgs,
    config::Config,
    git::Workspace,
    github::manager::GithubManager,
    output::{PR_OUTCOME, WorkflowOutput},
    pull_request::{PrOrchestrator, PrOutcome, PrRequest},
};

/// Execute the create-pr command and report the outcome as the
/// `pr_outcome` workflow output.
pub async fn execute<W: Write>(
    args: &CreatePrArgs,
    config: &Config,
    workspace: &dyn Workspace,
    github: &GithubManager,
    out: &mut WorkflowOutput<W>,
) -> Result<PrOutcome> {
    let repository = match &args.repository {
        Some(repository) => repository.clone(),
        None => config.charts_repo()?,
    };

    let request = PrRequest::builder()
        .branch_name(args.branch.as_str())
        .skip_files(args.skip.iter().cloned())
        .repository(repository)
        .message(args.message.as_str())
        .build()?;

    let outcome = PrOrchestrator::new(config, workspace, github)
        .create_pr(&request)
        .await?;

    info!("create pr outcome: {outcome}");
    out.set(PR_OUTCOME, outcome)?;

    Ok(outcome)
}
