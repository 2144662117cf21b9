//! Release checker command implementation.
use log::*;
use std::{io::Write, path::Path};

use crate::{
    Result,
    checker::{ReleaseChecker, is_newer_version},
    cli::CheckReleaseArgs,
    config::Config,
    github::manager::GithubManager,
    output::{
        DEV_RELEASE_BRANCH, PR_INCLUDES_RELEASE_ONLY, PR_RELEASE_BODY,
        PR_RELEASE_IMAGE, PR_RELEASE_INFO, PR_VERSION, RELEASE_UPDATED,
        SENDER_NOT_AUTHORIZED, WorkflowOutput,
    },
    owners::Approvers,
    release_info::ReleaseInfo,
};

/// Execute the release checker against the repository at `repo_root`.
///
/// The first applicable mode wins:
///
/// 1. `pr_branch` set and the PR is a bot release branch
/// 2. `api_url` set: the PR must only change the release info file and
///    come from an approver
/// 3. `version` set: compared against the persisted release version
pub async fn execute<W: Write>(
    args: &CheckReleaseArgs,
    config: &Config,
    github: &GithubManager,
    repo_root: &Path,
    out: &mut WorkflowOutput<W>,
) -> Result<()> {
    info!("arg api-url : {:?}", args.api_url);
    info!("arg version : {:?}", args.version);
    info!("arg sender : {:?}", args.sender);
    info!("arg pr_branch : {:?}", args.pr_branch);
    info!("arg pr_body : {:?}", args.pr_body);

    let checker = ReleaseChecker::new(github, config.bot_name.as_deref());
    let sender = args.sender.as_deref().unwrap_or_default();

    if let Some(branch) = &args.pr_branch {
        let body = args.pr_body.as_deref().unwrap_or_default();

        match &args.api_url {
            Some(api_url) => {
                if let Some(version) = checker
                    .release_branch_version(sender, branch, body, api_url)
                    .await?
                {
                    info!("Dev release pull request found");
                    out.set(DEV_RELEASE_BRANCH, true)?;
                    out.set(PR_VERSION, version)?;
                    out.set(PR_RELEASE_BODY, body)?;
                    return Ok(());
                }
            }
            None => {
                info!("no api url given, {branch} is not checked as a release branch")
            }
        }
    }

    if let Some(api_url) = &args.api_url {
        let version_only = checker.is_version_file_only(api_url).await?;
        let authorized = Approvers::load(repo_root)?.is_authorized(sender);

        if version_only && authorized {
            let release = ReleaseInfo::load(repo_root)?;
            info!("Release found in PR files : {}.", release.version);
            out.set(PR_VERSION, &release.version)?;
            out.set(PR_RELEASE_IMAGE, &release.image)?;
            out.set(PR_RELEASE_INFO, serde_json::to_string(&release.notes)?)?;
            out.set(PR_INCLUDES_RELEASE_ONLY, true)?;

            let body = release.release_body();
            info!("Release body: {body}");
            out.set(PR_RELEASE_BODY, body)?;
        } else if !authorized {
            error!("sender not authorized : {sender}.");
            out.set(SENDER_NOT_AUTHORIZED, true)?;
        }

        return Ok(());
    }

    let Some(version) = &args.version else {
        error!("no valid parameter set to release checker.");
        return Ok(());
    };

    let release = ReleaseInfo::load(repo_root)?;
    if is_newer_version(version, &release.version) {
        info!(
            "Release {version} found in PR files is newer than: {}.",
            release.version
        );
        out.set(RELEASE_UPDATED, true)?;
    } else {
        error!("Release found in PR files is not new : {version}.");
    }

    Ok(())
}
