//! Report-only submission scenario.
//!
//! A vendor submits an error-free verification report without a chart. The
//! scenario prepares a base branch carrying the vendor OWNERS file, pushes
//! the report on a PR branch, opens the pull request and waits for the
//! submission workflow to merge it and publish the chart to the index.
//!
//! Branch layout on the test repository, for local branch `<current>`:
//!
//! - `<current>` pushed as is
//! - `<category>-<vendor>-report-only-<current>` base branch
//! - `<base>-gh-pages` index branch, created from `dev-gh-pages`
//! - `<base>-pr` PR branch holding the report
use log::*;
use nanoid::nanoid;
use std::{fs, time::Duration};

use crate::{
    Result,
    chart_path::{ChartCategory, ChartPath},
    config::{BotCredential, Config, GITHUB_ACTIONS_BOT_EMAIL},
    error::ChartflowError,
    git::{GitWorkspace, Workspace},
    github::{
        manager::GithubManager, request::CreatePullRequest, types::WorkflowRun,
    },
    harness::{
        index::{ChartIndex, INDEX_FILE},
        templates::{ChartMetadata, render_owners, render_report},
    },
};

/// Branch every scenario index branch is created from.
pub const DEV_GH_PAGES_BRANCH: &str = "dev-gh-pages";

const SUCCESS_CONCLUSION: &str = "success";

/// How long to wait for the submission workflow.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            attempts: 90,
        }
    }
}

/// Vendor name made unique per run so concurrent runs do not collide.
pub fn unique_vendor(vendor: &str) -> String {
    format!("{vendor}-{}", nanoid!(8))
}

/// Base branch for a scenario started from `current`.
pub fn report_only_branch(current: &str) -> String {
    format!("report-only-{current}")
}

pub fn pr_branch_name(base: &str) -> String {
    format!("{base}-pr")
}

pub fn gh_pages_branch(base: &str) -> String {
    format!("{base}-gh-pages")
}

pub struct Scenario<'a> {
    config: &'a Config,
    github: &'a GithubManager,
    workspace: GitWorkspace,
    credential: BotCredential,
    test_repo: String,
    report_template: String,
    chart: ChartMetadata,
    poll: PollSettings,
    /// Branch created from a detached HEAD in GitHub Actions.
    head_sha_branch: Option<String>,
    base_branch: String,
    pr_branch: String,
    category: Option<ChartCategory>,
    vendor: String,
    pr_number: Option<u64>,
}

impl<'a> Scenario<'a> {
    /// Resolve credentials, name the local branch and push it to the test
    /// repository.
    pub async fn setup(
        config: &'a Config,
        github: &'a GithubManager,
        workspace: GitWorkspace,
        report_template: String,
    ) -> Result<Self> {
        let credential = config.bot_credential()?;
        let test_repo = config.test_repo()?;
        let chart = ChartMetadata::from_report(&report_template)?;

        let mut head_sha_branch = None;
        if config.github_actions {
            let sha = workspace.head_short_sha()?;
            if !workspace.local_branches()?.contains(&sha) {
                workspace.create_branch(&sha)?;
                workspace.switch_branch(&sha)?;
            }
            head_sha_branch = Some(sha);
        }

        let current = workspace.current_branch()?.ok_or_else(|| {
            ChartflowError::scenario("HEAD is detached, check out a branch")
        })?;

        let branches = github.list_branches(&test_repo).await?;
        if !branches.iter().any(|b| b.name == current) {
            info!(
                "{test_repo}:{current} does not exists, creating with local branch"
            );
        }
        workspace.push(
            &credential.remote_url(&test_repo),
            "HEAD",
            &current,
            true,
        )?;

        let base_branch = report_only_branch(&current);
        let pr_branch = pr_branch_name(&base_branch);

        Ok(Self {
            config,
            github,
            workspace,
            credential,
            test_repo,
            report_template,
            chart,
            poll: PollSettings::default(),
            head_sha_branch,
            base_branch,
            pr_branch,
            category: None,
            vendor: String::new(),
            pr_number: None,
        })
    }

    pub fn select_vendor(&mut self, category: ChartCategory, vendor: &str) {
        self.category = Some(category);
        self.vendor = unique_vendor(vendor);
        info!("submitting as {category} vendor {}", self.vendor);
    }

    /// Prepare the base branch with the vendor OWNERS file and push the
    /// report to the PR branch.
    pub async fn submit_report(&mut self) -> Result<()> {
        let category = self.category.ok_or_else(|| {
            ChartflowError::scenario("no vendor selected for the submission")
        })?;

        self.base_branch =
            format!("{category}-{}-{}", self.vendor, self.base_branch);
        self.pr_branch = pr_branch_name(&self.base_branch);

        let bot_name = self.credential.name.clone();
        let remote_url = self.credential.remote_url(&self.test_repo);

        self.workspace
            .set_identity(&bot_name, GITHUB_ACTIONS_BOT_EMAIL)?;
        if self.config.workflow_development {
            info!("Workflow development enabled");
            self.workspace.commit_all("Checkpoint")?;
        }

        let gh_pages = gh_pages_branch(&self.base_branch);
        info!(
            "Create '{}:{gh_pages}' from '{}:{DEV_GH_PAGES_BRANCH}'",
            self.test_repo, self.test_repo
        );
        let sha = self
            .github
            .get_branch_sha(&self.test_repo, DEV_GH_PAGES_BRANCH)
            .await?;
        self.github
            .create_branch_ref(&self.test_repo, &gh_pages, &sha)
            .await?;

        let temp_dir = tempfile::Builder::new().prefix("tci-").tempdir()?;
        let worktree_dir = temp_dir.path().join("worktree");
        info!("Worktree directory: {}", worktree_dir.display());

        self.workspace.create_branch(&self.base_branch)?;
        let worktree =
            self.workspace.add_worktree(&worktree_dir, &self.base_branch)?;
        worktree.set_identity(&bot_name, GITHUB_ACTIONS_BOT_EMAIL)?;

        let chart_path = ChartPath {
            category,
            vendor: self.vendor.clone(),
            chart: self.chart.name.clone(),
            version: self.chart.version.clone(),
        };
        let chart_dir = chart_path.chart_dir();
        let version_dir = format!("{chart_dir}/{}", chart_path.version);
        let owners_path = format!("{chart_dir}/OWNERS");
        fs::create_dir_all(worktree_dir.join(&version_dir))?;

        for path in [&version_dir, &owners_path] {
            info!(
                "Remove {path} from {}:{}",
                self.test_repo, self.base_branch
            );
            if worktree.remove_cached(path)? {
                worktree.commit(&format!("Remove {path}"))?;
                worktree.push(&remote_url, "HEAD", &self.base_branch, false)?;
            } else {
                info!(
                    "{path} not exist on {}:{}",
                    self.test_repo, self.base_branch
                );
            }
        }

        let owners = render_owners(&self.chart.name, &bot_name, &self.vendor)?;
        fs::write(worktree_dir.join(&owners_path), owners)?;

        info!(
            "Push OWNERS file to '{}:{}'",
            self.test_repo, self.base_branch
        );
        worktree.add_path(&owners_path)?;
        worktree.commit(&format!(
            "Add {} {} OWNERS file",
            self.vendor, self.chart.name
        ))?;
        worktree.push(&remote_url, "HEAD", &self.base_branch, true)?;

        info!("Push report to '{}:{}'", self.test_repo, self.pr_branch);
        let report = render_report(
            &self.report_template,
            &self.test_repo,
            &self.base_branch,
        )?;
        let report_path = format!("{version_dir}/report.yaml");
        fs::write(worktree_dir.join(&report_path), report)?;

        worktree.add_path(&report_path)?;
        worktree.commit(&format!(
            "Add {} {} {} report",
            self.vendor, self.chart.name, self.chart.version
        ))?;
        worktree.push(&remote_url, "HEAD", &self.pr_branch, true)?;

        Ok(())
    }

    /// Open the pull request from the PR branch onto the base branch.
    pub async fn send_pull_request(&mut self) -> Result<u64> {
        info!(
            "Create PR with report from '{}:{}'",
            self.test_repo, self.pr_branch
        );
        let request = CreatePullRequest {
            head: self.pr_branch.clone(),
            base: self.base_branch.clone(),
            title: self.pr_branch.clone(),
            body: self.config.pr_body.clone().unwrap_or_default(),
        };

        let pr = self
            .github
            .create_pull_request(&self.test_repo, &request)
            .await?
            .into_result()?;

        self.pr_number = Some(pr.number);
        Ok(pr.number)
    }

    /// Wait for the workflow run triggered by the PR branch to complete.
    pub async fn wait_for_workflow(&self) -> Result<WorkflowRun> {
        let mut run_id = None;

        for attempt in 1..=self.poll.attempts {
            match run_id {
                None => {
                    let runs = self
                        .github
                        .list_workflow_runs(&self.test_repo, &self.pr_branch)
                        .await?;
                    let run = runs.into_iter().find(|run| {
                        run.head_branch.as_deref() == Some(self.pr_branch.as_str())
                    });
                    match run {
                        Some(run) if run.is_completed() => return Ok(run),
                        Some(run) => {
                            info!("found workflow run {}", run.id);
                            run_id = Some(run.id);
                        }
                        None => debug!(
                            "no workflow run for {} yet ({attempt}/{})",
                            self.pr_branch, self.poll.attempts
                        ),
                    }
                }
                Some(id) => {
                    let run =
                        self.github.get_workflow_run(&self.test_repo, id).await?;
                    if run.is_completed() {
                        return Ok(run);
                    }
                    debug!(
                        "workflow run {id} is {} ({attempt}/{})",
                        run.status.as_deref().unwrap_or("unknown"),
                        self.poll.attempts
                    );
                }
            }

            tokio::time::sleep(self.poll.interval).await;
        }

        Err(ChartflowError::scenario(format!(
            "workflow run for {} did not complete after {} attempts",
            self.pr_branch, self.poll.attempts
        )))
    }

    /// The workflow must succeed and the pull request must be merged.
    pub async fn assert_merged(&self) -> Result<()> {
        let number = self.pr_number.ok_or_else(|| {
            ChartflowError::scenario("no pull request has been sent")
        })?;

        let run = self.wait_for_workflow().await?;
        if run.conclusion.as_deref() != Some(SUCCESS_CONCLUSION) {
            return Err(ChartflowError::scenario(format!(
                "Workflow for the submitted PR did not success, run id: {}",
                run.id
            )));
        }
        info!("Workflow run was '{SUCCESS_CONCLUSION}'");

        if !self
            .github
            .is_pull_request_merged(&self.test_repo, number)
            .await?
        {
            return Err(ChartflowError::scenario(
                "Workflow for submitted PR success but PR not merged",
            ));
        }
        info!("PR merged sucessfully");

        Ok(())
    }

    /// The published index must list the submitted chart version.
    pub fn check_index(&self) -> Result<()> {
        let gh_pages = gh_pages_branch(&self.base_branch);
        self.workspace.fetch_branch(
            &self.credential.remote_url(&self.test_repo),
            &gh_pages,
        )?;

        let content = self.workspace.read_file_at_branch(&gh_pages, INDEX_FILE)?;
        let index = ChartIndex::parse(&content)?;

        let entry = format!("{}-{}", self.vendor, self.chart.name);
        if !index.has_release(&entry, &self.chart.version) {
            return Err(ChartflowError::scenario(format!(
                "{} {} not added to index",
                self.chart.name, self.chart.version
            )));
        }

        info!("Index updated correctly, cleaning up local branch");
        self.workspace.delete_local_branch(&gh_pages)?;
        Ok(())
    }

    /// Remove every branch the scenario created. Failures are logged and
    /// ignored.
    pub async fn teardown(self) {
        if let Err(e) = self.workspace.prune_worktrees() {
            warn!("failed to prune worktrees: {e}");
        }

        let mut remote_branches = vec![];
        if let Some(sha) = &self.head_sha_branch {
            remote_branches.push(sha.clone());
        }
        remote_branches.push(self.base_branch.clone());
        remote_branches.push(gh_pages_branch(&self.base_branch));
        remote_branches.push(self.pr_branch.clone());

        for branch in remote_branches {
            info!("Delete '{}:{branch}'", self.test_repo);
            match self.github.delete_branch(&self.test_repo, &branch).await {
                Ok(response) if !response.is_success() => {
                    warn!(
                        "failed to delete {branch}: status {}",
                        response.status
                    )
                }
                Ok(_) => {}
                Err(e) => warn!("failed to delete {branch}: {e}"),
            }
        }

        info!("Delete local '{}'", self.base_branch);
        if self.workspace.delete_local_branch(&self.base_branch).is_err() {
            info!("Local '{}' does not exist", self.base_branch);
        }
    }

    async fn run_steps(
        &mut self,
        category: ChartCategory,
        vendor: &str,
    ) -> Result<()> {
        self.select_vendor(category, vendor);
        self.submit_report().await?;
        self.send_pull_request().await?;
        self.assert_merged().await?;
        self.check_index()
    }
}

/// Run the report-only scenario for `vendor` from the repository in the
/// current directory. Teardown always runs.
pub async fn run_report_only_scenario(
    config: &Config,
    category: ChartCategory,
    vendor: &str,
    report_template: &str,
) -> Result<()> {
    let github = GithubManager::from_config(config)?;
    let workspace = GitWorkspace::discover()?;

    let mut scenario =
        Scenario::setup(config, &github, workspace, report_template.into())
            .await?;

    let result = scenario.run_steps(category, vendor).await;
    scenario.teardown().await;

    result
}
