//! CLI argument parsing.
use clap::{Parser, Subcommand};

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Workflow helper subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether a pull request carries a release and set workflow
    /// outputs accordingly.
    CheckRelease(CheckReleaseArgs),

    /// Commit local changes on a new branch and open a pull request.
    CreatePr(CreatePrArgs),
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct CheckReleaseArgs {
    #[arg(short = 'a', long = "api-url")]
    /// API URL for the pull request.
    pub api_url: Option<String>,

    #[arg(short = 'v', long = "version")]
    /// Version to compare with the current release version.
    pub version: Option<String>,

    #[arg(short = 's', long = "sender")]
    /// Sender of the pull request.
    pub sender: Option<String>,

    #[arg(short = 'b', long = "pr_branch")]
    /// Pull request branch name.
    pub pr_branch: Option<String>,

    #[arg(short = 't', long = "pr_body")]
    /// Pull request body.
    pub pr_body: Option<String>,
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct CreatePrArgs {
    #[arg(long)]
    /// Branch to create. Also used as commit message and PR title.
    pub branch: String,

    #[arg(long = "skip")]
    /// File to leave out of the commit. May be repeated.
    pub skip: Vec<String>,

    #[arg(long)]
    /// Target repository as owner/repo. Defaults to the organization's
    /// charts repository.
    pub repository: Option<String>,

    #[arg(long, default_value = "")]
    /// Pull request body.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_release_flags() {
        let args = Args::try_parse_from([
            "chartflow",
            "check-release",
            "-a",
            "https://api.github.com/repos/acme/charts/pulls/3",
            "-s",
            "chart-bot",
            "--pr_branch",
            "Auto-Release-1.0.0",
            "-t",
            "Charts workflow version 1.0.0",
        ])
        .unwrap();

        let Command::CheckRelease(check) = args.command else {
            panic!("expected check-release");
        };
        assert_eq!(
            check.api_url.as_deref(),
            Some("https://api.github.com/repos/acme/charts/pulls/3")
        );
        assert_eq!(check.sender.as_deref(), Some("chart-bot"));
        assert_eq!(check.pr_branch.as_deref(), Some("Auto-Release-1.0.0"));
        assert!(check.version.is_none());
        assert!(!args.debug);
    }

    #[test]
    fn parses_create_pr_with_repeated_skip() {
        let args = Args::try_parse_from([
            "chartflow",
            "create-pr",
            "--branch",
            "Auto-Release-1.0.0",
            "--skip",
            "release/release_info.json",
            "--skip",
            "README.md",
            "--debug",
        ])
        .unwrap();

        let Command::CreatePr(create) = args.command else {
            panic!("expected create-pr");
        };
        assert_eq!(create.branch, "Auto-Release-1.0.0");
        assert_eq!(create.skip, vec!["release/release_info.json", "README.md"]);
        assert!(create.repository.is_none());
        assert_eq!(create.message, "");
        assert!(args.debug);
    }

    #[test]
    fn create_pr_requires_branch() {
        assert!(Args::try_parse_from(["chartflow", "create-pr"]).is_err());
    }
}
