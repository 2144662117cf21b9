use clap::Parser;
use color_eyre::eyre::eyre;
use std::path::Path;

use chartflow::{
    Result,
    cli::{Args, Command},
    command::{check_release, create_pr},
    config::Config,
    git::GitWorkspace,
    github::manager::GithubManager,
    output::WorkflowOutput,
    pull_request::PrOutcome,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("chartflow")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let config = Config::from_env();
    let github = GithubManager::from_config(&config)?;
    let mut out = WorkflowOutput::stdout();

    match cli_args.command {
        Command::CheckRelease(args) => {
            check_release::execute(
                &args,
                &config,
                &github,
                Path::new("."),
                &mut out,
            )
            .await?;
        }
        Command::CreatePr(args) => {
            let workspace = GitWorkspace::discover()?;
            let outcome =
                create_pr::execute(&args, &config, &workspace, &github, &mut out)
                    .await?;
            if outcome == PrOutcome::Failed {
                return Err(eyre!("failed to create pull request").into());
            }
        }
    }

    Ok(())
}
