// commitpulse entry point.

use std::process;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commitpulse::bot::{CommitBot, RunSummary};
use commitpulse::cli::Cli;
use commitpulse::exit_code::ExitCode;
use commitpulse::git::worker::GitWorker;
use commitpulse::runtime;

#[tokio::main]
async fn main() -> process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(summary) => {
            info!(commits = summary.commits, unpushed = summary.unpushed, "cleanup complete");
            ExitCode::Success.into()
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::from_error(&err).into()
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<RunSummary> {
    let config = cli.resolve_config().context("failed to load configuration")?;
    let period = config.commit_interval()?;
    let options = config.commit_options()?;

    let worker = GitWorker::new(&config.repo_path).with_program(config.git_program.clone());
    runtime::preflight(&worker)?;

    info!(
        interval_ms = config.commit_interval_ms,
        batch_size = config.batch_size,
        remote = %config.remote,
        repo = %config.repo_path.display(),
        "starting commit bot; press Ctrl+C to stop and push remaining commits"
    );

    runtime::run_with_signals(CommitBot::new(worker, options), period)
        .await
        .context("commit bot stopped")
}
