// Command-line overrides. With no flags the built-in defaults apply.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{BotConfig, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "commitpulse", about = "Create empty git commits on a timer and push them in batches")]
pub struct Cli {
    /// Repository to commit into (default: current directory).
    #[arg(long)]
    pub repo: Option<PathBuf>,
    /// Config file (default: `<repo>/.commitpulse.toml` if present).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Milliseconds between empty commits.
    #[arg(long)]
    pub interval_ms: Option<u64>,
    /// Push after this many commits.
    #[arg(long)]
    pub batch_size: Option<u64>,
    /// Remote to push to.
    #[arg(long)]
    pub remote: Option<String>,
}

impl Cli {
    /// Load the config file and apply flag overrides on top.
    pub fn resolve_config(&self) -> Result<BotConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => BotConfig::load_from(path)?,
            None => BotConfig::load(self.repo.as_deref().unwrap_or(std::path::Path::new(".")))?,
        };

        if let Some(repo) = &self.repo {
            config.repo_path = repo.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            config.commit_interval_ms = interval_ms;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(remote) = &self.remote {
            config.remote = remote.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
