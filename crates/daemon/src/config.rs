// Bot configuration.
//
// Every field has a default; with no file and no flags the bot commits every
// 50 ms and pushes every 1000 commits to `origin HEAD`.
// Optional file: `<repo>/.commitpulse.toml`, or an explicit `--config` path.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::bot::CommitOptions;

pub const DEFAULT_COMMIT_INTERVAL_MS: u64 = 50;
pub const DEFAULT_BATCH_SIZE: u64 = 1000;

const CONFIG_FILE_NAME: &str = ".commitpulse.toml";

/// Path to the per-repository config file: `<repo>/.commitpulse.toml`.
pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(CONFIG_FILE_NAME)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Repository the bot commits into.
    pub repo_path: PathBuf,
    /// Delay between empty commits.
    pub commit_interval_ms: u64,
    /// Push after this many commits.
    pub batch_size: u64,
    pub remote: String,
    /// Refspec passed to `git push <remote>`.
    pub push_ref: String,
    /// Commit subject prefix, followed by `: <n> @ <timestamp>`.
    pub message_prefix: String,
    /// Git executable name or path.
    pub git_program: String,
    /// Skip commit hooks.
    pub no_verify: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            commit_interval_ms: DEFAULT_COMMIT_INTERVAL_MS,
            batch_size: DEFAULT_BATCH_SIZE,
            remote: "origin".into(),
            push_ref: "HEAD".into(),
            message_prefix: "Test commit".into(),
            git_program: "git".into(),
            no_verify: true,
        }
    }
}

impl BotConfig {
    /// Load `<repo>/.commitpulse.toml`. A missing file yields defaults; a
    /// malformed one is an error.
    pub fn load(repo_root: &Path) -> Result<Self, ConfigError> {
        let path = repo_config_path(repo_root);
        if !path.exists() {
            return Ok(Self { repo_path: repo_root.to_path_buf(), ..Self::default() });
        }

        let mut config = Self::load_from(&path)?;
        if config.repo_path.is_relative() {
            config.repo_path = repo_root.join(&config.repo_path);
        }
        Ok(config)
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(ConfigError::Parse)
    }

    pub fn commit_interval(&self) -> Result<Duration, ConfigError> {
        if self.commit_interval_ms == 0 {
            return Err(ConfigError::Invalid("commit_interval_ms must be greater than zero".into()));
        }
        Ok(Duration::from_millis(self.commit_interval_ms))
    }

    pub fn commit_options(&self) -> Result<CommitOptions, ConfigError> {
        let batch_size = NonZeroU64::new(self.batch_size)
            .ok_or_else(|| ConfigError::Invalid("batch_size must be greater than zero".into()))?;
        if self.remote.trim().is_empty() {
            return Err(ConfigError::Invalid("remote must not be empty".into()));
        }
        if self.git_program.trim().is_empty() {
            return Err(ConfigError::Invalid("git_program must not be empty".into()));
        }

        Ok(CommitOptions {
            batch_size,
            remote: self.remote.clone(),
            push_ref: self.push_ref.clone(),
            message_prefix: self.message_prefix.clone(),
            no_verify: self.no_verify,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.commit_interval()?;
        self.commit_options().map(|_| ())
    }
}

// ── Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[source] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[source] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_built_in_constants() {
        let config = BotConfig::default();

        assert_eq!(config.commit_interval().unwrap(), Duration::from_millis(50));
        let options = config.commit_options().unwrap();
        assert_eq!(options.batch_size.get(), 1000);
        assert_eq!(options.remote, "origin");
        assert_eq!(options.push_ref, "HEAD");
        assert_eq!(options.message_prefix, "Test commit");
        assert!(options.no_verify);
    }

    #[test]
    fn load_missing_file_returns_defaults_rooted_at_repo() {
        let tmp = TempDir::new().unwrap();

        let config = BotConfig::load(tmp.path()).unwrap();

        assert_eq!(config.repo_path, tmp.path());
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.commit_interval_ms, DEFAULT_COMMIT_INTERVAL_MS);
    }

    #[test]
    fn load_partial_file_keeps_remaining_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            repo_config_path(tmp.path()),
            "batch_size = 25\nremote = \"backup\"\n",
        )
        .unwrap();

        let config = BotConfig::load(tmp.path()).unwrap();

        assert_eq!(config.batch_size, 25);
        assert_eq!(config.remote, "backup");
        assert_eq!(config.commit_interval_ms, DEFAULT_COMMIT_INTERVAL_MS);
        assert_eq!(config.repo_path, tmp.path().join("."));
    }

    #[test]
    fn load_from_full_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bot.toml");
        std::fs::write(
            &path,
            r#"
repo_path = "/srv/heartbeat"
commit_interval_ms = 1000
batch_size = 10
remote = "mirror"
push_ref = "HEAD:refs/heads/pulse"
message_prefix = "pulse"
git_program = "/usr/bin/git"
no_verify = false
"#,
        )
        .unwrap();

        let config = BotConfig::load_from(&path).unwrap();

        assert_eq!(config.repo_path, PathBuf::from("/srv/heartbeat"));
        assert_eq!(config.commit_interval().unwrap(), Duration::from_secs(1));
        assert_eq!(config.push_ref, "HEAD:refs/heads/pulse");
        assert_eq!(config.git_program, "/usr/bin/git");
        assert!(!config.no_verify);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(repo_config_path(tmp.path()), "batch_size = \"lots\"").unwrap();

        let error = BotConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(repo_config_path(tmp.path()), "batch = 5").unwrap();

        assert!(matches!(BotConfig::load(tmp.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn zero_batch_size_is_invalid() {
        let config = BotConfig { batch_size: 0, ..BotConfig::default() };

        let error = config.validate().unwrap_err();
        assert_eq!(error.to_string(), "invalid config: batch_size must be greater than zero");
    }

    #[test]
    fn zero_interval_is_invalid() {
        let config = BotConfig { commit_interval_ms: 0, ..BotConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn blank_remote_is_invalid() {
        let config = BotConfig { remote: "  ".into(), ..BotConfig::default() };
        assert!(matches!(config.commit_options(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn config_error_messages_keep_cause() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(repo_config_path(tmp.path()), "batch_size = \"lots\"").unwrap();

        let error = BotConfig::load(tmp.path()).unwrap_err();
        assert!(error.to_string().starts_with("config parse error: "));
        assert!(std::error::Error::source(&error).is_some());

        let invalid = ConfigError::Invalid("batch_size must be greater than zero".into());
        assert_eq!(invalid.to_string(), "invalid config: batch_size must be greater than zero");
    }
}
