use thiserror::Error;

use crate::git::worker::GitWorkerError;

/// Fatal failures of the commit loop. Push failures never surface here.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("not in a git repository or git executable not found")]
    Preflight(#[source] GitWorkerError),

    #[error("failed to create local commit {commit}; check git configuration")]
    Commit {
        commit: u64,
        #[source]
        source: GitWorkerError,
    },

    #[error("failed to install signal handlers")]
    Signals(#[source] std::io::Error),

    #[error("commit loop terminated abnormally")]
    Consumer(#[from] tokio::task::JoinError),
}
