// Commit bot: one empty commit per tick, batched pushes, flush on shutdown.

use std::num::NonZeroU64;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use crate::error::BotError;
use crate::git::batch::{BatchCounter, PushReason};
use crate::git::worker::{CommandExecutor, GitWorker, GitWorkerError, ProcessCommandExecutor};

/// Settings for the commit and push steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOptions {
    pub batch_size: NonZeroU64,
    pub remote: String,
    pub push_ref: String,
    pub message_prefix: String,
    pub no_verify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed { commits: u64 },
    Failed { error: GitWorkerError },
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub commit: u64,
    pub push: Option<PushOutcome>,
}

/// Totals reported when the bot stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commits: u64,
    pub pushes: u64,
    pub failed_pushes: u64,
    pub unpushed: u64,
}

/// `"<prefix>: <n> @ <UTC timestamp with millis>"`.
pub fn commit_message(prefix: &str, commit: u64, at: DateTime<Utc>) -> String {
    format!("{prefix}: {commit} @ {}", at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub struct CommitBot<E = ProcessCommandExecutor> {
    worker: GitWorker<E>,
    options: CommitOptions,
    counter: BatchCounter,
    pushes: u64,
    failed_pushes: u64,
}

impl<E: CommandExecutor> CommitBot<E> {
    pub fn new(worker: GitWorker<E>, options: CommitOptions) -> Self {
        let counter = BatchCounter::new(options.batch_size);
        Self { worker, options, counter, pushes: 0, failed_pushes: 0 }
    }

    /// Create one empty commit and push if it closes a batch.
    ///
    /// A commit failure is fatal and leaves the counter untouched. A push
    /// failure is logged and reported in the outcome only.
    pub fn tick(&mut self) -> Result<TickOutcome, BotError> {
        let next = self.counter.next_commit();
        let message = commit_message(&self.options.message_prefix, next, Utc::now());

        self.worker
            .commit_empty(&message, self.options.no_verify)
            .map_err(|source| BotError::Commit { commit: next, source })?;

        let (commit, reason) = self.counter.record_commit();
        info!(commit, message = %message, "committed");

        let push = reason.map(|reason| self.push(reason));
        Ok(TickOutcome { commit, push })
    }

    /// Flush unpushed commits and report totals. Consumes the bot so no
    /// commit can follow.
    pub fn shutdown(mut self) -> RunSummary {
        info!(commits = self.counter.committed(), "shutting down commit bot");

        if let Some(reason) = self.counter.flush_reason() {
            self.push(reason);
        }

        let summary = self.summary();
        info!(
            commits = summary.commits,
            pushes = summary.pushes,
            failed_pushes = summary.failed_pushes,
            unpushed = summary.unpushed,
            "commit bot halted"
        );
        summary
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            commits: self.counter.committed(),
            pushes: self.pushes,
            failed_pushes: self.failed_pushes,
            unpushed: self.counter.unpushed(),
        }
    }

    fn push(&mut self, reason: PushReason) -> PushOutcome {
        let pending = self.counter.unpushed();
        info!(
            reason = reason.kind(),
            commits = pending,
            total = self.counter.committed(),
            remote = %self.options.remote,
            "pushing commits"
        );

        match self.worker.push(&self.options.remote, &self.options.push_ref) {
            Ok(_) => {
                let commits = self.counter.record_push();
                self.pushes += 1;
                info!(commits, total = self.counter.committed(), "push succeeded");
                PushOutcome::Pushed { commits }
            }
            Err(error) => {
                self.failed_pushes += 1;
                warn!(
                    error = %error,
                    unpushed = pending,
                    "push failed, remote may be throttling; continuing local commits until the next push"
                );
                PushOutcome::Failed { error }
            }
        }
    }
}
