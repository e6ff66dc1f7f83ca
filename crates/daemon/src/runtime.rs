use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::bot::{CommitBot, RunSummary};
use crate::error::BotError;
use crate::git::worker::{CommandExecutor, GitWorker};
use crate::scheduler::{drive, spawn_shutdown_forwarder, spawn_ticker};
use crate::shutdown::{shutdown_channel, ShutdownCause, ShutdownToken};

// One slot: the ticker skips rather than queue behind a slow push.
const EVENT_QUEUE_DEPTH: usize = 1;

/// Fail fast when git is missing or the directory is not a repository.
pub fn preflight<E: CommandExecutor>(worker: &GitWorker<E>) -> Result<(), BotError> {
    worker.status().map(|_| ()).map_err(BotError::Preflight)
}

/// Run until Ctrl+C (or SIGTERM on unix), then flush and return totals.
///
/// Signal handlers are installed before the first tick, so an early Ctrl+C
/// still goes through the flush instead of killing the process.
pub async fn run_with_signals<E>(bot: CommitBot<E>, period: Duration) -> Result<RunSummary, BotError>
where
    E: CommandExecutor + 'static,
{
    let signals = listen_for_signals().map_err(BotError::Signals)?;
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        let cause = signals.await;
        shutdown_tx.trigger(cause);
    });

    run_until_shutdown(bot, period, shutdown_rx).await
}

/// Drive `bot` from a ticker until `shutdown` fires or a commit fails.
pub async fn run_until_shutdown<E>(
    bot: CommitBot<E>,
    period: Duration,
    shutdown: ShutdownToken,
) -> Result<RunSummary, BotError>
where
    E: CommandExecutor + 'static,
{
    let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let ticker = spawn_ticker(period, events_tx.clone(), shutdown.clone());
    let forwarder = spawn_shutdown_forwarder(events_tx, shutdown.clone());

    let consumer = tokio::task::spawn_blocking(move || drive(bot, events_rx, shutdown));
    let result = consumer.await;

    ticker.abort();
    forwarder.abort();
    result?
}

/// Register the handlers now; the returned future resolves on the first
/// signal.
#[cfg(unix)]
fn listen_for_signals() -> std::io::Result<impl Future<Output = ShutdownCause>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => {
                info!("caught interrupt signal (Ctrl+C)");
                ShutdownCause::Interrupt
            }
            _ = terminate.recv() => {
                info!("caught terminate signal");
                ShutdownCause::Requested
            }
        }
    })
}

#[cfg(not(unix))]
fn listen_for_signals() -> std::io::Result<impl Future<Output = ShutdownCause>> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;

    Ok(async move {
        ctrl_c.recv().await;
        info!("caught interrupt signal (Ctrl+C)");
        ShutdownCause::Interrupt
    })
}
