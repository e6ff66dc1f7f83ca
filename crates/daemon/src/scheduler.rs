// Event loop: the ticker and the shutdown forwarder produce, one blocking
// consumer drives the commit bot.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, warn};

use crate::bot::{CommitBot, RunSummary};
use crate::error::BotError;
use crate::git::worker::CommandExecutor;
use crate::shutdown::{ShutdownCause, ShutdownToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotEvent {
    Tick,
    Shutdown,
}

/// Emit `Tick` every `period`, first one after a full period. Stops on
/// shutdown or when the consumer hangs up.
///
/// Never waits on the queue: a tick that finds it full is skipped, so a
/// consumer stuck in a slow push comes back to at most the ticks the queue
/// holds instead of a backlog of every missed period.
pub fn spawn_ticker(
    period: Duration,
    events: mpsc::Sender<BotEvent>,
    mut shutdown: ShutdownToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                _ = interval.tick() => match events.try_send(BotEvent::Tick) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => debug!("consumer busy, skipping tick"),
                    Err(TrySendError::Closed(_)) => break,
                },
            }
        }
        debug!("ticker stopped");
    })
}

/// Turn the shutdown flag into a queued `Shutdown` event.
pub fn spawn_shutdown_forwarder(
    events: mpsc::Sender<BotEvent>,
    mut shutdown: ShutdownToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        shutdown.wait().await;
        let _ = events.send(BotEvent::Shutdown).await;
    })
}

/// Single consumer. Blocks the calling thread until shutdown, a closed
/// queue, or a fatal commit error.
///
/// Ticks still queued once shutdown is requested are dropped, so no commit
/// happens after shutdown begins. A commit that fails after Ctrl+C ends the
/// loop normally, since the interrupt reaches the git child too. Any other
/// commit failure is fatal.
pub fn drive<E: CommandExecutor>(
    mut bot: CommitBot<E>,
    mut events: mpsc::Receiver<BotEvent>,
    shutdown: ShutdownToken,
) -> Result<RunSummary, BotError> {
    while let Some(event) = events.blocking_recv() {
        match event {
            BotEvent::Tick if shutdown.is_shutdown() => {
                debug!("shutdown requested, dropping queued tick");
                break;
            }
            BotEvent::Tick => {
                if let Err(err) = bot.tick() {
                    match shutdown.cause() {
                        Some(ShutdownCause::Interrupt) => {
                            warn!(error = %err, "commit interrupted by Ctrl+C");
                            break;
                        }
                        Some(ShutdownCause::Requested) => {
                            error!(error = %err, "commit failed during shutdown");
                            return Err(err);
                        }
                        None => return Err(err),
                    }
                }
            }
            BotEvent::Shutdown => break,
        }
    }

    events.close();
    Ok(bot.shutdown())
}
