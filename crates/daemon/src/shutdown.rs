// Shutdown token shared by the ticker, the signal forwarder and the commit loop.

use tokio::sync::watch;

/// What asked the bot to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// Ctrl+C. The terminal delivers it to the running git child as well.
    Interrupt,
    /// SIGTERM or a programmatic request. Child processes are left alone.
    Requested,
}

/// Read side of the shutdown flag.
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<Option<ShutdownCause>>,
}

impl ShutdownToken {
    pub fn is_shutdown(&self) -> bool {
        self.rx.borrow().is_some()
    }

    pub fn cause(&self) -> Option<ShutdownCause> {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is requested, or once every sender is gone.
    pub async fn wait(&mut self) {
        let _ = self.rx.wait_for(Option::is_some).await;
    }
}

/// Write side of the shutdown flag. The first cause wins.
pub struct ShutdownSender {
    tx: watch::Sender<Option<ShutdownCause>>,
}

impl ShutdownSender {
    pub fn shutdown(&self) {
        self.trigger(ShutdownCause::Requested);
    }

    pub fn interrupt(&self) {
        self.trigger(ShutdownCause::Interrupt);
    }

    pub fn trigger(&self, cause: ShutdownCause) {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(cause);
            true
        });
    }
}

pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(None);
    (ShutdownSender { tx }, ShutdownToken { rx })
}
