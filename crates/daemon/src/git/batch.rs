// Commit counter and push batching.
//
// Counts successful commits and decides when a push is due. A push is due
// each time the counter lands on a multiple of the batch size. Commits that
// no successful push has carried yet are tracked separately so the shutdown
// flush also covers batches whose push failed.

use std::num::NonZeroU64;

// ── Push decision ───────────────────────────────────────────────────

/// Why a push is being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushReason {
    /// The counter reached a multiple of the batch size.
    BatchBoundary,
    /// Shutdown with commits still unpushed.
    ShutdownFlush,
}

impl PushReason {
    /// Short label for logs.
    pub fn kind(self) -> &'static str {
        match self {
            PushReason::BatchBoundary => "batch_boundary",
            PushReason::ShutdownFlush => "shutdown_flush",
        }
    }
}

// ── Batch counter ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BatchCounter {
    batch_size: NonZeroU64,
    committed: u64,
    unpushed: u64,
}

impl BatchCounter {
    pub fn new(batch_size: NonZeroU64) -> Self {
        Self { batch_size, committed: 0, unpushed: 0 }
    }

    /// Value the counter will take once the next commit succeeds.
    pub fn next_commit(&self) -> u64 {
        self.committed + 1
    }

    /// Record a successful commit. Returns the new count and whether it
    /// closes a batch.
    pub fn record_commit(&mut self) -> (u64, Option<PushReason>) {
        self.committed += 1;
        self.unpushed += 1;

        let reason = (self.committed % self.batch_size.get() == 0)
            .then_some(PushReason::BatchBoundary);
        (self.committed, reason)
    }

    /// Mark every commit so far as delivered. Returns how many were carried.
    pub fn record_push(&mut self) -> u64 {
        std::mem::take(&mut self.unpushed)
    }

    /// Push needed on shutdown, if any.
    pub fn flush_reason(&self) -> Option<PushReason> {
        (self.unpushed > 0).then_some(PushReason::ShutdownFlush)
    }

    pub fn committed(&self) -> u64 {
        self.committed
    }

    pub fn unpushed(&self) -> u64 {
        self.unpushed
    }
}
