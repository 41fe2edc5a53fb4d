//! Shared status snapshot
//!
//! The frame loop is the single writer; a frame-serving or API
//! boundary may read concurrently. Readers always observe a whole
//! snapshot (last-write-wins, no tearing) via a watch channel.

use crate::arbiter::AttentionStatus;
use tokio::sync::watch;

/// Single-writer, multi-reader feed of the latest status.
#[derive(Debug)]
pub struct StatusFeed {
    tx: watch::Sender<AttentionStatus>,
}

impl StatusFeed {
    pub fn new(initial: AttentionStatus) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the shared snapshot with this frame's status.
    pub fn publish(&self, status: AttentionStatus) {
        self.tx.send_replace(status);
    }

    /// Obtain a reader handle; safe to hand across task boundaries.
    pub fn subscribe(&self) -> watch::Receiver<AttentionStatus> {
        self.tx.subscribe()
    }

    /// Latest published snapshot.
    pub fn latest(&self) -> AttentionStatus {
        self.tx.borrow().clone()
    }
}
