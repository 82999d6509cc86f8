//! Single-slot mailboxes.
//!
//! A signal carries no data, only "something happened". The slot holds at
//! most one pending post; posting into a full slot is a no-op, so a burst of
//! posts collapses into a single wake-up on the receiving side.
//!
//! Posting never blocks and works from any thread, including ones outside
//! the tokio runtime.

use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};

#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::Sender<()>,
}

#[derive(Debug)]
pub struct SignalReceiver {
    rx: mpsc::Receiver<()>,
}

pub fn signal() -> (SignalSender, SignalReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (SignalSender { tx }, SignalReceiver { rx })
}

impl SignalSender {
    /// Returns `true` if this post filled an empty slot, `false` if one was
    /// already pending or the receiver is gone.
    pub fn post(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => false,
            Err(TrySendError::Closed(())) => false,
        }
    }
}

impl SignalReceiver {
    /// Waits for a post. Returns `false` once every sender has been dropped
    /// and nothing is pending.
    pub async fn wait(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Consumes a pending post without waiting.
    pub fn try_take(&mut self) -> bool {
        match self.rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
        }
    }
}
