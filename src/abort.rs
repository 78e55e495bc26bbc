//! Abort signalling between a session and its running turn.

use tokio::sync::watch;
use tracing::{debug, instrument};

/// Raises the abort flag for one game.
///
/// Owned by the session. Every [`AbortSignal`] handed out by
/// [`AbortFlag::signal`] observes the flag.
#[derive(Debug)]
pub struct AbortFlag {
    tx: watch::Sender<bool>,
}

impl AbortFlag {
    /// Creates a lowered flag.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Raises the flag and wakes every waiter. Idempotent.
    #[instrument(skip(self))]
    pub fn raise(&self) {
        let was_raised = self.tx.send_replace(true);
        if !was_raised {
            debug!("Abort flag raised");
        }
    }

    /// Whether the flag has been raised.
    pub fn is_raised(&self) -> bool {
        *self.tx.borrow()
    }

    /// Creates a signal observing this flag.
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for AbortFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of an [`AbortFlag`], passed to strategies with each turn.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortSignal {
    /// Whether the game has been aborted.
    ///
    /// A dropped [`AbortFlag`] counts as aborted: nobody is left to apply
    /// the move.
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Completes once the game is aborted.
    pub async fn aborted(&self) {
        let mut rx = self.rx.clone();
        // Err means the flag was dropped, which is treated as an abort.
        let _ = rx.wait_for(|aborted| *aborted).await;
    }
}
