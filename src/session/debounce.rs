//! Debounce scheduler for search text
//!
//! Each call to [`Debouncer::schedule`] aborts the pending timer and starts a
//! new one, so only the last value of a burst survives the quiet window.
//! Fired values arrive on the channel returned by [`Debouncer::channel`] and
//! must be passed back through [`Debouncer::accept`], which rejects a fire
//! that raced an abort.

use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiet window used when none is configured
pub const DEFAULT_DELAY: Duration = Duration::from_millis(400);

/// A value whose quiet window elapsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    token: u64,
    pub value: String,
}

struct Pending {
    token: u64,
    handle: JoinHandle<()>,
}

/// Cancel-and-restart timer; at most one timer is live at a time
pub struct Debouncer {
    delay: Duration,
    tx: mpsc::UnboundedSender<Settled>,
    pending: Option<Pending>,
    seq: u64,
}

impl Debouncer {
    /// Create a debouncer and the receiver its fires are delivered on
    #[must_use]
    pub fn channel(delay: Duration) -> (Self, mpsc::UnboundedReceiver<Settled>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: None,
            seq: 0,
        };
        (debouncer, rx)
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// A timer is running
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Restart the quiet window with `value`
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, value: String) {
        self.cancel();

        self.seq = self.seq.wrapping_add(1);
        let token = self.seq;
        let delay = self.delay;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Settled { token, value });
        });

        self.pending = Some(Pending { token, handle });
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Cancelling pending debounce #{}", pending.token);
            pending.handle.abort();
        }
    }

    /// Claim a fired value
    ///
    /// Returns `None` for a fire that belongs to a cancelled or replaced
    /// timer.
    pub fn accept(&mut self, fired: Settled) -> Option<String> {
        match &self.pending {
            Some(pending) if pending.token == fired.token => {
                self.pending = None;
                Some(fired.value)
            }
            _ => None,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
