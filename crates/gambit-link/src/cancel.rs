//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable abort flag.
///
/// The sequencer checks it between choreography steps and the response
/// waiter checks it between polls, so an operator can stop a runaway
/// sequence without killing the process. Cancellation is edge-free: once
/// set it stays set until [`reset`](CancelToken::reset).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Safe to call from a signal handler thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clears the flag so the next sequence can run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
