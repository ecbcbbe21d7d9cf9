//! Acknowledgment pacing.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::{CancelToken, Channel, LinkError, LinkResult};

/// What came of waiting for the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// The device sent something non-blank within the window.
    Acknowledged {
        /// Time from the start of the wait to the first content.
        elapsed: Duration,
    },
    /// The window elapsed silently. Deliberately not an error: the arm has
    /// no busy signal, so the choreography proceeds on the assumption the
    /// motion completed unreported.
    TimedOut {
        /// The full window that was waited.
        elapsed: Duration,
    },
}

impl AckOutcome {
    /// Whether any acknowledgment bytes actually arrived.
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, AckOutcome::Acknowledged { .. })
    }

    /// Wall time spent waiting.
    pub fn elapsed(&self) -> Duration {
        match *self {
            AckOutcome::Acknowledged { elapsed } | AckOutcome::TimedOut { elapsed } => elapsed,
        }
    }
}

/// Polls a channel until the device answers or a window elapses.
///
/// The arm controller answers each motion line with a short status blob once
/// the segment lands; arrival of *any* non-whitespace bytes is the proxy for
/// "segment complete". Whitespace-only chatter (stray CR/LF) does not count.
#[derive(Debug, Clone, Copy)]
pub struct ResponseWaiter {
    poll_interval: Duration,
    timeout: Duration,
}

impl ResponseWaiter {
    /// Builds a waiter with an explicit poll cadence and window.
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }

    /// The configured window.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Blocks until the channel produces content, the window elapses, or the
    /// token is cancelled.
    ///
    /// # Errors
    ///
    /// [`LinkError::Io`] if a poll or read fails (fatal for the step);
    /// [`LinkError::Cancelled`] if the token fires mid-wait. A silent window
    /// is **not** an error; it returns [`AckOutcome::TimedOut`].
    pub fn await_response(
        &self,
        channel: &mut dyn Channel,
        cancel: &CancelToken,
    ) -> LinkResult<AckOutcome> {
        let start = Instant::now();
        let mut buffer: Vec<u8> = Vec::new();
        loop {
            if cancel.is_cancelled() {
                return Err(LinkError::Cancelled {
                    device: channel.device().to_owned(),
                });
            }

            if channel.bytes_available()? > 0 {
                buffer.extend_from_slice(&channel.read_available()?);
                if buffer.iter().any(|b| !b.is_ascii_whitespace()) {
                    let elapsed = start.elapsed();
                    debug!(
                        device = channel.device(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        bytes = buffer.len(),
                        "device acknowledged"
                    );
                    return Ok(AckOutcome::Acknowledged { elapsed });
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                warn!(
                    device = channel.device(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "no acknowledgment within the window, continuing"
                );
                return Ok(AckOutcome::TimedOut { elapsed });
            }

            thread::sleep(self.poll_interval);
        }
    }
}
