//! Byte-stream links to the Gambit devices.
//!
//! Two serial devices hang off the controller host: the arm controller and
//! the gripper actuator. Each is owned exclusively by one [`Channel`] for the
//! life of the process. The channel layer is content-agnostic; it moves bytes
//! and reports failures, nothing more. Pacing against the arm's asynchronous
//! acknowledgment lives in [`ResponseWaiter`].

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod cancel;
pub mod channel;
pub mod waiter;

pub use cancel::CancelToken;
pub use channel::{Channel, SerialChannel};
pub use waiter::{AckOutcome, ResponseWaiter};

use thiserror::Error;

/// Link-layer failures.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    /// Opening the serial device failed at startup.
    #[error("Failed to open {device} on {port}: {message}")]
    Open {
        /// Device label (arm, gripper).
        device: String,
        /// OS port name.
        port: String,
        /// Underlying error text.
        message: String,
    },

    /// A write or read on an open channel failed. Fatal for the in-progress
    /// choreography step; the channel itself stays open for the next move.
    #[error("I/O failure on {device}: {message}")]
    Io {
        /// Device label.
        device: String,
        /// Underlying error text.
        message: String,
    },

    /// The operator cancelled while we were waiting on the device.
    #[error("Cancelled while waiting on {device}")]
    Cancelled {
        /// Device label.
        device: String,
    },
}

/// A specialized `Result` type for link operations.
pub type LinkResult<T> = Result<T, LinkError>;
