//! The piece-transfer choreography engine.
//!
//! One [`MotionSequencer`] owns the two device channels and drives the fixed
//! thirteen-step choreography that moves a piece between squares: open the
//! jaws, park clear of the board, travel over the start square, descend,
//! grip, lift, park again, travel over the end square, descend, release,
//! lift, return home, stow the jaws. Transitions are unconditional and
//! strictly ordered; each step is one wire command paced by the device's
//! acknowledgment (or a fixed settle delay for the mute gripper).
//!
//! Failure semantics: malformed or out-of-range moves are rejected before a
//! single byte is written; a link I/O failure aborts the sequence at the
//! current step and leaves the channels open for the next move; a silent
//! acknowledgment window is recorded in the report but never aborts.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod report;
pub mod sequencer;

pub use report::{StepReport, TransferReport};
pub use sequencer::{MotionSequencer, TransferStep};

use thiserror::Error;

use gambit_board::BoardError;
use gambit_link::LinkError;

/// Why a transfer did not complete.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// The move was rejected before any hardware command was issued.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// A serial write or read failed; the sequence stopped at this step.
    #[error("Link failure at step {step}: {source}")]
    Link {
        /// Step that was executing.
        step: TransferStep,
        /// The underlying link failure.
        #[source]
        source: LinkError,
    },

    /// The operator aborted between steps or mid-wait.
    #[error("Transfer cancelled at step {step}")]
    Cancelled {
        /// Step that was about to run (or was waiting).
        step: TransferStep,
    },

    /// A transfer is already in flight on this sequencer.
    #[error("A transfer is already in flight")]
    Busy,
}

/// A specialized `Result` type for sequencer operations.
pub type SequenceResult<T> = Result<T, SequenceError>;
