//! Board geometry for the Gambit chess arm.
//!
//! This crate is pure and I/O-free: it parses algebraic squares and moves,
//! holds the four-corner board calibration, and maps squares to physical
//! coordinates on the board plane by bilinear interpolation. The calibration
//! is set once per session and never mutated; mapping the same square twice
//! always yields the same point.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod calibration;
pub mod mapper;
pub mod square;

pub use calibration::{BoardCalibration, EdgePair, Point};
pub use mapper::BoardMapper;
pub use square::{PieceMove, Square};

use thiserror::Error;

/// Errors raised while parsing moves or mapping squares.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    /// Input was not a well-formed square pair (wrong length, bad file
    /// letter, or rank outside 1-8). Raised before any hardware is touched.
    #[error("Malformed move {input:?}: {reason}")]
    MalformedMove {
        /// The rejected input.
        input: String,
        /// What made it unparseable.
        reason: &'static str,
    },

    /// The square parsed fine but lies outside the calibrated file range.
    /// The mapper never extrapolates past the corner points.
    #[error("Square {square} is outside the calibrated range {file_min}1-{file_max}8")]
    OutOfRangeSquare {
        /// The offending square.
        square: Square,
        /// First calibrated file.
        file_min: char,
        /// Last calibrated file.
        file_max: char,
    },

    /// The corner table itself is unusable.
    #[error("Invalid board calibration: {0}")]
    InvalidCalibration(&'static str),
}

/// A specialized `Result` type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;
