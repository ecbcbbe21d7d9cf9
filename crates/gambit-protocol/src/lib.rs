//! Command encoding for the Gambit arm controller and gripper actuator.
//!
//! This crate is intentionally I/O-free: it renders typed motion targets into
//! the exact byte layout the device firmware parses, and nothing else. Every
//! literal protocol constant (rotation trim, joint fields, acceleration
//! block, report mode, trailer) lives in [`arm`], so the grammar is declared
//! in one place and testable against the documented format.
//!
//! The arm controller accepts a single newline-terminated ASCII line per
//! motion segment; the gripper accepts a servo duty command with no other
//! parameters. Neither encoder has side effects.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod arm;
pub mod gripper;
pub mod types;

pub use arm::{PoseFields, decode_pose_fields, encode_pose};
pub use gripper::{GripperDrive, encode_gripper};
pub use types::{GripperAction, Pose};

use thiserror::Error;

/// Errors from the test-side field decoder.
///
/// Encoding is infallible; only decoding a command line back into its numeric
/// fields can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The line does not start with the move-joint command code.
    #[error("Not an arm motion command: {0:?}")]
    BadPrefix(String),

    /// A required field marker is missing from the line.
    #[error("Field {0:?} not found in command")]
    MissingField(&'static str),

    /// A field was present but its value did not parse.
    #[error("Field {field:?} has unparseable value {value:?}")]
    BadValue {
        /// Field marker.
        field: &'static str,
        /// The raw text between markers.
        value: String,
    },
}

/// A specialized `Result` type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
