//! Gripper actuator commands.
//!
//! The gripper is a single hobby servo behind a tiny line protocol: set servo
//! zero to a duty position. It never reports back, so there is nothing to
//! decode.

use serde::{Deserialize, Serialize};

use crate::types::GripperAction;

/// Servo-position command prefix (servo index 0).
pub const SERVO_PREFIX: &str = "SV0P";

/// The two tuned jaw positions for a deployment.
///
/// How far "open" opens depends on the piece set, so the duties are
/// configuration rather than protocol constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GripperDrive {
    /// Servo duty for open jaws.
    pub open_duty: u8,
    /// Servo duty for closed jaws.
    pub close_duty: u8,
}

impl GripperDrive {
    /// Duty position for an action.
    pub fn duty_for(&self, action: GripperAction) -> u8 {
        match action {
            GripperAction::Open => self.open_duty,
            GripperAction::Close => self.close_duty,
        }
    }
}

/// Renders a gripper command for the given action.
pub fn encode_gripper(action: GripperAction, drive: &GripperDrive) -> Vec<u8> {
    format!("{SERVO_PREFIX}{}\n", drive.duty_for(action)).into_bytes()
}
