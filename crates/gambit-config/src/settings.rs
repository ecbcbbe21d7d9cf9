//! Configuration schema and deployment defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use gambit_board::{BoardCalibration, EdgePair, Point};
use gambit_protocol::GripperDrive;

use crate::{ConfigError, ConfigResult};

/// One serial device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSettings {
    /// OS port name, e.g. `/dev/ttyUSB0` or `COM16`.
    pub port: String,
    /// Line rate; both deployed devices run 9600.
    #[serde(default = "default_baud")]
    pub baud: u32,
}

fn default_baud() -> u32 {
    9600
}

/// Heights and per-step speeds for the choreography.
///
/// Speeds are the arm's `Sp` field units. The approach speed is deliberately
/// slow: it is the only segment that moves with the jaws near pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionProfile {
    /// Cruise height for travel segments, millimetres.
    pub travel_height: f64,
    /// Height at which the jaws surround a piece, millimetres.
    pub contact_height: f64,
    /// Speed for lateral travel at cruise height.
    pub travel_speed: u8,
    /// Speed while descending onto a square.
    pub approach_speed: u8,
    /// Speed while lifting away from a square.
    pub lift_speed: u8,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            travel_height: 240.0,
            contact_height: 150.0,
            travel_speed: 45,
            approach_speed: 10,
            lift_speed: 20,
        }
    }
}

/// The two fixed preset pose command lines.
///
/// These are complete firmware command strings with no computed fields; the
/// sequencer sends them verbatim (newline appended). Parking keeps the arm
/// clear of the board between the pick and the place; home is where it rests
/// between moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetPoses {
    /// Parking ("temporary") pose command.
    pub parking: String,
    /// Home pose command.
    pub home: String,
}

impl Default for PresetPoses {
    fn default() -> Self {
        Self {
            parking: "MJX286.878Y200.064Z433.700Rz0.018Ry180.000Rx0.016\
                      J70.00J80.00J90.00Sp35Ac15Dc15Rm80WFLm000000"
                .to_owned(),
            home: "MJX286.878Y0.064Z433.700Rz0.018Ry180.000Rx0.016\
                   J70.00J80.00J90.00Sp35Ac15Dc15Rm80WFLm000000"
                .to_owned(),
        }
    }
}

/// Acknowledgment-wait tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTuning {
    /// How long to wait for the arm to answer a motion line.
    pub ack_timeout_ms: u64,
    /// Poll cadence while waiting.
    pub poll_interval_ms: u64,
    /// Fixed settle delay after a gripper command; the gripper never
    /// answers, so this stands in for its acknowledgment.
    pub gripper_settle_ms: u64,
}

impl Default for ResponseTuning {
    fn default() -> Self {
        Self {
            ack_timeout_ms: 20_000,
            poll_interval_ms: 50,
            gripper_settle_ms: 300,
        }
    }
}

impl ResponseTuning {
    /// Ack window as a [`Duration`].
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }

    /// Poll cadence as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Gripper settle delay as a [`Duration`].
    pub fn gripper_settle(&self) -> Duration {
        Duration::from_millis(self.gripper_settle_ms)
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GambitConfig {
    /// Arm controller link.
    pub arm: LinkSettings,
    /// Gripper actuator link.
    pub gripper: LinkSettings,
    /// Taught board corners.
    pub board: BoardCalibration,
    /// Heights and speeds.
    pub motion: MotionProfile,
    /// Parking and home command strings.
    pub poses: PresetPoses,
    /// Ack and settle timing.
    pub response: ResponseTuning,
    /// Gripper duty pair.
    pub gripper_drive: GripperDrive,
}

impl Default for GambitConfig {
    fn default() -> Self {
        Self {
            arm: LinkSettings {
                port: "/dev/ttyUSB0".to_owned(),
                baud: 9600,
            },
            gripper: LinkSettings {
                port: "/dev/ttyUSB1".to_owned(),
                baud: 9600,
            },
            // The second deployment's corner table (a-h board).
            board: BoardCalibration {
                file_min: 'a',
                file_max: 'h',
                min_file_edge: EdgePair {
                    rank1: Point::new(500.0, -95.0),
                    rank8: Point::new(300.0, -90.0),
                },
                max_file_edge: EdgePair {
                    rank1: Point::new(500.0, 95.0),
                    rank8: Point::new(295.0, 105.0),
                },
            },
            motion: MotionProfile::default(),
            poses: PresetPoses::default(),
            response: ResponseTuning::default(),
            gripper_drive: GripperDrive {
                open_duty: 35,
                close_duty: 0,
            },
        }
    }
}

impl GambitConfig {
    /// Checks the parsed values are usable before anything touches hardware.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.arm.port.is_empty() {
            return Err(ConfigError::Invalid("arm port must not be empty".into()));
        }
        if self.gripper.port.is_empty() {
            return Err(ConfigError::Invalid(
                "gripper port must not be empty".into(),
            ));
        }
        if self.arm.port == self.gripper.port {
            return Err(ConfigError::Invalid(format!(
                "arm and gripper cannot share port {}",
                self.arm.port
            )));
        }
        self.board
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.motion.contact_height >= self.motion.travel_height {
            return Err(ConfigError::Invalid(format!(
                "contact height {} must be below travel height {}",
                self.motion.contact_height, self.motion.travel_height
            )));
        }
        for (name, speed) in [
            ("travel_speed", self.motion.travel_speed),
            ("approach_speed", self.motion.approach_speed),
            ("lift_speed", self.motion.lift_speed),
        ] {
            if speed == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }
        if self.poses.parking.is_empty() || self.poses.home.is_empty() {
            return Err(ConfigError::Invalid(
                "preset pose commands must not be empty".into(),
            ));
        }
        if self.response.ack_timeout_ms == 0 {
            return Err(ConfigError::Invalid("ack timeout must be non-zero".into()));
        }
        if self.response.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll interval must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
