//! Arm controller command grammar.
//!
//! One motion segment is one ASCII line:
//!
//! ```text
//! MJ X%.3f Y%.3f Z%.3f Rz%.3f Ry%.3f Rx%.3f J7%.2f J8%.2f J9%.2f Sp%d Ac15Dc15 Rm80 WFLm000000
//! ```
//!
//! (shown spaced for readability; the wire form has no separators). Field
//! order and the literal constants are firmware grammar, learned from the
//! target device: any deviation is a protocol violation the controller may
//! reject or misinterpret.

use std::fmt::Write as _;

use crate::types::Pose;
use crate::{ProtocolError, ProtocolResult};

/// Move-joint command code, first on the line.
pub const MOVE_JOINT: &str = "MJ";

/// Tool orientation, fixed per deployment. Three decimals on the wire.
pub const ROTATION_FIELDS: [(&str, f64); 3] = [("Rz", 0.024), ("Ry", 174.670), ("Rx", 0.016)];

/// Auxiliary joint targets, fixed. Two decimals on the wire.
pub const JOINT_FIELDS: [(&str, f64); 3] = [("J7", 0.0), ("J8", 0.0), ("J9", 0.0)];

/// Acceleration/deceleration block, fixed.
pub const ACCEL_FIELD: &str = "Ac15Dc15";

/// Report-mode field; makes the controller answer when the segment lands.
pub const REPORT_MODE_FIELD: &str = "Rm80";

/// Fixed trailer the firmware requires on every motion line.
pub const TRAILER: &str = "WFLm000000";

/// Renders one pose as the exact command line, newline-terminated.
pub fn encode_pose(pose: &Pose) -> String {
    let mut line = String::with_capacity(96);
    line.push_str(MOVE_JOINT);
    push_coord(&mut line, "X", pose.x);
    push_coord(&mut line, "Y", pose.y);
    push_coord(&mut line, "Z", pose.z);
    for (marker, value) in ROTATION_FIELDS {
        push_coord(&mut line, marker, value);
    }
    for (marker, value) in JOINT_FIELDS {
        let _ = write!(line, "{marker}{value:.2}");
    }
    let _ = write!(line, "Sp{}", pose.speed);
    line.push_str(ACCEL_FIELD);
    line.push_str(REPORT_MODE_FIELD);
    line.push_str(TRAILER);
    line.push('\n');
    line
}

fn push_coord(line: &mut String, marker: &str, value: f64) {
    // write! to a String cannot fail.
    let _ = write!(line, "{marker}{value:.3}");
}

/// The numeric fields recovered from an encoded command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseFields {
    /// X field value.
    pub x: f64,
    /// Y field value.
    pub y: f64,
    /// Z field value.
    pub z: f64,
    /// Sp field value.
    pub speed: u8,
}

/// Extracts X/Y/Z/Sp back out of a command line.
///
/// Exists for round-trip tests and diagnostics; the devices only ever see
/// the encoded form.
pub fn decode_pose_fields(line: &str) -> ProtocolResult<PoseFields> {
    let body = line
        .trim_end_matches('\n')
        .strip_prefix(MOVE_JOINT)
        .ok_or_else(|| ProtocolError::BadPrefix(line.trim_end().to_owned()))?;
    Ok(PoseFields {
        x: scalar_between(body, "X", "Y")?,
        y: scalar_between(body, "Y", "Z")?,
        z: scalar_between(body, "Z", "Rz")?,
        speed: speed_field(body)?,
    })
}

fn scalar_between(body: &str, field: &'static str, next: &str) -> ProtocolResult<f64> {
    let start = body
        .find(field)
        .ok_or(ProtocolError::MissingField(field))?
        + field.len();
    let rest = &body[start..];
    let end = rest
        .find(next)
        .ok_or(ProtocolError::MissingField(field))?;
    let raw = &rest[..end];
    raw.parse().map_err(|_| ProtocolError::BadValue {
        field,
        value: raw.to_owned(),
    })
}

fn speed_field(body: &str) -> ProtocolResult<u8> {
    let start = body.find("Sp").ok_or(ProtocolError::MissingField("Sp"))? + 2;
    let rest = &body[start..];
    let end = rest.find("Ac").ok_or(ProtocolError::MissingField("Sp"))?;
    let raw = &rest[..end];
    raw.parse().map_err(|_| ProtocolError::BadValue {
        field: "Sp",
        value: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn encodes_the_documented_field_order() {
        let line = encode_pose(&Pose {
            x: 470.0,
            y: 10.0,
            z: 240.0,
            speed: 45,
        });
        assert_eq!(
            line,
            "MJX470.000Y10.000Z240.000Rz0.024Ry174.670Rx0.016\
             J70.00J80.00J90.00Sp45Ac15Dc15Rm80WFLm000000\n"
        );
    }

    #[test]
    fn encodes_negative_y_and_low_speed() {
        let line = encode_pose(&Pose {
            x: 500.0,
            y: -95.0,
            z: 150.0,
            speed: 5,
        });
        assert_snapshot!(
            line.trim_end(),
            @"MJX500.000Y-95.000Z150.000Rz0.024Ry174.670Rx0.016J70.00J80.00J90.00Sp5Ac15Dc15Rm80WFLm000000"
        );
    }

    #[test]
    fn encodes_three_decimals_even_for_round_values() {
        let line = encode_pose(&Pose {
            x: 300.0,
            y: 0.0,
            z: 240.0,
            speed: 30,
        });
        assert_snapshot!(
            line.trim_end(),
            @"MJX300.000Y0.000Z240.000Rz0.024Ry174.670Rx0.016J70.00J80.00J90.00Sp30Ac15Dc15Rm80WFLm000000"
        );
    }

    #[test]
    fn every_line_is_newline_terminated() {
        let line = encode_pose(&Pose {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            speed: 1,
        });
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn decode_recovers_the_encoded_fields() {
        let pose = Pose {
            x: 412.345,
            y: -61.5,
            z: 150.0,
            speed: 10,
        };
        let fields = decode_pose_fields(&encode_pose(&pose)).expect("well-formed line");
        assert!((fields.x - pose.x).abs() < 5e-4);
        assert!((fields.y - pose.y).abs() < 5e-4);
        assert!((fields.z - pose.z).abs() < 5e-4);
        assert_eq!(fields.speed, pose.speed);
    }

    #[test]
    fn decode_rejects_foreign_lines() {
        assert!(matches!(
            decode_pose_fields("SV0P35\n"),
            Err(ProtocolError::BadPrefix(_))
        ));
        assert!(matches!(
            decode_pose_fields("MJX1.000Z2.000\n"),
            Err(ProtocolError::MissingField(_))
        ));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Coordinates stay within the arm's reach envelope in practice, but
        // the codec itself must round-trip anything representable.
        #[test]
        fn prop_pose_round_trips_within_format_precision(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            z in 0.0f64..600.0,
            speed in 1u8..=100,
        ) {
            let pose = Pose { x, y, z, speed };
            let fields = decode_pose_fields(&encode_pose(&pose)).expect("well-formed line");
            prop_assert!((fields.x - x).abs() <= 5e-4 + 1e-9);
            prop_assert!((fields.y - y).abs() <= 5e-4 + 1e-9);
            prop_assert!((fields.z - z).abs() <= 5e-4 + 1e-9);
            prop_assert_eq!(fields.speed, speed);
        }

        #[test]
        fn prop_encoded_line_is_single_line_ascii(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            z in 0.0f64..600.0,
            speed in 1u8..=100,
        ) {
            let line = encode_pose(&Pose { x, y, z, speed });
            prop_assert!(line.is_ascii());
            prop_assert!(line.ends_with('\n'));
            prop_assert_eq!(line.matches('\n').count(), 1);
        }
    }
}
