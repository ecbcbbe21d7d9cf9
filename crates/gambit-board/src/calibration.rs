//! Four-corner board calibration.

use serde::{Deserialize, Serialize};

use crate::{BoardError, BoardResult};

/// A point on the board plane, in device millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X in device millimetres.
    pub x: f64,
    /// Y in device millimetres.
    pub y: f64,
}

impl Point {
    /// Convenience constructor.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The two calibrated reference points along one file edge of the board:
/// the corner on rank 1 and the corner on rank 8.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgePair {
    /// Corner at rank 1 on this file.
    pub rank1: Point,
    /// Corner at rank 8 on this file.
    pub rank8: Point,
}

/// The four taught corner points plus the file range they span.
///
/// The board is rarely mounted perfectly square to the arm, so the corners
/// describe an arbitrary quadrilateral, not an axis-aligned rectangle.
/// Corners are taught once at installation and are immutable for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardCalibration {
    /// First calibrated file (the file of the `min_file_edge` corners).
    pub file_min: char,
    /// Last calibrated file (the file of the `max_file_edge` corners).
    pub file_max: char,
    /// Corners along the `file_min` edge.
    pub min_file_edge: EdgePair,
    /// Corners along the `file_max` edge.
    pub max_file_edge: EdgePair,
}

impl BoardCalibration {
    /// Checks the corner table is usable for interpolation.
    pub fn validate(&self) -> BoardResult<()> {
        if !self.file_min.is_ascii_lowercase() || !self.file_max.is_ascii_lowercase() {
            return Err(BoardError::InvalidCalibration(
                "file range must be lowercase letters",
            ));
        }
        if self.file_min >= self.file_max {
            return Err(BoardError::InvalidCalibration(
                "file_min must precede file_max",
            ));
        }
        Ok(())
    }

    /// Number of file steps between the calibrated edges.
    pub fn file_span(&self) -> u8 {
        self.file_max as u8 - self.file_min as u8
    }
}
