//! Square-to-coordinate interpolation.

use crate::{BoardCalibration, BoardError, BoardResult, Point, Square};

/// Maps squares to board-plane coordinates over the calibrated corner
/// quadrilateral.
///
/// The interpolation runs rank-first: each file edge is interpolated at the
/// rank fraction, then the result is interpolated between the two edges at
/// the file fraction. Endpoint weights are exact, so a corner square maps to
/// its taught corner point bit-for-bit.
#[derive(Debug, Clone)]
pub struct BoardMapper {
    cal: BoardCalibration,
}

impl BoardMapper {
    /// Builds a mapper over a validated corner table.
    pub fn new(cal: BoardCalibration) -> BoardResult<Self> {
        cal.validate()?;
        Ok(Self { cal })
    }

    /// The calibration this mapper interpolates over.
    pub fn calibration(&self) -> &BoardCalibration {
        &self.cal
    }

    /// Physical coordinate of a square's centre.
    ///
    /// # Errors
    ///
    /// `OutOfRangeSquare` when the file lies outside the calibrated range;
    /// the mapper never clamps or extrapolates past the corners.
    pub fn coordinate_for(&self, square: Square) -> BoardResult<Point> {
        if square.file() < self.cal.file_min || square.file() > self.cal.file_max {
            return Err(BoardError::OutOfRangeSquare {
                square,
                file_min: self.cal.file_min,
                file_max: self.cal.file_max,
            });
        }

        let fx = f64::from(square.file() as u8 - self.cal.file_min as u8)
            / f64::from(self.cal.file_span());
        let fy = f64::from(square.rank() - 1) / 7.0;

        let min_edge = lerp(self.cal.min_file_edge.rank1, self.cal.min_file_edge.rank8, fy);
        let max_edge = lerp(self.cal.max_file_edge.rank1, self.cal.max_file_edge.rank8, fy);
        Ok(lerp(min_edge, max_edge, fx))
    }
}

// Weighted form rather than a + (b - a) * t so t = 1.0 lands on b exactly.
fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point {
        x: (1.0 - t) * a.x + t * b.x,
        y: (1.0 - t) * a.y + t * b.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgePair;

    // The second deployment's corner table: a skewed trapezoid, not a
    // rectangle.
    fn deployed() -> BoardMapper {
        BoardMapper::new(BoardCalibration {
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
        })
        .expect("valid calibration")
    }

    fn square(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn corner_squares_map_to_taught_corners_exactly() {
        let mapper = deployed();
        let cal = mapper.calibration().clone();
        let cases = [
            ("a1", cal.min_file_edge.rank1),
            ("a8", cal.min_file_edge.rank8),
            ("h1", cal.max_file_edge.rank1),
            ("h8", cal.max_file_edge.rank8),
        ];
        for (sq, want) in cases {
            let got = mapper.coordinate_for(square(sq)).expect("in range");
            assert_eq!(got, want, "corner {sq}");
        }
    }

    #[test]
    fn mapping_is_deterministic() {
        let mapper = deployed();
        let first = mapper.coordinate_for(square("e2")).expect("in range");
        let second = mapper.coordinate_for(square("e2")).expect("in range");
        assert_eq!(first, second);
    }

    #[test]
    fn midboard_square_lies_between_the_edges() {
        let mapper = deployed();
        let p = mapper.coordinate_for(square("d4")).expect("in range");
        assert!(p.x > 295.0 && p.x < 500.0, "x = {}", p.x);
        assert!(p.y > -95.0 && p.y < 105.0, "y = {}", p.y);
    }

    #[test]
    fn out_of_range_file_fails_instead_of_extrapolating() {
        let narrow = BoardMapper::new(BoardCalibration {
            file_min: 'a',
            file_max: 'g',
            min_file_edge: EdgePair {
                rank1: Point::new(500.0, -100.0),
                rank8: Point::new(300.0, -90.0),
            },
            max_file_edge: EdgePair {
                rank1: Point::new(500.0, 100.0),
                rank8: Point::new(290.0, 105.0),
            },
        })
        .expect("valid calibration");
        let err = narrow
            .coordinate_for(square("h4"))
            .expect_err("h is uncalibrated");
        assert!(matches!(err, BoardError::OutOfRangeSquare { .. }));
    }

    #[test]
    fn rank_interpolation_runs_along_each_file_edge() {
        let mapper = deployed();
        // Halfway up the a-file edge: rank has no exact midpoint, but rank 4
        // and 5 must straddle the edge midpoint at x = 400.
        let r4 = mapper.coordinate_for(square("a4")).expect("in range");
        let r5 = mapper.coordinate_for(square("a5")).expect("in range");
        assert!(r4.x > 400.0 && r5.x < 400.0, "r4 = {}, r5 = {}", r4.x, r5.x);
    }
}
