//! Equilibrium-stage staircase.
//!
//! Starting at the bottoms composition `(xb, xb)` each theoretical stage is
//! one vertical step up to the VLE curve followed by one horizontal step back
//! to the active operating line:
//!
//! ```text
//! (xb, xb) → (xb, y1) → (x1, y1) → (x1, y2) → (x2, y2) → ...
//! ```
//!
//! The stripping line is active while the horizontal step lands left of the
//! q-point, the rectifying line after that. Construction stops once the
//! liquid composition reaches `xd` or the point buffer is full; the latter
//! happens whenever an operating line touches or crosses the VLE curve.

use nalgebra::Point2;

use crate::lines::Line;
use crate::thermodynamics::RelativeVolatility;
use crate::{DesignError, DesignResult};

/// Default capacity of the equilibrium-point buffer.
pub const DEFAULT_MAX_EQ_POINTS: usize = 127;

/// Smallest capacity that still fits the start point and one stage.
pub const MIN_EQ_POINTS: usize = 4;

/// Bounded buffer of staircase corner points.
///
/// Allocated once; every [`rebuild`](Staircase::rebuild) overwrites it in
/// place. The valid prefix always holds `2·n_eq_points + 1` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Staircase {
    points: Vec<Point2<f64>>,
    capacity: usize,
    n_eq_points: usize,
    feed_stage: Option<usize>,
    converged: bool,
}

impl Staircase {
    /// Creates an empty staircase holding at most `capacity` points.
    pub fn with_capacity(capacity: usize) -> DesignResult<Self> {
        if capacity < MIN_EQ_POINTS {
            return Err(DesignError::InvalidConfiguration(format!(
                "equilibrium-point capacity must be at least {}, got {}",
                MIN_EQ_POINTS, capacity
            )));
        }
        Ok(Staircase::empty(capacity))
    }

    pub(crate) fn empty(capacity: usize) -> Self {
        Staircase {
            points: Vec::with_capacity(capacity),
            capacity,
            n_eq_points: 0,
            feed_stage: None,
            converged: false,
        }
    }

    /// Steps off the stages between `xb` and `xd`.
    pub fn rebuild(
        &mut self,
        xb: f64,
        xd: f64,
        alpha: RelativeVolatility,
        stripping: &Line,
        rectifying: &Line,
        q_point: &Point2<f64>,
    ) {
        self.points.clear();
        self.n_eq_points = 0;
        self.feed_stage = None;

        let mut x = xb;
        self.points.push(Point2::new(xb, xb));

        while x < xd && self.points.len() + 2 < self.capacity {
            let y = alpha.vapor_fraction(x);

            let (next_x, on_rectifying) = match stripping.x_at(y) {
                Some(xs) if xs < q_point.x => (xs, false),
                _ => match rectifying.x_at(y) {
                    Some(xr) => (xr, true),
                    None => break,
                },
            };
            if !next_x.is_finite() {
                break;
            }

            self.points.push(Point2::new(x, y));
            self.points.push(Point2::new(next_x, y));
            self.n_eq_points += 1;
            if on_rectifying && self.feed_stage.is_none() {
                self.feed_stage = Some(self.n_eq_points);
            }
            x = next_x;
        }

        self.converged = x >= xd;
    }

    /// Valid corner points, `2·n_eq_points + 1` of them.
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Number of completed stages.
    pub fn n_eq_points(&self) -> usize {
        self.n_eq_points
    }

    /// First stage (counted from the bottom) stepped off the rectifying line.
    pub fn feed_stage(&self) -> Option<usize> {
        self.feed_stage
    }

    /// Whether the staircase reached `xd` before the buffer filled up.
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Staircase {
    fn default() -> Self {
        Staircase::empty(DEFAULT_MAX_EQ_POINTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::operating_lines::{rectifying_line, stripping_line};
    use crate::thermodynamics::vle;
    use approx::assert_relative_eq;

    fn textbook_column(capacity: usize) -> Staircase {
        // xf = 0.5, xd = 0.9, xb = 0.1, R = 2, B = 5: q-point (0.6, 0.7)
        let mut staircase = Staircase::with_capacity(capacity).unwrap();
        staircase.rebuild(
            0.1,
            0.9,
            RelativeVolatility::new(2.0).unwrap(),
            &stripping_line(5.0, 0.1),
            &rectifying_line(2.0, 0.9),
            &Point2::new(0.6, 0.7),
        );
        staircase
    }

    #[test]
    fn test_capacity_validation() {
        assert!(Staircase::with_capacity(MIN_EQ_POINTS - 1).is_err());
        assert!(Staircase::with_capacity(MIN_EQ_POINTS).is_ok());
    }

    #[test]
    fn test_textbook_staircase() {
        let staircase = textbook_column(DEFAULT_MAX_EQ_POINTS);

        assert!(staircase.converged());
        assert_eq!(staircase.n_eq_points(), 10);
        assert_eq!(staircase.feed_stage(), Some(7));
        assert_eq!(staircase.points().len(), 2 * staircase.n_eq_points() + 1);
        assert_eq!(staircase.points()[0], Point2::new(0.1, 0.1));
        assert!(staircase.points().last().unwrap().x >= 0.9);
    }

    #[test]
    fn test_corner_layout() {
        let staircase = textbook_column(DEFAULT_MAX_EQ_POINTS);
        let points = staircase.points();

        for stage in 0..staircase.n_eq_points() {
            let start = points[2 * stage];
            let top = points[2 * stage + 1];
            let end = points[2 * stage + 2];

            // Vertical step onto the VLE curve
            assert_eq!(top.x, start.x);
            assert_relative_eq!(top.y, vle(start.x, 2.0), epsilon = 1e-12);
            // Horizontal step to the right
            assert_eq!(end.y, top.y);
            assert!(end.x > start.x);
        }
    }

    #[test]
    fn test_capacity_guard() {
        // Operating lines above the VLE curve: the staircase never reaches xd
        let mut staircase = Staircase::with_capacity(DEFAULT_MAX_EQ_POINTS).unwrap();
        staircase.rebuild(
            0.04,
            0.93,
            RelativeVolatility::new(1.01).unwrap(),
            &stripping_line(10.0, 0.04),
            &rectifying_line(3.0, 0.93),
            &Point2::new(0.6757, 0.7393),
        );

        assert!(!staircase.converged());
        assert_eq!(staircase.n_eq_points(), 62);
        assert_eq!(staircase.points().len(), 125);
        assert!(staircase.points().len() <= staircase.capacity());
    }

    #[test]
    fn test_rebuild_is_deterministic_and_in_place() {
        let mut staircase = textbook_column(DEFAULT_MAX_EQ_POINTS);
        let first = staircase.clone();

        staircase.rebuild(
            0.1,
            0.9,
            RelativeVolatility::new(2.0).unwrap(),
            &stripping_line(5.0, 0.1),
            &rectifying_line(2.0, 0.9),
            &Point2::new(0.6, 0.7),
        );
        assert_eq!(staircase, first);
    }

    #[test]
    fn test_horizontal_rectifying_line_stops() {
        // Zero reflux: rectifying line y = xd never gives an x
        let mut staircase = Staircase::with_capacity(DEFAULT_MAX_EQ_POINTS).unwrap();
        staircase.rebuild(
            0.5,
            0.9,
            RelativeVolatility::new(2.0).unwrap(),
            &stripping_line(5.0, 0.1),
            &rectifying_line(0.0, 0.9),
            &Point2::new(0.2, 0.9),
        );
        assert_eq!(staircase.n_eq_points(), 0);
        assert!(!staircase.converged());
        assert_eq!(staircase.points(), &[Point2::new(0.5, 0.5)]);
    }
}
