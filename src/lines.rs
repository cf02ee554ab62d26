//! Straight lines in the x-y (light-key mole fraction) plane.
//!
//! Operating lines are stored as the tagged union [`Line`], so a vertical
//! feed line (q = 1) never has to be smuggled through an infinite slope.
//! The free functions work on raw `(slope, intercept)` pairs and keep the
//! sentinel convention `(f64::INFINITY, x)` for vertical lines; they are the
//! building blocks the [`Line`] methods are written on top of.
//!
//! # Example
//!
//! ```
//! use mccabe_thiele::lines::{self, Line};
//! use nalgebra::Point2;
//!
//! let (x, y) = lines::intersect(0.75, 0.2325, 1.1, -0.004)?;
//! assert!((lines::point_on_line(1.1, -0.004, x) - y).abs() < 1e-12);
//!
//! let feed = Line::vertical(0.68);
//! let stripping = Line::non_vertical(1.1, -0.004);
//! let q_point = feed.intersect(&stripping)?;
//! assert_eq!(q_point, Point2::new(0.68, stripping.y_at(0.68).unwrap()));
//! # Ok::<(), mccabe_thiele::DesignError>(())
//! ```

use nalgebra::Point2;

use crate::{DesignError, DesignResult};

/// Intersects `y = a1·x + b1` with `y = a2·x + b2`.
///
/// Both lines must be non-vertical. Parallel or coincident lines
/// (`a1 == a2`) have no unique intersection and are reported as
/// [`DesignError::DegenerateGeometry`]. The result does not depend on the
/// order of the two lines.
pub fn intersect(a1: f64, b1: f64, a2: f64, b2: f64) -> DesignResult<(f64, f64)> {
    if a1 == a2 {
        return Err(DesignError::degenerate(format!(
            "lines with equal slope {} have no unique intersection",
            a1
        )));
    }

    // Canonical order so that swapping the arguments is bit-identical
    let ((a1, b1), (a2, b2)) =
        if a1.total_cmp(&a2).is_le() { ((a1, b1), (a2, b2)) } else { ((a2, b2), (a1, b1)) };

    let x = (b2 - b1) / (a1 - a2);
    let y = a1 * x + b1;

    if !x.is_finite() || !y.is_finite() {
        return Err(DesignError::degenerate(format!(
            "intersection of slopes {} and {} is not finite",
            a1, a2
        )));
    }
    Ok((x, y))
}

/// Slope and intercept of the line through two points.
///
/// Returns the vertical sentinel `(f64::INFINITY, x1)` when both points share
/// an x-coordinate.
pub fn through_points(x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64) {
    if x1 == x2 {
        return (f64::INFINITY, x1);
    }
    let slope = (y2 - y1) / (x2 - x1);
    (slope, y1 - slope * x1)
}

/// Evaluates `a·x + b`.
#[inline]
pub fn point_on_line(a: f64, b: f64, x: f64) -> f64 {
    a * x + b
}

/// Intercept of the line with slope `a` through `(x, y)`.
#[inline]
pub fn intercept_from_slope_and_point(a: f64, x: f64, y: f64) -> f64 {
    y - a * x
}

/// Foot of the perpendicular from `(x, y)` onto `y = a·x + b`.
///
/// Accepts the vertical sentinel `(f64::INFINITY, x0)`.
pub fn closest_point_on_line(a: f64, b: f64, x: f64, y: f64) -> DesignResult<(f64, f64)> {
    if a.is_infinite() {
        return Ok((b, y));
    }
    if a == 0.0 {
        return Ok((x, b));
    }
    let normal_slope = -1.0 / a;
    let normal_intercept = intercept_from_slope_and_point(normal_slope, x, y);
    intersect(a, b, normal_slope, normal_intercept)
}

/// A straight line in the x-y plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line {
    /// `y = slope·x + intercept`
    NonVertical { slope: f64, intercept: f64 },
    /// `x = x`
    Vertical { x: f64 },
}

impl Line {
    /// The `y = x` diagonal, the total-reflux limit of both operating lines.
    pub const DIAGONAL: Line = Line::NonVertical { slope: 1.0, intercept: 0.0 };

    /// Creates `y = slope·x + intercept`.
    pub fn non_vertical(slope: f64, intercept: f64) -> Self {
        Line::NonVertical { slope, intercept }
    }

    /// Creates the vertical line at `x`.
    pub fn vertical(x: f64) -> Self {
        Line::Vertical { x }
    }

    /// Converts a raw coefficient pair, honouring the infinite-slope sentinel.
    pub fn from_coefficients(slope: f64, intercept: f64) -> Self {
        if slope.is_infinite() {
            Line::Vertical { x: intercept }
        } else {
            Line::NonVertical { slope, intercept }
        }
    }

    /// Raw `(slope, intercept)` pair; vertical lines use `(f64::INFINITY, x)`.
    pub fn coefficients(&self) -> (f64, f64) {
        match *self {
            Line::NonVertical { slope, intercept } => (slope, intercept),
            Line::Vertical { x } => (f64::INFINITY, x),
        }
    }

    /// Line through two points.
    pub fn through(p1: &Point2<f64>, p2: &Point2<f64>) -> Self {
        let (slope, intercept) = through_points(p1.x, p1.y, p2.x, p2.y);
        Line::from_coefficients(slope, intercept)
    }

    /// Line with the given slope through `point`.
    pub fn with_slope_through(slope: f64, point: &Point2<f64>) -> Self {
        if slope.is_infinite() {
            Line::Vertical { x: point.x }
        } else {
            Line::NonVertical {
                slope,
                intercept: intercept_from_slope_and_point(slope, point.x, point.y),
            }
        }
    }

    /// Slope, `f64::INFINITY` for vertical lines.
    pub fn slope(&self) -> f64 {
        self.coefficients().0
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Line::Vertical { .. })
    }

    /// `y` at `x`; `None` for a vertical line.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        match *self {
            Line::NonVertical { slope, intercept } => Some(point_on_line(slope, intercept, x)),
            Line::Vertical { .. } => None,
        }
    }

    /// `x` at `y`; `None` for a horizontal line.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        match *self {
            Line::NonVertical { slope, .. } if slope == 0.0 => None,
            Line::NonVertical { slope, intercept } => Some((y - intercept) / slope),
            Line::Vertical { x } => Some(x),
        }
    }

    /// `x` where the line crosses the `y = x` diagonal, i.e. `b / (1 - a)`.
    ///
    /// `None` when the line is parallel to the diagonal.
    pub fn diagonal_crossing(&self) -> Option<f64> {
        match *self {
            Line::NonVertical { slope, .. } if slope == 1.0 => None,
            Line::NonVertical { slope, intercept } => Some(intercept / (1.0 - slope)),
            Line::Vertical { x } => Some(x),
        }
    }

    /// Intersection point of two lines.
    ///
    /// A vertical line meets a non-vertical one at `(x, other.y_at(x))`
    /// directly; two vertical lines never intersect in a single point.
    pub fn intersect(&self, other: &Line) -> DesignResult<Point2<f64>> {
        match (*self, *other) {
            (
                Line::NonVertical { slope: a1, intercept: b1 },
                Line::NonVertical { slope: a2, intercept: b2 },
            ) => {
                let (x, y) = intersect(a1, b1, a2, b2)?;
                Ok(Point2::new(x, y))
            }
            (Line::Vertical { x }, Line::NonVertical { slope, intercept })
            | (Line::NonVertical { slope, intercept }, Line::Vertical { x }) => {
                let y = point_on_line(slope, intercept, x);
                if !y.is_finite() {
                    return Err(DesignError::degenerate(format!(
                        "vertical line at x = {} meets a line of slope {} at a non-finite point",
                        x, slope
                    )));
                }
                Ok(Point2::new(x, y))
            }
            (Line::Vertical { .. }, Line::Vertical { .. }) => {
                Err(DesignError::degenerate("two vertical lines have no unique intersection"))
            }
        }
    }
}
