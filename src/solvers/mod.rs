//! Back-solving the dependent design variable from the q-point.
//!
//! Once two operating lines are known their intersection (the q-point)
//! fixes the third line: it has to pass through the q-point and through its
//! own anchor on the diagonal. Each dependent variable is recovered from that
//! constraint by a small closed-form solve:
//!
//! | Dependent | Line used | Result |
//! |---|---|---|
//! | `q`  | q-point → `(xf, xf)` | `q = a/(a-1)` |
//! | `R`  | q-point → `(xd, xd)` | `R = a/(1-a)` |
//! | `B`  | q-point → `(xb, xb)` | `B = 1/(a-1)` |
//! | `xf` | slope of q-line through q-point | `xf = b/(1-a)` |
//! | `xd` | slope of rectifying line through q-point | `xd = b/(1-a)` |
//! | `xb` | slope of stripping line through q-point | `xb = b/(1-a)` |
//!
//! # Submodules
//!
//! - [`shortcut`]: minimum-stage and minimum-reflux estimates

pub mod shortcut;

use nalgebra::Point2;

use crate::lines::Line;
use crate::models::operating_lines::{q_line_slope, rectifying_slope, stripping_slope};
use crate::models::{DependentVariable, Variables};
use crate::{DesignError, DesignResult};

/// Solves `dependent` from the independent variables and the q-point.
pub fn solve_dependent(
    dependent: DependentVariable,
    vars: &Variables,
    q_point: &Point2<f64>,
) -> DesignResult<f64> {
    match dependent {
        DependentVariable::Q => Ok(solve_q(vars.xf, q_point)),
        DependentVariable::Reflux => solve_reflux(vars.xd, q_point),
        DependentVariable::Reboil => Ok(solve_reboil(vars.xb, q_point)),
        DependentVariable::Xf => {
            solve_composition(DependentVariable::Xf, q_line_slope(vars.q), q_point)
        }
        DependentVariable::Xd => {
            solve_composition(DependentVariable::Xd, rectifying_slope(vars.reflux), q_point)
        }
        DependentVariable::Xb => {
            solve_composition(DependentVariable::Xb, stripping_slope(vars.reboil), q_point)
        }
    }
}

/// Feed condition `q` of the feed line through the q-point and `(xf, xf)`.
///
/// A vertical feed line (q-point straight above the feed) is a saturated
/// liquid, `q = 1`. A feed line parallel to the diagonal maps to `q = inf`
/// and a horizontal one to `q = 0`.
pub fn solve_q(xf: f64, q_point: &Point2<f64>) -> f64 {
    let a = Line::through(q_point, &Point2::new(xf, xf)).slope();
    if a.is_infinite() {
        1.0
    } else if a == 1.0 {
        f64::INFINITY
    } else if a == 0.0 {
        0.0
    } else {
        a / (a - 1.0)
    }
}

/// Reflux ratio of the rectifying line through the q-point and `(xd, xd)`.
pub fn solve_reflux(xd: f64, q_point: &Point2<f64>) -> DesignResult<f64> {
    let a = Line::through(q_point, &Point2::new(xd, xd)).slope();
    if a.is_infinite() {
        return Err(DesignError::degenerate(format!(
            "q-point lies on the vertical through xd = {}, no finite reflux ratio",
            xd
        )));
    }
    if a == 1.0 {
        return Ok(f64::INFINITY);
    }
    Ok(a / (1.0 - a))
}

/// Reboil ratio of the stripping line through the q-point and `(xb, xb)`.
///
/// A vertical stripping line corresponds to `B = 0`.
pub fn solve_reboil(xb: f64, q_point: &Point2<f64>) -> f64 {
    let a = Line::through(q_point, &Point2::new(xb, xb)).slope();
    if a.is_infinite() {
        0.0
    } else if a == 1.0 {
        f64::INFINITY
    } else {
        1.0 / (a - 1.0)
    }
}

/// Composition where the line with `slope` through the q-point crosses the
/// diagonal.
///
/// A line parallel to the diagonal never reaches it, which means the
/// independent inputs contradict each other.
pub fn solve_composition(
    dependent: DependentVariable,
    slope: f64,
    q_point: &Point2<f64>,
) -> DesignResult<f64> {
    Line::with_slope_through(slope, q_point)
        .diagonal_crossing()
        .ok_or(DesignError::PhysicallyImpossible(dependent))
}
