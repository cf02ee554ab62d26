//! Shortcut design limits read off the same diagram.
//!
//! - **Fenske**: minimum number of stages at total reflux,
//!   `N_min = ln[(xd/(1-xd))·((1-xb)/xb)] / ln α`
//! - **Pinch point**: where the feed line meets the VLE curve
//! - **Minimum reflux / reboil**: operating lines through the pinch point
//!
//! These assume a constant relative volatility, for which the VLE curve is
//! concave and the pinch is always on the feed line.

use nalgebra::Point2;

use crate::lines::Line;
use crate::models::Variables;
use crate::solvers::{solve_reboil, solve_reflux};
use crate::thermodynamics::RelativeVolatility;
use crate::{DesignError, DesignResult};

/// Tolerance for accepting a pinch root at the edge of `[0, 1]`.
const PINCH_ROOT_TOLERANCE: f64 = 1e-12;

/// Limiting design values for the current specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortcutEstimates {
    /// Minimum number of theoretical stages (total reflux)
    pub minimum_stages: f64,
    /// Intersection of the feed line and the VLE curve
    pub pinch_point: Point2<f64>,
    /// Minimum reflux ratio
    pub minimum_reflux: f64,
    /// Minimum reboil ratio
    pub minimum_reboil: f64,
}

impl ShortcutEstimates {
    /// Computes all estimates for `vars` with the given feed line.
    pub fn compute(vars: &Variables, q_line: &Line, alpha: RelativeVolatility) -> DesignResult<Self> {
        let pinch_point = pinch_point(q_line, alpha)?;
        Ok(ShortcutEstimates {
            minimum_stages: fenske_minimum_stages(vars.xd, vars.xb, alpha)?,
            pinch_point,
            minimum_reflux: minimum_reflux(vars.xd, &pinch_point)?,
            minimum_reboil: minimum_reboil(vars.xb, &pinch_point),
        })
    }
}

/// Fenske equation for the minimum number of stages.
pub fn fenske_minimum_stages(xd: f64, xb: f64, alpha: RelativeVolatility) -> DesignResult<f64> {
    if !(0.0 < xb && xb < xd && xd < 1.0) {
        return Err(DesignError::InvalidConfiguration(format!(
            "Fenske equation needs 0 < xb < xd < 1, got xb = {}, xd = {}",
            xb, xd
        )));
    }
    let separation = (xd / (1.0 - xd)) * ((1.0 - xb) / xb);
    let stages = separation.ln() / alpha.value().ln();
    if stages <= 0.0 {
        return Err(DesignError::InvalidConfiguration(format!(
            "relative volatility {} cannot enrich the distillate",
            alpha.value()
        )));
    }
    Ok(stages)
}

/// Intersection of the feed line with the VLE curve `y = αx/((α-1)x+1)`.
///
/// For a non-vertical feed line `y = a·x + b` this is the root in `[0, 1]` of
///
/// ```text
/// a(α-1)·x² + (a + b(α-1) - α)·x + b = 0
/// ```
pub fn pinch_point(q_line: &Line, alpha: RelativeVolatility) -> DesignResult<Point2<f64>> {
    let (slope, intercept) = match *q_line {
        Line::Vertical { x } => return Ok(Point2::new(x, alpha.vapor_fraction(x))),
        Line::NonVertical { slope, intercept } => (slope, intercept),
    };

    if slope == 0.0 {
        let x = alpha.liquid_fraction(intercept);
        return Ok(Point2::new(x, intercept));
    }

    let am1 = alpha.value() - 1.0;
    let qa = slope * am1;
    let qb = slope + intercept * am1 - alpha.value();
    let qc = intercept;

    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        return Err(DesignError::degenerate("feed line does not cross the VLE curve"));
    }

    // Numerically stable quadratic roots
    let half = -0.5 * (qb + qb.signum() * discriminant.sqrt());
    let mut roots = [half / qa, if half != 0.0 { qc / half } else { f64::NAN }];
    roots.sort_by(|a, b| a.total_cmp(b));

    roots
        .into_iter()
        .find(|x| (-PINCH_ROOT_TOLERANCE..=1.0 + PINCH_ROOT_TOLERANCE).contains(x))
        .map(|x| Point2::new(x, slope * x + intercept))
        .ok_or_else(|| DesignError::degenerate("feed line meets the VLE curve outside [0, 1]"))
}

/// Minimum reflux ratio: rectifying line from `(xd, xd)` through the pinch.
pub fn minimum_reflux(xd: f64, pinch: &Point2<f64>) -> DesignResult<f64> {
    solve_reflux(xd, pinch)
}

/// Minimum reboil ratio: stripping line from `(xb, xb)` through the pinch.
pub fn minimum_reboil(xb: f64, pinch: &Point2<f64>) -> f64 {
    solve_reboil(xb, pinch)
}
