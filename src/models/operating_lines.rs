//! Operating lines of the McCabe-Thiele diagram.
//!
//! - **Rectifying line**: through `(xd, xd)` with slope `R/(R+1)`
//! - **Stripping line**: through `(xb, xb)` with slope `(B+1)/B`
//! - **Feed (q) line**: through `(xf, xf)` with slope `q/(q-1)`
//!
//! Which two of them can be built before the q-point is known depends on the
//! dependent variable: the third one is the one that needs it.

use crate::lines::Line;
use crate::models::{DependentVariable, Variables};

/// One of the three operating lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Rectifying,
    Stripping,
    Feed,
}

impl Section {
    /// Builds this section's line from the current variable values.
    pub fn line(&self, vars: &Variables) -> Line {
        match self {
            Section::Rectifying => rectifying_line(vars.reflux, vars.xd),
            Section::Stripping => stripping_line(vars.reboil, vars.xb),
            Section::Feed => q_line(vars.q, vars.xf),
        }
    }

    /// The two sections that do not depend on `dependent`.
    pub fn known(dependent: DependentVariable) -> [Section; 2] {
        match dependent {
            DependentVariable::Q | DependentVariable::Xf => [Section::Rectifying, Section::Stripping],
            DependentVariable::Reflux | DependentVariable::Xd => [Section::Stripping, Section::Feed],
            DependentVariable::Reboil | DependentVariable::Xb => [Section::Rectifying, Section::Feed],
        }
    }

    /// The section that can only be built once `dependent` is solved.
    pub fn found(dependent: DependentVariable) -> Section {
        match dependent {
            DependentVariable::Q | DependentVariable::Xf => Section::Feed,
            DependentVariable::Reflux | DependentVariable::Xd => Section::Rectifying,
            DependentVariable::Reboil | DependentVariable::Xb => Section::Stripping,
        }
    }
}

/// Rectifying line `y = R/(R+1)·x + xd/(R+1)`.
///
/// Infinite reflux gives the diagonal.
pub fn rectifying_line(reflux: f64, xd: f64) -> Line {
    if reflux.is_infinite() {
        Line::DIAGONAL
    } else if reflux == -1.0 {
        Line::vertical(xd)
    } else {
        Line::non_vertical(reflux / (reflux + 1.0), xd / (reflux + 1.0))
    }
}

/// Stripping line `y = (B+1)/B·x - xb/B`.
///
/// Zero reboil gives the vertical line at `xb`, infinite reboil the diagonal.
pub fn stripping_line(reboil: f64, xb: f64) -> Line {
    if reboil == 0.0 {
        Line::vertical(xb)
    } else if reboil.is_infinite() {
        Line::DIAGONAL
    } else {
        Line::non_vertical((reboil + 1.0) / reboil, -xb / reboil)
    }
}

/// Feed line `y = q/(q-1)·x - xf/(q-1)`.
///
/// A saturated-liquid feed (`q = 1`) gives the vertical line at `xf`.
pub fn q_line(q: f64, xf: f64) -> Line {
    if q == 1.0 {
        Line::vertical(xf)
    } else if q.is_infinite() {
        Line::DIAGONAL
    } else {
        Line::non_vertical(q / (q - 1.0), -xf / (q - 1.0))
    }
}

/// Slope of the rectifying line for reflux ratio `R`.
pub fn rectifying_slope(reflux: f64) -> f64 {
    rectifying_line(reflux, 0.0).slope()
}

/// Slope of the stripping line for reboil ratio `B`.
pub fn stripping_slope(reboil: f64) -> f64 {
    stripping_line(reboil, 0.0).slope()
}

/// Slope of the feed line for thermal condition `q`.
pub fn q_line_slope(q: f64) -> f64 {
    q_line(q, 0.0).slope()
}
