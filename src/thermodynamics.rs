//! Vapor-liquid equilibrium for a binary mixture at constant relative volatility.
//!
//! The equilibrium vapor mole fraction of the light component is
//!
//! ```text
//! y = α·x / ((α - 1)·x + 1)
//! ```
//!
//! with the inverse `x = y / (α - y·(α - 1))`. For `α > 1` the curve is
//! monotonically increasing and concave on `[0, 1]`; `α = 1` means both
//! components have the same volatility and no separation is possible.
//!
//! # Example
//!
//! ```
//! use mccabe_thiele::thermodynamics::{vle, vle_inverse, RelativeVolatility};
//!
//! let alpha = RelativeVolatility::new(2.0)?;
//! let y = alpha.vapor_fraction(0.5);
//! assert!((y - 2.0 / 3.0).abs() < 1e-12);
//! assert!((vle_inverse(vle(0.3, 2.0), 2.0) - 0.3).abs() < 1e-12);
//!
//! // No separation at all
//! assert!(RelativeVolatility::new(1.0).is_err());
//! # Ok::<(), mccabe_thiele::DesignError>(())
//! ```

use nalgebra::Point2;

use crate::{DesignError, DesignResult};

/// Number of points in the sampled VLE curve.
pub const VLE_SAMPLE_POINTS: usize = 100;

/// Spacing of the sampled VLE curve in x.
pub const VLE_SAMPLE_STEP: f64 = 0.01;

/// Equilibrium vapor fraction `y(x)` for relative volatility `alpha`.
#[inline]
pub fn vle(x: f64, alpha: f64) -> f64 {
    alpha * x / ((alpha - 1.0) * x + 1.0)
}

/// Liquid fraction in equilibrium with vapor fraction `y`.
#[inline]
pub fn vle_inverse(y: f64, alpha: f64) -> f64 {
    y / (alpha - y * (alpha - 1.0))
}

/// Validated relative volatility of the binary system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeVolatility(f64);

impl RelativeVolatility {
    /// Creates a relative volatility, rejecting `α = 1`, `α <= 0` and
    /// non-finite values.
    pub fn new(alpha: f64) -> DesignResult<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(DesignError::InvalidConfiguration(format!(
                "relative volatility must be positive and finite, got {}",
                alpha
            )));
        }
        if alpha == 1.0 {
            return Err(DesignError::InvalidConfiguration(
                "relative volatility of 1 gives no separation".to_string(),
            ));
        }
        Ok(RelativeVolatility(alpha))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Equilibrium vapor fraction at liquid fraction `x`.
    pub fn vapor_fraction(&self, x: f64) -> f64 {
        vle(x, self.0)
    }

    /// Equilibrium liquid fraction at vapor fraction `y`.
    pub fn liquid_fraction(&self, y: f64) -> f64 {
        vle_inverse(y, self.0)
    }
}

/// The VLE curve sampled at `x = 0.00, 0.01, ..., 0.99`.
#[derive(Debug, Clone, PartialEq)]
pub struct VleCurve {
    points: Vec<Point2<f64>>,
}

impl VleCurve {
    /// Samples the curve for `alpha`.
    pub fn new(alpha: RelativeVolatility) -> Self {
        let mut curve = VleCurve::default();
        curve.resample(alpha);
        curve
    }

    /// Refills the sample in place for a new `alpha`.
    pub fn resample(&mut self, alpha: RelativeVolatility) {
        self.points.clear();
        self.points.extend((0..VLE_SAMPLE_POINTS).map(|i| {
            let x = i as f64 * VLE_SAMPLE_STEP;
            Point2::new(x, alpha.vapor_fraction(x))
        }));
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Sampled liquid fractions.
    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    /// Sampled vapor fractions.
    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for VleCurve {
    /// An empty sample with room for [`VLE_SAMPLE_POINTS`] points.
    fn default() -> Self {
        VleCurve { points: Vec::with_capacity(VLE_SAMPLE_POINTS) }
    }
}
