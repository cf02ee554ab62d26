//! # McCabe-Thiele: Typed Binary Distillation Design
//!
//! A small, rendering-free engine for the McCabe-Thiele construction of a
//! binary distillation column. Given feed, distillate and bottoms
//! compositions, the relative volatility and a reflux/reboil/feed-condition
//! specification, it derives:
//!
//! - the rectifying, stripping and feed (q) operating lines
//! - the q-point where they meet
//! - the one **dependent** design variable, back-solved from the geometry
//! - a sampled vapor-liquid equilibrium (VLE) curve
//! - the equilibrium-stage staircase and its stage count
//!
//! ## Example
//!
//! ```
//! use mccabe_thiele::{DistillationModel, DependentVariable, Variables};
//!
//! let mut model = DistillationModel::new()
//!     .with_variables(Variables {
//!         xf: 0.5,
//!         xd: 0.9,
//!         xb: 0.1,
//!         alpha: 2.0,
//!         reflux: 2.0,
//!         reboil: 5.0,
//!         q: 1.0,
//!     })
//!     .with_dependent_variable(DependentVariable::Q);
//!
//! model.recompute()?;
//!
//! println!("q = {:.3}", model.variables().q);
//! println!("theoretical stages: {}", model.n_eq_points());
//! # Ok::<(), mccabe_thiele::DesignError>(())
//! ```
//!
//! A View (plot, slider panel, ...) only ever writes inputs, picks the
//! dependent variable, calls [`DistillationModel::recompute`] and reads the
//! derived geometry back.
//!
//! ## Optional Features
//!
//! - **`serde`**: `Serialize`/`Deserialize` for [`Variables`],
//!   [`DependentVariable`] and [`ModelConfig`]

pub mod lines;
pub mod models;
pub mod solvers;
pub mod thermodynamics;

pub use lines::Line;
pub use models::distillation::{DistillationModel, ModelConfig};
pub use models::staircase::Staircase;
pub use models::{DependentVariable, Variable, Variables};
pub use solvers::shortcut::ShortcutEstimates;
pub use thermodynamics::{vle, vle_inverse, RelativeVolatility, VleCurve};

/// Result type for design calculations.
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors that can occur while building a McCabe-Thiele diagram.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesignError {
    /// Dependent-variable name outside `{xf, xd, xb, R, B, q}`
    #[error("Invalid dependent variable '{0}', expected one of xf, xd, xb, R, B, q")]
    InvalidSelector(String),
    /// Two lines that must intersect are parallel or coincident
    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },
    /// The dependent variable has no physical solution for the given inputs
    #[error("No physical solution for {0}: operating line is parallel to the diagonal")]
    PhysicallyImpossible(DependentVariable),
    /// Invalid input value (relative volatility, composition, capacity)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DesignError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        DesignError::DegenerateGeometry { reason: reason.into() }
    }
}
