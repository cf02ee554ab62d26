//! McCabe-Thiele design model and its building blocks.
//!
//! - **Variables**: the seven design quantities (`xf`, `xd`, `xb`, `alpha`,
//!   `R`, `B`, `q`) with the defaults of a typical benzene-toluene-like column
//! - **DependentVariable**: which of the six solvable quantities is
//!   back-solved from the geometry instead of being taken as input
//! - **Operating lines**: rectifying, stripping and q-line construction
//! - **Staircase**: the stepped equilibrium-stage construction
//! - **DistillationModel**: owns all of the above and recomputes it as a unit
//!
//! ## Example
//!
//! ```
//! use mccabe_thiele::{DistillationModel, Variable};
//!
//! let mut model = DistillationModel::new();
//! model.set_dependent_variable("R")?;
//! model.set(Variable::Q, 1.0);
//! model.recompute()?;
//!
//! // Reflux ratio that makes the rectifying line pass through the q-point
//! let reflux = model.get(Variable::Reflux);
//! assert!(reflux > 0.0);
//! # Ok::<(), mccabe_thiele::DesignError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::{event, Level};

use crate::thermodynamics::RelativeVolatility;
use crate::{DesignError, DesignResult};

pub mod distillation;
pub mod operating_lines;
pub mod staircase;

/// One of the seven design quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Feed liquid mole fraction of the light component
    Xf,
    /// Distillate liquid mole fraction
    Xd,
    /// Bottoms liquid mole fraction
    Xb,
    /// Relative volatility
    Alpha,
    /// Reflux ratio `R`
    Reflux,
    /// Reboil ratio `B`
    Reboil,
    /// Feed thermal condition
    Q,
}

impl Variable {
    pub const ALL: [Variable; 7] = [
        Variable::Xf,
        Variable::Xd,
        Variable::Xb,
        Variable::Alpha,
        Variable::Reflux,
        Variable::Reboil,
        Variable::Q,
    ];

    /// Short name as used on diagrams (`"xf"`, `"R"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Variable::Xf => "xf",
            Variable::Xd => "xd",
            Variable::Xb => "xb",
            Variable::Alpha => "alpha",
            Variable::Reflux => "R",
            Variable::Reboil => "B",
            Variable::Q => "q",
        }
    }

    /// Whether the variable is a mole fraction restricted to (0, 1).
    pub fn is_composition(&self) -> bool {
        matches!(self, Variable::Xf | Variable::Xd | Variable::Xb)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The variable solved from the geometry rather than taken as input.
///
/// Selecting it decides which two operating lines are known up front and
/// which one is found after the q-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DependentVariable {
    #[cfg_attr(feature = "serde", serde(rename = "xf"))]
    Xf,
    #[cfg_attr(feature = "serde", serde(rename = "xd"))]
    Xd,
    #[cfg_attr(feature = "serde", serde(rename = "xb"))]
    Xb,
    #[cfg_attr(feature = "serde", serde(rename = "R"))]
    Reflux,
    #[cfg_attr(feature = "serde", serde(rename = "B"))]
    Reboil,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "q"))]
    Q,
}

impl DependentVariable {
    pub const ALL: [DependentVariable; 6] = [
        DependentVariable::Reflux,
        DependentVariable::Reboil,
        DependentVariable::Q,
        DependentVariable::Xf,
        DependentVariable::Xd,
        DependentVariable::Xb,
    ];

    /// The design variable this selector overwrites.
    pub fn variable(&self) -> Variable {
        match self {
            DependentVariable::Xf => Variable::Xf,
            DependentVariable::Xd => Variable::Xd,
            DependentVariable::Xb => Variable::Xb,
            DependentVariable::Reflux => Variable::Reflux,
            DependentVariable::Reboil => Variable::Reboil,
            DependentVariable::Q => Variable::Q,
        }
    }

    pub fn name(&self) -> &'static str {
        self.variable().name()
    }
}

impl fmt::Display for DependentVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DependentVariable {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DependentVariable::ALL
            .into_iter()
            .find(|dv| dv.name() == s)
            .ok_or_else(|| DesignError::InvalidSelector(s.to_string()))
    }
}

/// Design quantities of a binary column.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Variables {
    /// Feed composition
    pub xf: f64,
    /// Distillate composition
    pub xd: f64,
    /// Bottoms composition
    pub xb: f64,
    /// Relative volatility
    pub alpha: f64,
    /// Reflux ratio `R = L/D`
    #[cfg_attr(feature = "serde", serde(rename = "R"))]
    pub reflux: f64,
    /// Reboil ratio `B = V'/W`
    #[cfg_attr(feature = "serde", serde(rename = "B"))]
    pub reboil: f64,
    /// Feed thermal condition (1 = saturated liquid, 0 = saturated vapor)
    pub q: f64,
}

impl Default for Variables {
    fn default() -> Self {
        Variables { xf: 0.68, xd: 0.93, xb: 0.04, alpha: 1.85, reflux: 3.0, reboil: 10.0, q: 0.99 }
    }
}

impl Variables {
    pub fn get(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Xf => self.xf,
            Variable::Xd => self.xd,
            Variable::Xb => self.xb,
            Variable::Alpha => self.alpha,
            Variable::Reflux => self.reflux,
            Variable::Reboil => self.reboil,
            Variable::Q => self.q,
        }
    }

    pub fn set(&mut self, variable: Variable, value: f64) {
        match variable {
            Variable::Xf => self.xf = value,
            Variable::Xd => self.xd = value,
            Variable::Xb => self.xb = value,
            Variable::Alpha => self.alpha = value,
            Variable::Reflux => self.reflux = value,
            Variable::Reboil => self.reboil = value,
            Variable::Q => self.q = value,
        }
    }

    /// Pushes `xf` above `xb` and `xd` above `xf` by `step` where the
    /// ordering `xb < xf < xd` is violated.
    ///
    /// Returns `true` if anything changed.
    pub fn enforce_composition_order(&mut self, step: f64) -> bool {
        let mut changed = false;
        if self.xb >= self.xf {
            self.xf = self.xb + step;
            changed = true;
        }
        if self.xf >= self.xd {
            self.xd = self.xf + step;
            changed = true;
        }
        changed
    }

    /// Checks every input that `dependent` does not overwrite.
    ///
    /// Compositions must lie in (0, 1), `R`, `B` and `q` must not be NaN
    /// (infinite values are their total-reflux / pure-vapor limits) and the
    /// relative volatility must be valid.
    pub fn validate(&self, dependent: DependentVariable) -> DesignResult<RelativeVolatility> {
        let alpha = RelativeVolatility::new(self.alpha)?;

        for variable in Variable::ALL {
            if variable == Variable::Alpha || variable == dependent.variable() {
                continue;
            }
            let value = self.get(variable);
            if value.is_nan() {
                return Err(DesignError::InvalidConfiguration(format!("{} is NaN", variable)));
            }
            if variable.is_composition() && !(value > 0.0 && value < 1.0) {
                return Err(DesignError::InvalidConfiguration(format!(
                    "{} must lie in (0, 1), got {}",
                    variable, value
                )));
            }
        }

        if !self.is_ordered() {
            event!(
                Level::WARN,
                xb = self.xb,
                xf = self.xf,
                xd = self.xd,
                "compositions violate xb < xf < xd"
            );
        }
        Ok(alpha)
    }

    /// Whether `xb < xf < xd`.
    pub fn is_ordered(&self) -> bool {
        self.xb < self.xf && self.xf < self.xd
    }
}
