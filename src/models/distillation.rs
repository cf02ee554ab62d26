//! McCabe-Thiele distillation model.
//!
//! [`DistillationModel`] owns the design variables, the dependent-variable
//! selector and every derived quantity of the diagram. Derived quantities are
//! caches: [`recompute`](DistillationModel::recompute) rebuilds all of them
//! from the current inputs in one go.
//!
//! # Recompute sequence
//!
//! 1. Validate the independent inputs
//! 2. Build the two operating lines that do not need the dependent variable
//! 3. Intersect them: the q-point
//! 4. Back-solve the dependent variable through the q-point
//! 5. Build the remaining operating line
//! 6. Resample the VLE curve
//! 7. Step off the equilibrium stages
//!
//! Steps 1-5 work on scratch values; nothing is written to the model unless
//! all of them succeed, so a failed recompute leaves the previous diagram
//! intact.
//!
//! # Example
//!
//! ```
//! use mccabe_thiele::{DistillationModel, DependentVariable, Variable};
//!
//! let mut model = DistillationModel::new();
//! model.recompute()?;
//! let q0 = model.get(Variable::Q);
//!
//! // Feed the solved q back in and solve for the reflux ratio instead
//! model.select_dependent(DependentVariable::Reflux);
//! model.set(Variable::Q, q0);
//! model.recompute()?;
//! assert!((model.get(Variable::Reflux) - 3.0).abs() < 1e-9);
//! # Ok::<(), mccabe_thiele::DesignError>(())
//! ```

use nalgebra::Point2;
use tracing::{event, Level};

use crate::lines::Line;
use crate::models::operating_lines::Section;
use crate::models::staircase::{Staircase, DEFAULT_MAX_EQ_POINTS, MIN_EQ_POINTS};
use crate::models::{DependentVariable, Variable, Variables};
use crate::solvers::{self, shortcut::ShortcutEstimates};
use crate::thermodynamics::{RelativeVolatility, VleCurve};
use crate::{DesignError, DesignResult};

/// Plain description of a model: inputs, selector and buffer capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelConfig {
    pub variables: Variables,
    pub dependent_variable: DependentVariable,
    pub max_eq_points: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            variables: Variables::default(),
            dependent_variable: DependentVariable::default(),
            max_eq_points: DEFAULT_MAX_EQ_POINTS,
        }
    }
}

/// Uncommitted result of the geometric part of a recompute.
#[derive(Debug, Clone, Copy)]
struct Solution {
    variables: Variables,
    alpha: RelativeVolatility,
    q_point: Point2<f64>,
    rectifying: Line,
    stripping: Line,
    q_line: Line,
}

/// Binary distillation column on a McCabe-Thiele diagram.
#[derive(Debug, Clone)]
pub struct DistillationModel {
    variables: Variables,
    dependent: DependentVariable,

    // Derived geometry, rebuilt by recompute()
    rectifying: Line,
    stripping: Line,
    q_line: Line,
    q_point: Point2<f64>,
    vle_curve: VleCurve,
    staircase: Staircase,
}

impl DistillationModel {
    /// Creates a model with default variables, `q` as dependent variable and
    /// room for 127 equilibrium points.
    ///
    /// Derived quantities are zero until the first [`recompute`](Self::recompute).
    pub fn new() -> Self {
        DistillationModel {
            variables: Variables::default(),
            dependent: DependentVariable::default(),
            rectifying: Line::non_vertical(0.0, 0.0),
            stripping: Line::non_vertical(0.0, 0.0),
            q_line: Line::non_vertical(0.0, 0.0),
            q_point: Point2::origin(),
            vle_curve: VleCurve::default(),
            staircase: Staircase::default(),
        }
    }

    /// Builds a model from a configuration, validating the buffer capacity.
    pub fn from_config(config: ModelConfig) -> DesignResult<Self> {
        let staircase = Staircase::with_capacity(config.max_eq_points)?;
        Ok(DistillationModel {
            variables: config.variables,
            dependent: config.dependent_variable,
            staircase,
            ..DistillationModel::new()
        })
    }

    /// Replaces all design variables.
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Selects the dependent variable.
    pub fn with_dependent_variable(mut self, dependent: DependentVariable) -> Self {
        self.dependent = dependent;
        self
    }

    /// Sets the capacity of the equilibrium-point buffer.
    ///
    /// # Panics
    ///
    /// Panics if `max_eq_points` is below 4, the smallest buffer that fits one stage.
    pub fn with_max_eq_points(mut self, max_eq_points: usize) -> Self {
        assert!(
            max_eq_points >= MIN_EQ_POINTS,
            "Equilibrium-point capacity must be at least {}, got {}",
            MIN_EQ_POINTS,
            max_eq_points
        );
        self.staircase = Staircase::empty(max_eq_points);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> ModelConfig {
        ModelConfig {
            variables: self.variables,
            dependent_variable: self.dependent,
            max_eq_points: self.staircase.capacity(),
        }
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn set_variables(&mut self, variables: Variables) {
        self.variables = variables;
    }

    pub fn get(&self, variable: Variable) -> f64 {
        self.variables.get(variable)
    }

    /// Writes an input. Writing the dependent variable is allowed but the
    /// value is overwritten by the next recompute.
    pub fn set(&mut self, variable: Variable, value: f64) {
        self.variables.set(variable, value);
    }

    pub fn dependent_variable(&self) -> DependentVariable {
        self.dependent
    }

    /// Selects the dependent variable by name (`"xf"`, `"xd"`, `"xb"`, `"R"`,
    /// `"B"` or `"q"`).
    ///
    /// Unknown names are rejected without touching the model. Does not
    /// recompute.
    pub fn set_dependent_variable(&mut self, name: &str) -> DesignResult<()> {
        self.dependent = name.parse()?;
        Ok(())
    }

    /// Selects the dependent variable. Does not recompute.
    pub fn select_dependent(&mut self, dependent: DependentVariable) {
        self.dependent = dependent;
    }

    /// Restores `xb < xf < xd` by nudging `xf` and `xd` up by `step`.
    pub fn enforce_composition_order(&mut self, step: f64) -> bool {
        self.variables.enforce_composition_order(step)
    }

    /// Rebuilds every derived quantity from the current inputs.
    ///
    /// # Errors
    ///
    /// - [`DesignError::InvalidConfiguration`] for an invalid relative
    ///   volatility, a composition outside (0, 1) or a NaN input
    /// - [`DesignError::DegenerateGeometry`] when the two known operating
    ///   lines do not have a unique finite intersection
    /// - [`DesignError::PhysicallyImpossible`] when a dependent composition
    ///   would need a line parallel to the diagonal
    ///
    /// On error the model keeps the results of the last successful call.
    pub fn recompute(&mut self) -> DesignResult<()> {
        let solution = self.solve()?;
        let Solution { variables: vars, alpha, q_point, .. } = solution;
        let dependent = self.dependent;
        let solved = vars.get(dependent.variable());

        // Commit
        self.variables = vars;
        self.q_point = q_point;
        self.rectifying = solution.rectifying;
        self.stripping = solution.stripping;
        self.q_line = solution.q_line;

        self.vle_curve.resample(alpha);
        self.staircase.rebuild(
            vars.xb,
            vars.xd,
            alpha,
            &self.stripping,
            &self.rectifying,
            &self.q_point,
        );

        event!(
            Level::DEBUG,
            dependent = %dependent,
            solved,
            q_x = q_point.x,
            q_y = q_point.y,
            stages = self.staircase.n_eq_points(),
            "recomputed McCabe-Thiele diagram"
        );
        if !self.staircase.converged() {
            event!(
                Level::WARN,
                stages = self.staircase.n_eq_points(),
                capacity = self.staircase.capacity(),
                xd = vars.xd,
                "staircase did not reach the distillate composition"
            );
        }
        Ok(())
    }

    /// Validation, q-point and dependent solve, without touching the model.
    fn solve(&self) -> DesignResult<Solution> {
        let dependent = self.dependent;
        let alpha = self.variables.validate(dependent)?;
        let mut vars = self.variables;

        let [first, second] = Section::known(dependent);
        let first_line = first.line(&vars);
        let second_line = second.line(&vars);

        let q_point = first_line.intersect(&second_line)?;

        let solved = solvers::solve_dependent(dependent, &vars, &q_point)?;
        if solved.is_nan() {
            return Err(DesignError::degenerate(format!(
                "{} is undefined for q-point ({}, {})",
                dependent, q_point.x, q_point.y
            )));
        }
        vars.set(dependent.variable(), solved);

        // The known lines do not depend on the solved value, so all three
        // can be built from the completed variable set.
        Ok(Solution {
            variables: vars,
            alpha,
            q_point,
            rectifying: Section::Rectifying.line(&vars),
            stripping: Section::Stripping.line(&vars),
            q_line: Section::Feed.line(&vars),
        })
    }

    pub fn rectifying_line(&self) -> &Line {
        &self.rectifying
    }

    pub fn stripping_line(&self) -> &Line {
        &self.stripping
    }

    pub fn q_line(&self) -> &Line {
        &self.q_line
    }

    /// Intersection of the operating lines.
    pub fn q_point(&self) -> Point2<f64> {
        self.q_point
    }

    pub fn vle_curve(&self) -> &VleCurve {
        &self.vle_curve
    }

    pub fn staircase(&self) -> &Staircase {
        &self.staircase
    }

    /// Valid staircase corner points.
    pub fn eq_points(&self) -> &[Point2<f64>] {
        self.staircase.points()
    }

    /// Number of theoretical stages.
    pub fn n_eq_points(&self) -> usize {
        self.staircase.n_eq_points()
    }

    /// `false` when the staircase hit its capacity before reaching `xd`; the
    /// stage count is then only a lower bound.
    pub fn converged(&self) -> bool {
        self.staircase.converged()
    }

    pub fn feed_stage(&self) -> Option<usize> {
        self.staircase.feed_stage()
    }

    /// Minimum stages, pinch point and minimum reflux/reboil for the current
    /// inputs.
    ///
    /// Solves the diagram afresh without committing it, so the result never
    /// mixes current inputs with a stale feed line. Fails with the same
    /// errors as [`recompute`](Self::recompute).
    pub fn shortcut_estimates(&self) -> DesignResult<ShortcutEstimates> {
        let solution = self.solve()?;
        ShortcutEstimates::compute(&solution.variables, &solution.q_line, solution.alpha)
    }
}

impl Default for DistillationModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermodynamics::vle;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn textbook() -> Variables {
        Variables { xf: 0.5, xd: 0.9, xb: 0.1, alpha: 2.0, reflux: 2.0, reboil: 5.0, q: 1.0 }
    }

    #[test]
    fn test_model_creation() {
        let model = DistillationModel::new();
        assert_eq!(*model.variables(), Variables::default());
        assert_eq!(model.dependent_variable(), DependentVariable::Q);
        assert_eq!(model.n_eq_points(), 0);
        assert_eq!(model.config().max_eq_points, DEFAULT_MAX_EQ_POINTS);
        assert!(model.vle_curve().is_empty());
    }

    #[test]
    fn test_textbook_scenario() {
        let mut model = DistillationModel::new()
            .with_variables(textbook())
            .with_dependent_variable(DependentVariable::Q);
        model.recompute().unwrap();

        let q_point = model.q_point();
        assert_relative_eq!(q_point.x, 0.6, epsilon = 1e-12);
        assert_relative_eq!(q_point.y, 0.7, epsilon = 1e-12);
        assert_relative_eq!(model.get(Variable::Q), 2.0, epsilon = 1e-9);
        assert!(model.get(Variable::Q).is_finite());

        assert!(model.converged());
        assert_eq!(model.n_eq_points(), 10);
        assert_eq!(model.feed_stage(), Some(7));
        assert_eq!(model.eq_points().len(), 21);
        assert_eq!(model.vle_curve().len(), 100);
        assert_relative_eq!(model.vle_curve().points()[30].y, vle(0.3, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_all_lines_pass_through_q_point() {
        for dependent in DependentVariable::ALL {
            let mut model = DistillationModel::new().with_dependent_variable(dependent);
            model.recompute().unwrap();
            let p = model.q_point();

            for line in [model.rectifying_line(), model.stripping_line(), model.q_line()] {
                match line {
                    Line::Vertical { x } => assert_relative_eq!(*x, p.x, epsilon = 1e-9),
                    Line::NonVertical { .. } => {
                        assert_relative_eq!(line.y_at(p.x).unwrap(), p.y, epsilon = 1e-9)
                    }
                }
            }
        }
    }

    #[test]
    fn test_round_trip_q_then_reflux() {
        let mut model = DistillationModel::new();
        model.recompute().unwrap();
        let q0 = model.get(Variable::Q);

        model.set_dependent_variable("R").unwrap();
        model.set(Variable::Reflux, 0.0);
        model.set(Variable::Q, q0);
        model.recompute().unwrap();

        assert_relative_eq!(model.get(Variable::Reflux), 3.0, epsilon = 1e-9);
    }

    #[rstest]
    #[case(DependentVariable::Reboil, 10.0)]
    #[case(DependentVariable::Xf, 0.68)]
    #[case(DependentVariable::Xd, 0.93)]
    #[case(DependentVariable::Xb, 0.04)]
    fn test_round_trip_other_selectors(#[case] dependent: DependentVariable, #[case] expected: f64) {
        let mut model = DistillationModel::new();
        model.recompute().unwrap();
        let q0 = model.get(Variable::Q);

        model.select_dependent(dependent);
        model.set(Variable::Q, q0);
        model.recompute().unwrap();

        assert_relative_eq!(model.get(dependent.variable()), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_saturated_liquid_feed() {
        let mut model = DistillationModel::new()
            .with_variables(textbook())
            .with_dependent_variable(DependentVariable::Reflux);
        model.recompute().unwrap();

        assert_eq!(*model.q_line(), Line::vertical(0.5));
        assert_eq!(model.q_point().x, 0.5);
        assert_relative_eq!(model.q_point().y, 0.58, epsilon = 1e-12);
        // Slope (0.9 - 0.58) / 0.4 = 0.8
        assert_relative_eq!(model.get(Variable::Reflux), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_alpha_keeps_previous_state() {
        let mut model = DistillationModel::new();
        model.recompute().unwrap();
        let before = model.clone();

        model.set(Variable::Alpha, 1.0);
        let result = model.recompute();
        assert!(matches!(result, Err(DesignError::InvalidConfiguration(_))));

        assert_eq!(model.q_point(), before.q_point());
        assert_eq!(model.get(Variable::Q), before.get(Variable::Q));
        assert_eq!(model.eq_points(), before.eq_points());
    }

    #[test]
    fn test_parallel_operating_lines_are_degenerate() {
        // Total reflux and total reboil: both lines are the diagonal
        let mut model = DistillationModel::new();
        model.recompute().unwrap();
        let q_before = model.get(Variable::Q);

        model.set(Variable::Reflux, f64::INFINITY);
        model.set(Variable::Reboil, f64::INFINITY);
        let result = model.recompute();
        assert!(matches!(result, Err(DesignError::DegenerateGeometry { .. })));
        assert_eq!(model.get(Variable::Q), q_before);

        // Equal finite slopes: R/(R+1) = (B+1)/B = 0.5
        model.set(Variable::Reflux, 1.0);
        model.set(Variable::Reboil, -2.0);
        assert!(matches!(model.recompute(), Err(DesignError::DegenerateGeometry { .. })));
    }

    #[test]
    fn test_physically_impossible_distillate() {
        let mut model = DistillationModel::new().with_dependent_variable(DependentVariable::Xd);
        model.set(Variable::Reflux, f64::INFINITY);
        assert_eq!(
            model.recompute(),
            Err(DesignError::PhysicallyImpossible(DependentVariable::Xd))
        );
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let mut model = DistillationModel::new().with_dependent_variable(DependentVariable::Xb);
        let result = model.set_dependent_variable("alpha");
        assert_eq!(result, Err(DesignError::InvalidSelector("alpha".to_string())));
        assert_eq!(model.dependent_variable(), DependentVariable::Xb);
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let mut model = DistillationModel::new().with_variables(textbook());
        model.recompute().unwrap();
        let first = model.clone();

        model.recompute().unwrap();
        assert_eq!(model.eq_points(), first.eq_points());
        assert_eq!(model.n_eq_points(), first.n_eq_points());
        assert_eq!(model.q_point(), first.q_point());
    }

    #[test]
    fn test_staircase_capacity_signal() {
        let mut model = DistillationModel::new().with_max_eq_points(21);
        model.set(Variable::Alpha, 1.01);
        model.recompute().unwrap();

        assert!(!model.converged());
        assert_eq!(model.n_eq_points(), 9);
        assert_eq!(model.eq_points().len(), 19);
    }

    #[test]
    #[should_panic(expected = "Equilibrium-point capacity must be at least")]
    fn test_capacity_too_small() {
        let _ = DistillationModel::new().with_max_eq_points(2);
    }

    #[test]
    fn test_from_config() {
        let config = ModelConfig {
            variables: textbook(),
            dependent_variable: DependentVariable::Reboil,
            max_eq_points: 64,
        };
        let model = DistillationModel::from_config(config).unwrap();
        assert_eq!(model.config(), config);

        let too_small = ModelConfig { max_eq_points: 1, ..config };
        assert!(DistillationModel::from_config(too_small).is_err());
    }

    #[test]
    fn test_shortcut_estimates() {
        let mut model = DistillationModel::new()
            .with_variables(textbook())
            .with_dependent_variable(DependentVariable::Reflux);
        model.recompute().unwrap();

        let estimates = model.shortcut_estimates().unwrap();
        assert_relative_eq!(estimates.minimum_reflux, 1.4, epsilon = 1e-9);
        // Actual reflux must exceed the minimum
        assert!(model.get(Variable::Reflux) > estimates.minimum_reflux);
        assert!((model.n_eq_points() as f64) > estimates.minimum_stages);
    }

    #[test]
    fn test_shortcut_estimates_before_first_recompute() {
        let fresh = DistillationModel::new();
        let estimates = fresh.shortcut_estimates().unwrap();

        assert!(estimates.minimum_reflux.is_finite());
        assert!(estimates.minimum_reboil.is_finite());
        assert!(estimates.pinch_point.x > 0.0);
        assert_relative_eq!(estimates.pinch_point.y, vle(estimates.pinch_point.x, 1.85), epsilon = 1e-9);
        // Nothing was committed
        assert_eq!(fresh.n_eq_points(), 0);

        let mut recomputed = DistillationModel::new();
        recomputed.recompute().unwrap();
        assert_eq!(recomputed.shortcut_estimates().unwrap(), estimates);
    }

    #[test]
    fn test_shortcut_estimates_track_edited_inputs() {
        let mut model = DistillationModel::new();
        model.recompute().unwrap();
        let before = model.shortcut_estimates().unwrap();

        model.set(Variable::Xf, 0.3);
        let edited = model.shortcut_estimates().unwrap();
        assert!((edited.pinch_point.x - before.pinch_point.x).abs() > 1e-3);

        let mut reference = DistillationModel::new().with_variables(*model.variables());
        reference.recompute().unwrap();
        assert_eq!(reference.shortcut_estimates().unwrap(), edited);
        let pinch = edited.pinch_point;
        assert_relative_eq!(reference.q_line().y_at(pinch.x).unwrap(), pinch.y, epsilon = 1e-9);

        model.set(Variable::Alpha, 1.0);
        assert!(matches!(
            model.shortcut_estimates(),
            Err(DesignError::InvalidConfiguration(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde() {
        let json = r#"{"variables": {"xf": 0.5, "R": 2.0}, "dependent_variable": "B"}"#;
        let config: ModelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.variables.xf, 0.5);
        assert_eq!(config.variables.reflux, 2.0);
        assert_eq!(config.variables.xd, 0.93);
        assert_eq!(config.dependent_variable, DependentVariable::Reboil);
        assert_eq!(config.max_eq_points, DEFAULT_MAX_EQ_POINTS);

        let round_trip: ModelConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }
}
