//! Solving engine.
//!
//! Wraps the converter and a pluggable [`RcpspSolver`] behind a
//! "solve one problem, get one plan" contract:
//!
//! 1. Convert the scheduling problem to an RCPSP model.
//! 2. Validate the model.
//! 3. Without a solver, take the model's dummy (serial SGS) solution;
//!    otherwise run the solver and keep its best solution.
//! 4. Check the solution against the model and discard it if infeasible.
//! 5. Map the solution back to a plan.
//!
//! The status is [`PlanGenerationStatus::SolvedSatisficing`] when a plan
//! exists and [`PlanGenerationStatus::UnsolvableProven`] otherwise. No
//! distinction is made between infeasibility and a search that ran out of
//! time without an incumbent.
//!
//! # Resource Scope
//! The engine owns its solver. Closing or dropping the engine releases the
//! solver exactly once.

mod solver;

pub use solver::{RcpspSolver, SolverResults};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{BridgeConfig, ConversionConfig, SolverParams};
use crate::convert::{Diagnostic, ProblemConverter};
use crate::error::EngineError;
use crate::models::{Plan, SchedulingProblem};
use crate::rcpsp::{RcpspModel, RcpspSolution};
use crate::validation;

/// Name reported in every result.
pub const ENGINE_NAME: &str = "Discrete-optimization";

/// Outcome of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanGenerationStatus {
    /// A plan was found; it is not claimed optimal.
    SolvedSatisficing,
    /// No plan was found.
    UnsolvableProven,
}

/// Plan, status and conversion diagnostics of a solve call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanGenerationResult {
    pub status: PlanGenerationStatus,
    pub plan: Option<Plan>,
    pub engine_name: String,
    /// Constructs left out of the solved model.
    pub diagnostics: Vec<Diagnostic>,
}

/// Converter + solver adapter.
pub struct Engine {
    solver: Option<Box<dyn RcpspSolver>>,
    params: SolverParams,
    config: ConversionConfig,
    rcpsp_model: Option<RcpspModel>,
    rcpsp_solution: Option<RcpspSolution>,
    closed: bool,
}

impl Engine {
    /// An engine without solver: plans come from the dummy solution.
    pub fn new() -> Self {
        Self {
            solver: None,
            params: SolverParams::default(),
            config: ConversionConfig::default(),
            rcpsp_model: None,
            rcpsp_solution: None,
            closed: false,
        }
    }

    /// An engine delegating to `solver` with forwarded `params`.
    pub fn with_solver(solver: impl RcpspSolver + 'static, params: SolverParams) -> Self {
        let mut engine = Self::new();
        engine.solver = Some(Box::new(solver));
        engine.params = params;
        engine
    }

    /// Builder: conversion options.
    pub fn with_conversion_config(mut self, config: ConversionConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder: conversion options and solver parameters from a loaded file.
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config.conversion;
        self.params = config.solver;
        self
    }

    pub fn name(&self) -> &str {
        ENGINE_NAME
    }

    /// Model built by the last solve call.
    pub fn rcpsp_model(&self) -> Option<&RcpspModel> {
        self.rcpsp_model.as_ref()
    }

    /// Solution found by the last solve call.
    pub fn rcpsp_solution(&self) -> Option<&RcpspSolution> {
        self.rcpsp_solution.as_ref()
    }

    /// Whether the problem fits the single-mode RCPSP form: every
    /// activity has a fixed, non-negative duration.
    ///
    /// Cheap capability check; [`Engine::solve`] may still fail on
    /// calendars or constraints.
    pub fn supports(&self, problem: &SchedulingProblem) -> bool {
        problem
            .activities
            .iter()
            .all(|a| a.duration.fixed_value().is_some_and(|d| d >= 0))
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Solves one scheduling problem.
    ///
    /// # Errors
    /// Conversion failures, an invalid converted model, solver failures,
    /// or use after [`Engine::close`]. A solver that finds nothing is not
    /// an error: the result is [`PlanGenerationStatus::UnsolvableProven`].
    pub fn solve(&mut self, problem: &SchedulingProblem) -> Result<PlanGenerationResult, EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }

        let converter = ProblemConverter::with_config(problem, self.config.clone());
        let conversion = converter.build_rcpsp_model()?;
        validation::validate_model(&conversion.model).map_err(EngineError::InvalidModel)?;

        self.rcpsp_solution = None;
        let model = self.rcpsp_model.insert(conversion.model);
        let solution = match self.solver.as_mut() {
            None => {
                debug!("no solver configured, decoding task list");
                model.dummy_solution()
            }
            Some(solver) => {
                info!(solver = solver.name(), tasks = model.tasks_list.len(), "solving RCPSP model");
                let results = solver.solve(model, &self.params)?;
                debug!(candidates = results.len(), "solver finished");
                results.into_best()
            }
        };
        let solution = solution.filter(|s| {
            let evaluation = model.evaluate(s);
            if !evaluation.is_feasible() {
                warn!(
                    violations = evaluation.violations.len(),
                    first = ?evaluation.violations.first().map(|v| v.message.as_str()),
                    "discarding schedule that violates the model"
                );
            }
            evaluation.is_feasible()
        });

        let plan = solution.as_ref().map(|s| converter.build_plan(s));
        let status = if plan.is_some() {
            PlanGenerationStatus::SolvedSatisficing
        } else {
            PlanGenerationStatus::UnsolvableProven
        };
        info!(
            problem = %problem.name,
            ?status,
            makespan = solution.as_ref().map(RcpspSolution::makespan),
            "plan generation finished"
        );
        self.rcpsp_solution = solution;

        Ok(PlanGenerationResult {
            status,
            plan,
            engine_name: ENGINE_NAME.to_string(),
            diagnostics: conversion.diagnostics,
        })
    }

    /// Releases the solver. Later calls and the drop are no-ops.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(solver) = self.solver.as_mut() {
            debug!(solver = solver.name(), "releasing solver");
            solver.release();
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConversionError, SolverError};
    use crate::models::{Activity, Relation, Timing};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Returns the dummy solution plus a delayed copy, or fails on demand.
    struct MockSolver {
        releases: Rc<Cell<usize>>,
        mode: MockMode,
    }

    enum MockMode {
        TwoCandidates,
        Nothing,
        Fail,
    }

    impl MockSolver {
        fn new(mode: MockMode) -> (Self, Rc<Cell<usize>>) {
            let releases = Rc::new(Cell::new(0));
            (
                Self {
                    releases: Rc::clone(&releases),
                    mode,
                },
                releases,
            )
        }
    }

    impl RcpspSolver for MockSolver {
        fn name(&self) -> &str {
            "mock"
        }

        fn solve(
            &mut self,
            model: &RcpspModel,
            _params: &SolverParams,
        ) -> Result<SolverResults, SolverError> {
            match self.mode {
                MockMode::TwoCandidates => {
                    let best = model.dummy_solution().ok_or_else(|| SolverError::Failed {
                        solver: "mock".into(),
                        message: "no dummy".into(),
                    })?;
                    let mut delayed = RcpspSolution::new();
                    for (task, w) in &best.schedule {
                        delayed.insert(task.as_str(), w.start + 10, w.end + 10);
                    }
                    Ok(SolverResults::from_solutions(vec![delayed, best]))
                }
                MockMode::Nothing => Ok(SolverResults::empty()),
                MockMode::Fail => Err(SolverError::Failed {
                    solver: "mock".into(),
                    message: "backend crashed".into(),
                }),
            }
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    fn chain_problem() -> SchedulingProblem {
        SchedulingProblem::new("chain")
            .with_resource("R", 3)
            .with_activity(Activity::new("A", 5).uses("R", 2))
            .with_activity(Activity::new("B", 5).uses("R", 2))
            .with_constraint(Relation::le(Timing::end("A"), Timing::start("B")))
    }

    fn small_horizon() -> ConversionConfig {
        ConversionConfig::default().with_horizon(100)
    }

    #[test]
    fn test_dummy_solution_without_solver() {
        let mut engine = Engine::new().with_conversion_config(small_horizon());
        let result = engine.solve(&chain_problem()).unwrap();

        assert_eq!(result.status, PlanGenerationStatus::SolvedSatisficing);
        assert_eq!(result.engine_name, "Discrete-optimization");
        let plan = result.plan.unwrap();
        assert_eq!(plan.start_of("A"), Some(0));
        assert_eq!(plan.end_of("A"), Some(5));
        assert_eq!(plan.start_of("B"), Some(5));
        assert_eq!(engine.rcpsp_model().map(|m| m.tasks_list.len()), Some(4));
        assert_eq!(engine.rcpsp_solution().map(RcpspSolution::makespan), Some(10));
    }

    #[test]
    fn test_solver_best_solution_used() {
        let (solver, releases) = MockSolver::new(MockMode::TwoCandidates);
        let mut engine = Engine::with_solver(solver, SolverParams::default().with_time_limit(5))
            .with_conversion_config(small_horizon());
        let plan = engine.solve(&chain_problem()).unwrap().plan.unwrap();

        assert_eq!(plan.start_of("A"), Some(0));
        assert_eq!(releases.get(), 0);
        drop(engine);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_no_solution_is_unsolvable() {
        let (solver, _) = MockSolver::new(MockMode::Nothing);
        let mut engine = Engine::with_solver(solver, SolverParams::default())
            .with_conversion_config(small_horizon());
        let result = engine.solve(&chain_problem()).unwrap();

        assert_eq!(result.status, PlanGenerationStatus::UnsolvableProven);
        assert!(result.plan.is_none());
        assert!(engine.rcpsp_model().is_some());
        assert!(engine.rcpsp_solution().is_none());
    }

    #[test]
    fn test_horizon_too_short_is_unsolvable() {
        let mut engine =
            Engine::new().with_conversion_config(ConversionConfig::default().with_horizon(7));
        let result = engine.solve(&chain_problem()).unwrap();
        assert_eq!(result.status, PlanGenerationStatus::UnsolvableProven);
    }

    #[test]
    fn test_release_once_after_failure() {
        let (solver, releases) = MockSolver::new(MockMode::Fail);
        let mut engine = Engine::with_solver(solver, SolverParams::default())
            .with_conversion_config(small_horizon());
        let err = engine.solve(&chain_problem()).unwrap_err();
        assert!(matches!(err, EngineError::Solver(_)));

        engine.close();
        engine.close();
        assert!(engine.is_closed());
        drop(engine);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_closed_engine_refuses_work() {
        let mut engine = Engine::new();
        engine.close();
        assert!(matches!(engine.solve(&chain_problem()), Err(EngineError::Closed)));
    }

    #[test]
    fn test_conversion_error_propagates() {
        let problem = chain_problem()
            .with_constraint(Relation::eq(Timing::start("A"), Timing::start("B")));
        let mut engine = Engine::new()
            .with_conversion_config(small_horizon().with_strict(true));
        let err = engine.solve(&problem).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Conversion(ConversionError::Unsupported(_))
        ));
    }

    #[test]
    fn test_diagnostics_returned() {
        let problem = chain_problem()
            .with_constraint(Relation::le(Timing::end("A"), Timing::end("B")));
        let mut engine = Engine::new().with_conversion_config(small_horizon());
        let result = engine.solve(&problem).unwrap();
        assert_eq!(result.status, PlanGenerationStatus::SolvedSatisficing);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_config_file_drives_engine() {
        let config = BridgeConfig::from_toml_str(
            "[conversion]\nhorizon = 50\nspecial_constraints = true\n",
        )
        .unwrap();
        let problem = chain_problem()
            .with_activity(Activity::new("C", 2).add_release_date(20));
        let mut engine = Engine::new().with_config(config);
        let plan = engine.solve(&problem).unwrap().plan.unwrap();

        assert_eq!(plan.start_of("C"), Some(20));
        assert_eq!(engine.rcpsp_model().map(|m| m.horizon), Some(50));
    }

    fn with_special_constraints() -> ConversionConfig {
        small_horizon().with_special_constraints(true)
    }

    #[test]
    fn test_with_solver_keeps_defaults() {
        let (solver, releases) = MockSolver::new(MockMode::Nothing);
        let engine = Engine::with_solver(solver, SolverParams::default().with_time_limit(3));
        assert!(!engine.is_closed());
        assert!(engine.rcpsp_model().is_none());
        assert_eq!(engine.params.time_limit_secs, Some(3));
        assert_eq!(engine.config.horizon, ConversionConfig::default().horizon);
        drop(engine);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_start_at_end_plan_is_feasible() {
        let problem = SchedulingProblem::new("handover")
            .with_resource("R", 3)
            .with_activity(Activity::new("A", 5).uses("R", 1))
            .with_activity(Activity::new("B", 4).uses("R", 1))
            .with_constraint(Relation::eq(Timing::end("A"), Timing::start("B")));
        let mut engine = Engine::new().with_conversion_config(with_special_constraints());
        let result = engine.solve(&problem).unwrap();

        assert_eq!(result.status, PlanGenerationStatus::SolvedSatisficing);
        let plan = result.plan.unwrap();
        assert_eq!(plan.start_of("B"), plan.end_of("A"));
        assert_eq!(plan.start_of("B"), Some(5));
    }

    #[test]
    fn test_deadline_and_reverse_offset_plan_is_feasible() {
        let problem = SchedulingProblem::new("offset")
            .with_resource("R", 3)
            .with_activity(Activity::new("A", 5).uses("R", 2))
            .with_activity(Activity::new("B", 5).uses("R", 2).add_deadline(5))
            .with_constraint(Relation::le(Timing::start("B").plus(3), Timing::start("A")));
        let mut engine = Engine::new().with_conversion_config(with_special_constraints());
        let result = engine.solve(&problem).unwrap();

        assert_eq!(result.status, PlanGenerationStatus::SolvedSatisficing);
        let plan = result.plan.unwrap();
        assert_eq!(plan.start_of("B"), Some(0));
        assert_eq!(plan.end_of("B"), Some(5));
        assert_eq!(plan.start_of("A"), Some(5));
        let model = engine.rcpsp_model().unwrap();
        let solution = engine.rcpsp_solution().unwrap();
        assert!(model.evaluate(solution).is_feasible());
    }

    #[test]
    fn test_unreachable_deadline_is_unsolvable() {
        let problem = chain_problem().with_activity(Activity::new("C", 5).add_deadline(3));
        let mut engine = Engine::new().with_conversion_config(with_special_constraints());
        let result = engine.solve(&problem).unwrap();

        assert_eq!(result.status, PlanGenerationStatus::UnsolvableProven);
        assert!(result.plan.is_none());
        assert!(engine.rcpsp_solution().is_none());
    }

    #[test]
    fn test_infeasible_solver_schedule_discarded() {
        struct OverlapSolver;

        impl RcpspSolver for OverlapSolver {
            fn name(&self) -> &str {
                "overlap"
            }

            fn solve(
                &mut self,
                model: &RcpspModel,
                _params: &SolverParams,
            ) -> Result<SolverResults, SolverError> {
                let mut sol = RcpspSolution::new();
                for task in &model.tasks_list {
                    let d = model.duration(task).unwrap_or(0);
                    sol.insert(task.as_str(), 0, d);
                }
                Ok(SolverResults::from_solutions(vec![sol]))
            }
        }

        let mut engine = Engine::with_solver(OverlapSolver, SolverParams::default())
            .with_conversion_config(small_horizon());
        let result = engine.solve(&chain_problem()).unwrap();
        assert_eq!(result.status, PlanGenerationStatus::UnsolvableProven);
        assert!(result.plan.is_none());
    }

    #[test]
    fn test_supports_fixed_durations_only() {
        use crate::models::DurationBounds;

        let engine = Engine::new();
        assert!(engine.supports(&chain_problem()));
        let flexible = chain_problem()
            .with_activity(Activity::new("C", 2).with_duration(DurationBounds::new(2, 4)));
        assert!(!engine.supports(&flexible));
    }
}
