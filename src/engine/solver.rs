//! Pluggable RCPSP solver backends.

use crate::config::SolverParams;
use crate::error::SolverError;
use crate::rcpsp::{RcpspModel, RcpspSolution};

/// A backend that searches schedules for an RCPSP model.
///
/// Backends may hold external resources (processes, licences, handles).
/// The engine calls [`RcpspSolver::release`] exactly once when it is
/// closed or dropped, whatever the outcome of the solve.
pub trait RcpspSolver {
    /// Backend name, used in logs.
    fn name(&self) -> &str;

    /// Solves `model`. An empty result means no solution was found.
    fn solve(
        &mut self,
        model: &RcpspModel,
        params: &SolverParams,
    ) -> Result<SolverResults, SolverError>;

    /// Frees backend resources.
    fn release(&mut self) {}
}

/// Candidate solutions found by a backend.
#[derive(Debug, Clone, Default)]
pub struct SolverResults {
    solutions: Vec<RcpspSolution>,
}

impl SolverResults {
    /// No solution.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps a list of candidates.
    pub fn from_solutions(solutions: Vec<RcpspSolution>) -> Self {
        Self { solutions }
    }

    /// Adds a candidate.
    pub fn push(&mut self, solution: RcpspSolution) {
        self.solutions.push(solution);
    }

    /// All candidates in discovery order.
    pub fn solutions(&self) -> &[RcpspSolution] {
        &self.solutions
    }

    /// Candidate with the lowest makespan (first one on ties).
    pub fn best_solution(&self) -> Option<&RcpspSolution> {
        self.solutions.iter().min_by_key(|s| s.makespan())
    }

    /// Consumes the results, keeping the best candidate.
    pub fn into_best(self) -> Option<RcpspSolution> {
        self.solutions.into_iter().min_by_key(|s| s.makespan())
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}
