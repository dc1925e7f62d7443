//! RCPSP target model.
//!
//! The representation consumed by resource-constrained project scheduling
//! solvers: a task list anchored by source and sink, single-mode task
//! details, a successor graph, and dense capacity calendars.
//!
//! # Submodules
//!
//! - `model`: [`RcpspModel`], [`Mode`], [`SpecialConstraints`]
//! - `calendar`: [`CapacityCalendar`]
//! - `solution`: [`RcpspSolution`]
//! - `sgs`: serial schedule generation (feasible dummy schedules)
//! - `evaluation`: [`SolutionEvaluation`] against a model

mod calendar;
mod evaluation;
pub mod model;
pub mod sgs;
mod solution;

pub use calendar::{CapacityCalendar, Unavailability};
pub use evaluation::{SolutionEvaluation, Violation, ViolationKind};
pub use model::{single_mode, Mode, RcpspModel, SpecialConstraints, DEFAULT_MODE};
pub use solution::{RcpspSolution, TaskWindow};
