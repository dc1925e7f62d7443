//! Problem conversion between scheduling problems and RCPSP models.
//!
//! # Directions
//!
//! | Direction | Entry point | Output |
//! |-----------|-------------|--------|
//! | Forward | [`ProblemConverter::build_rcpsp_model`] | [`Conversion`] (model + diagnostics) |
//! | Backward | [`ProblemConverter::build_plan`] | [`Plan`](crate::models::Plan) |
//! | Reverse | [`from_rcpsp_model`] | [`SchedulingProblem`](crate::models::SchedulingProblem) |
//!
//! Forward conversion fails on hard precondition violations and reports
//! every other unsupported construct as a [`Diagnostic`].

mod backward;
mod diagnostics;
mod forward;
mod reverse;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use forward::{Conversion, ProblemConverter};
pub use reverse::from_rcpsp_model;
