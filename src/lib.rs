//! Bridge between planning-style scheduling problems and RCPSP models.
//!
//! Translates a scheduling problem expressed as activities, resources
//! (integer fluents), temporal constraints and calendar effects into a
//! resource-constrained project scheduling (RCPSP) model, and maps RCPSP
//! schedules back into plans. Search is delegated to pluggable solvers;
//! this crate owns only the translation and the engine contract.
//!
//! # Modules
//!
//! - **`models`**: Source domain: `SchedulingProblem`, `Activity`, `Fluent`,
//!   `Constraint`, `Timepoint`, `Plan`
//! - **`rcpsp`**: Target domain: `RcpspModel`, `CapacityCalendar`,
//!   `RcpspSolution`, serial schedule generation, solution evaluation
//! - **`convert`**: Forward, backward and reverse conversion with diagnostics
//! - **`engine`**: Converter + `RcpspSolver` adapter with scoped release
//! - **`validation`**: Structural checks of problems and models
//! - **`config`**: Conversion options and solver parameters (TOML)
//! - **`error`**: Error types
//!
//! # Example
//!
//! ```
//! use u_rcpsp_bridge::config::ConversionConfig;
//! use u_rcpsp_bridge::engine::{Engine, PlanGenerationStatus};
//! use u_rcpsp_bridge::models::{Activity, Relation, SchedulingProblem, Timing};
//!
//! let problem = SchedulingProblem::new("chain")
//!     .with_resource("R", 3)
//!     .with_activity(Activity::new("A", 5).uses("R", 2))
//!     .with_activity(Activity::new("B", 5))
//!     .with_constraint(Relation::le(Timing::end("A"), Timing::start("B")));
//!
//! let mut engine = Engine::new().with_conversion_config(ConversionConfig::default().with_horizon(100));
//! let result = engine.solve(&problem).unwrap();
//! assert_eq!(result.status, PlanGenerationStatus::SolvedSatisficing);
//! assert_eq!(result.plan.unwrap().start_of("B"), Some(5));
//! ```
//!
//! # References
//!
//! - Kolisch & Sprecher (1997), "PSPLIB - A project scheduling problem library"
//! - Brucker et al. (1999), "Resource-constrained project scheduling:
//!   Notation, classification, models, and methods"
//! - Ghallab, Nau & Traverso (2016), "Automated Planning and Acting"

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod models;
pub mod rcpsp;
pub mod validation;
