//! Planning-side scheduling models.
//!
//! Provides the source representation of a scheduling problem: fluents
//! (resources), activities with timed effects, classified temporal
//! constraints, and absolute-time base effects (calendars). Also holds the
//! plan type that solutions are mapped back into.
//!
//! # Domain Mappings
//!
//! | models | RCPSP (`rcpsp`) |
//! |--------|-----------------|
//! | Activity | Task (single mode) |
//! | Integer Fluent | Renewable resource |
//! | BaseEffect | Capacity calendar step |
//! | Constraint::Precedence | Successor edge |
//! | Plan | Solution schedule |

mod activity;
mod constraint;
mod effect;
mod plan;
mod problem;
mod resource;
mod timing;

pub use activity::{Activity, DurationBounds};
pub use constraint::{Constraint, Relation, RelationOp};
pub use effect::{Amount, Effect, EffectKind, TimedEffect};
pub use plan::Plan;
pub use problem::{BaseEffect, SchedulingProblem};
pub use resource::{Fluent, FluentType};
pub use timing::{Anchor, Timepoint, Timing};
