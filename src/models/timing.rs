//! Timepoints and timings.
//!
//! A timepoint names an instant of the problem: the global start of the
//! time line, or the start/end of an activity. A timing is a timepoint
//! shifted by an integer delay.
//!
//! # Time Model
//! Time is discrete and measured in abstract integer units from the global
//! start (t=0). The consumer defines what one unit means.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An instant of the scheduling problem.
///
/// Activity timepoints refer to their activity by name. The reference is
/// resolved by the converter; a name with no matching activity is reported
/// as a diagnostic rather than silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timepoint {
    /// Origin of the time line (t=0).
    GlobalStart,
    /// Start of the named activity.
    Start(String),
    /// End of the named activity.
    End(String),
}

/// Which side of an activity a timepoint designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    Start,
    End,
}

impl Timepoint {
    /// Start timepoint of an activity.
    pub fn start(activity: impl Into<String>) -> Self {
        Self::Start(activity.into())
    }

    /// End timepoint of an activity.
    pub fn end(activity: impl Into<String>) -> Self {
        Self::End(activity.into())
    }

    /// Activity name, if this is an activity timepoint.
    pub fn activity(&self) -> Option<&str> {
        match self {
            Self::GlobalStart => None,
            Self::Start(name) | Self::End(name) => Some(name),
        }
    }

    /// Activity side, if this is an activity timepoint.
    pub fn anchor(&self) -> Option<Anchor> {
        match self {
            Self::GlobalStart => None,
            Self::Start(_) => Some(Anchor::Start),
            Self::End(_) => Some(Anchor::End),
        }
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalStart => write!(f, "global_start"),
            Self::Start(name) => write!(f, "start({name})"),
            Self::End(name) => write!(f, "end({name})"),
        }
    }
}

/// A timepoint plus a constant delay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timing {
    pub timepoint: Timepoint,
    pub delay: i64,
}

impl Timing {
    /// Creates a timing.
    pub fn new(timepoint: Timepoint, delay: i64) -> Self {
        Self { timepoint, delay }
    }

    /// Absolute instant `time` (global start + `time`).
    pub fn global(time: i64) -> Self {
        Self::new(Timepoint::GlobalStart, time)
    }

    /// Start of an activity, zero delay.
    pub fn start(activity: impl Into<String>) -> Self {
        Self::new(Timepoint::start(activity), 0)
    }

    /// End of an activity, zero delay.
    pub fn end(activity: impl Into<String>) -> Self {
        Self::new(Timepoint::end(activity), 0)
    }

    /// Shifts the timing by `delay` units.
    pub fn plus(mut self, delay: i64) -> Self {
        self.delay += delay;
        self
    }

    /// Whether this is an absolute instant.
    #[inline]
    pub fn is_global(&self) -> bool {
        self.timepoint == Timepoint::GlobalStart
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.delay {
            0 => write!(f, "{}", self.timepoint),
            d if d > 0 => write!(f, "{} + {d}", self.timepoint),
            d => write!(f, "{} - {}", self.timepoint, -d),
        }
    }
}
