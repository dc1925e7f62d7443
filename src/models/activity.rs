//! Activity model.
//!
//! An activity is a named unit of work with a duration, timed effects on
//! resources, and optional activity-level constraints (release dates and
//! deadlines).
//!
//! # Resource Usage
//! `uses(resource, amount)` follows the planning convention: the amount is
//! taken from the pool at the activity start and given back at its end.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2

use serde::{Deserialize, Serialize};

use super::{Constraint, Effect, TimedEffect, Timepoint, Timing};

/// An activity to be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity name.
    pub name: String,
    /// Duration bounds. Only fixed durations can be converted.
    pub duration: DurationBounds,
    /// Effects attached to the activity's own timepoints.
    pub effects: Vec<TimedEffect>,
    /// Constraints owned by the activity (release dates, deadlines).
    pub constraints: Vec<Constraint>,
}

impl Activity {
    /// Creates an activity with a fixed duration.
    pub fn new(name: impl Into<String>, duration: i64) -> Self {
        Self {
            name: name.into(),
            duration: DurationBounds::fixed(duration),
            effects: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Sets the duration bounds.
    pub fn with_duration(mut self, duration: DurationBounds) -> Self {
        self.duration = duration;
        self
    }

    /// Consumes `amount` units of `resource` while the activity runs.
    pub fn uses(mut self, resource: impl Into<String>, amount: i64) -> Self {
        let resource = resource.into();
        self.effects.push(TimedEffect::new(
            Timing::start(self.name.as_str()),
            Effect::decrease(resource.as_str(), amount),
        ));
        self.effects.push(TimedEffect::new(
            Timing::end(self.name.as_str()),
            Effect::increase(resource, amount),
        ));
        self
    }

    /// Adds an arbitrary effect at a timing.
    pub fn with_effect(mut self, timing: Timing, effect: Effect) -> Self {
        self.effects.push(TimedEffect::new(timing, effect));
        self
    }

    /// The activity must end no later than `time`.
    pub fn add_deadline(mut self, time: i64) -> Self {
        self.constraints
            .push(Constraint::deadline(self.name.as_str(), time));
        self
    }

    /// The activity must start no earlier than `time`.
    pub fn add_release_date(mut self, time: i64) -> Self {
        self.constraints
            .push(Constraint::release(self.name.as_str(), time));
        self
    }

    /// Start timepoint.
    pub fn start(&self) -> Timepoint {
        Timepoint::start(self.name.as_str())
    }

    /// End timepoint.
    pub fn end(&self) -> Timepoint {
        Timepoint::end(self.name.as_str())
    }

    /// Effects applied exactly at the activity start.
    pub fn start_effects(&self) -> impl Iterator<Item = &Effect> {
        let start = self.start();
        self.effects
            .iter()
            .filter(move |e| e.timing.timepoint == start && e.timing.delay == 0)
            .map(|e| &e.effect)
    }
}

/// Lower and upper bound of an activity duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub lower: i64,
    pub upper: i64,
}

impl DurationBounds {
    /// Creates duration bounds.
    pub fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }

    /// A fixed duration (lower == upper).
    pub fn fixed(duration: i64) -> Self {
        Self::new(duration, duration)
    }

    /// The duration, if fixed.
    pub fn fixed_value(&self) -> Option<i64> {
        (self.lower == self.upper).then_some(self.lower)
    }
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self::fixed(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Anchor, EffectKind};

    #[test]
    fn test_activity_builder() {
        let act = Activity::new("A", 5)
            .uses("R", 2)
            .add_deadline(20)
            .add_release_date(1);

        assert_eq!(act.name, "A");
        assert_eq!(act.duration.fixed_value(), Some(5));
        assert_eq!(act.effects.len(), 2);
        assert_eq!(act.constraints.len(), 2);
        assert_eq!(act.start(), Timepoint::start("A"));
        assert_eq!(act.end(), Timepoint::end("A"));
    }

    #[test]
    fn test_uses_decreases_at_start_and_releases_at_end() {
        let act = Activity::new("A", 5).uses("R", 2);

        let starts: Vec<_> = act.start_effects().collect();
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].kind, EffectKind::Decrease);
        assert_eq!(starts[0].fluent, "R");

        let end = &act.effects[1];
        assert_eq!(end.timing, Timing::end("A"));
        assert_eq!(end.effect.kind, EffectKind::Increase);
    }

    #[test]
    fn test_delayed_effect_is_not_a_start_effect() {
        let act = Activity::new("A", 5).with_effect(Timing::start("A").plus(1), Effect::decrease("R", 1));
        assert_eq!(act.start_effects().count(), 0);
    }

    #[test]
    fn test_deadline_and_release_windows() {
        let act = Activity::new("A", 5).add_deadline(20).add_release_date(1);
        match &act.constraints[0] {
            Constraint::Window { anchor, latest, .. } => {
                assert_eq!(*anchor, Anchor::End);
                assert_eq!(*latest, Some(20));
            }
            _ => panic!("wrong variant"),
        }
        match &act.constraints[1] {
            Constraint::Window { anchor, earliest, .. } => {
                assert_eq!(*anchor, Anchor::Start);
                assert_eq!(*earliest, Some(1));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_duration_bounds() {
        assert_eq!(DurationBounds::fixed(3).fixed_value(), Some(3));
        assert_eq!(DurationBounds::new(2, 4).fixed_value(), None);
        assert_eq!(DurationBounds::default().fixed_value(), Some(0));
    }
}
