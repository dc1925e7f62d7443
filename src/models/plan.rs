//! Plan (solution) model on the planning side.
//!
//! A plan assigns an integer instant to activity timepoints. It is what the
//! backward conversion produces from a computed RCPSP schedule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Timepoint;

/// Timepoint assignment for a set of activities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Timepoint → instant.
    pub assignment: BTreeMap<Timepoint, i64>,
    /// Names of the activities covered, in insertion order.
    pub activities: Vec<String>,
}

impl Plan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start and end of an activity.
    pub fn schedule_activity(&mut self, activity: impl Into<String>, start: i64, end: i64) {
        let activity = activity.into();
        self.assignment
            .insert(Timepoint::start(activity.as_str()), start);
        self.assignment.insert(Timepoint::end(activity.as_str()), end);
        if !self.activities.contains(&activity) {
            self.activities.push(activity);
        }
    }

    /// Assigned instant of a timepoint.
    pub fn get(&self, timepoint: &Timepoint) -> Option<i64> {
        self.assignment.get(timepoint).copied()
    }

    /// Start of an activity.
    pub fn start_of(&self, activity: &str) -> Option<i64> {
        self.get(&Timepoint::start(activity))
    }

    /// End of an activity.
    pub fn end_of(&self, activity: &str) -> Option<i64> {
        self.get(&Timepoint::end(activity))
    }

    /// Latest end across all activities.
    pub fn makespan(&self) -> i64 {
        self.assignment
            .iter()
            .filter(|(tp, _)| matches!(tp, Timepoint::End(_)))
            .map(|(_, t)| *t)
            .max()
            .unwrap_or(0)
    }

    /// Number of scheduled activities.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether no activity is scheduled.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_accessors() {
        let mut plan = Plan::new();
        plan.schedule_activity("A", 0, 5);
        plan.schedule_activity("B", 5, 10);

        assert_eq!(plan.start_of("A"), Some(0));
        assert_eq!(plan.end_of("B"), Some(10));
        assert_eq!(plan.start_of("C"), None);
        assert_eq!(plan.makespan(), 10);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.assignment.len(), 4);
    }

    #[test]
    fn test_rescheduling_keeps_single_entry() {
        let mut plan = Plan::new();
        plan.schedule_activity("A", 0, 5);
        plan.schedule_activity("A", 2, 7);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.start_of("A"), Some(2));
    }

    #[test]
    fn test_empty_plan() {
        let plan = Plan::new();
        assert!(plan.is_empty());
        assert_eq!(plan.makespan(), 0);
    }
}
