//! Scheduling problem model.
//!
//! A scheduling problem gathers fluents (resources), activities, temporal
//! constraints and base effects. Base effects change resource availability
//! at absolute times and are how calendars are expressed (e.g. a machine
//! unavailable during a maintenance window).
//!
//! Relations are classified into [`Constraint`] variants as they are
//! added; the problem never stores raw relations.

use serde::{Deserialize, Serialize};

use super::{Activity, Constraint, Effect, Fluent, Relation};

/// An absolute-time effect on a fluent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEffect {
    /// Absolute time (units from the global start).
    pub time: i64,
    pub effect: Effect,
}

/// A scheduling problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulingProblem {
    /// Problem name.
    pub name: String,
    /// State variables; integer fluents are resources.
    pub fluents: Vec<Fluent>,
    /// Activities to schedule.
    pub activities: Vec<Activity>,
    /// Problem-level constraints.
    pub constraints: Vec<Constraint>,
    /// Absolute-time effects (calendars).
    pub base_effects: Vec<BaseEffect>,
}

impl SchedulingProblem {
    /// Creates an empty problem.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a resource pool with the given capacity.
    pub fn add_resource(&mut self, name: impl Into<String>, capacity: i64) {
        self.fluents.push(Fluent::resource(name, capacity));
    }

    /// Adds a fluent.
    pub fn add_fluent(&mut self, fluent: Fluent) {
        self.fluents.push(fluent);
    }

    /// Adds an activity.
    pub fn add_activity(&mut self, activity: Activity) {
        self.activities.push(activity);
    }

    /// Classifies and adds a relation.
    pub fn add_constraint(&mut self, relation: Relation) {
        self.constraints.push(Constraint::classify(relation));
    }

    /// Adds an already classified constraint.
    pub fn add_classified(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Resource availability drops by `amount` from `time` on.
    pub fn add_decrease_effect(&mut self, time: i64, resource: impl Into<String>, amount: i64) {
        self.base_effects.push(BaseEffect {
            time,
            effect: Effect::decrease(resource, amount),
        });
    }

    /// Resource availability grows by `amount` from `time` on.
    pub fn add_increase_effect(&mut self, time: i64, resource: impl Into<String>, amount: i64) {
        self.base_effects.push(BaseEffect {
            time,
            effect: Effect::increase(resource, amount),
        });
    }

    /// Builder: adds a resource.
    pub fn with_resource(mut self, name: impl Into<String>, capacity: i64) -> Self {
        self.add_resource(name, capacity);
        self
    }

    /// Builder: adds an activity.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.add_activity(activity);
        self
    }

    /// Builder: classifies and adds a relation.
    pub fn with_constraint(mut self, relation: Relation) -> Self {
        self.add_constraint(relation);
        self
    }

    /// Builder: blocks `amount` units of `resource` during [start, end).
    pub fn with_unavailability(
        mut self,
        resource: impl Into<String>,
        amount: i64,
        start: i64,
        end: i64,
    ) -> Self {
        let resource = resource.into();
        self.add_decrease_effect(start, resource.as_str(), amount);
        self.add_increase_effect(end, resource, amount);
        self
    }

    /// Finds a fluent by name.
    pub fn fluent(&self, name: &str) -> Option<&Fluent> {
        self.fluents.iter().find(|f| f.name == name)
    }

    /// Finds an activity by name.
    pub fn activity(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.name == name)
    }

    /// Integer fluents (resources).
    pub fn resources(&self) -> impl Iterator<Item = &Fluent> {
        self.fluents.iter().filter(|f| f.is_int())
    }

    /// Problem constraints followed by every activity's own constraints.
    pub fn all_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .chain(self.activities.iter().flat_map(|a| a.constraints.iter()))
    }
}
