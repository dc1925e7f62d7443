//! Reverse conversion: RCPSP model → scheduling problem.
//!
//! Rebuilds a scheduling problem from an RCPSP instance, e.g. one read
//! from a benchmark library, so that it can be handed to planning-side
//! tooling. Calendars are expressed as decrease/increase effect pairs over
//! each unavailability window.

use std::collections::HashMap;

use tracing::info;

use crate::models::{Activity, Anchor, Constraint, Relation, SchedulingProblem, Timing};
use crate::rcpsp::RcpspModel;

/// Builds a scheduling problem equivalent to an RCPSP model.
///
/// Anchor tasks and constraints that touch them are not reproduced.
pub fn from_rcpsp_model(model: &RcpspModel) -> SchedulingProblem {
    let mut problem = SchedulingProblem::new("rcpsp");

    for resource in model.resources_list() {
        problem.add_resource(resource, model.max_capacity(resource).unwrap_or(0));
    }

    let mut activities: Vec<Activity> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for task in model.real_tasks() {
        let mut activity = Activity::new(task, model.duration(task).unwrap_or(0));
        if let Some(mode) = model.mode(task) {
            for (resource, &amount) in &mode.consumption {
                if amount != 0 && model.resources.contains_key(resource) {
                    activity = activity.uses(resource.as_str(), amount);
                }
            }
        }
        index.insert(task, activities.len());
        activities.push(activity);
    }

    for task in model.real_tasks() {
        for next in model.successors_of(task) {
            if !model.is_anchor(next) {
                problem.add_classified(Constraint::precedence(task, next.as_str()));
            }
        }
    }

    let special = &model.special_constraints;
    for (task, &(earliest, latest)) in &special.end_times_window {
        let Some(activity) = index.get(task.as_str()).and_then(|&i| activities.get_mut(i)) else {
            continue;
        };
        if let Some(deadline) = latest {
            activity.constraints.push(Constraint::deadline(task.as_str(), deadline));
        }
        if earliest.is_some() {
            activity.constraints.push(Constraint::Window {
                activity: task.clone(),
                anchor: Anchor::End,
                earliest,
                latest: None,
            });
        }
    }
    for (task, &(earliest, latest)) in &special.start_times_window {
        let Some(activity) = index.get(task.as_str()).and_then(|&i| activities.get_mut(i)) else {
            continue;
        };
        if let Some(release) = earliest {
            activity.constraints.push(Constraint::release(task.as_str(), release));
        }
        if latest.is_some() {
            activity.constraints.push(Constraint::Window {
                activity: task.clone(),
                anchor: Anchor::Start,
                earliest: None,
                latest,
            });
        }
    }

    let real = |a: &str, b: &str| !model.is_anchor(a) && !model.is_anchor(b);
    for (a, b) in special.start_together.iter().filter(|(a, b)| real(a, b)) {
        problem.add_constraint(Relation::eq(Timing::start(a.as_str()), Timing::start(b.as_str())));
    }
    for (a, b) in special.start_at_end.iter().filter(|(a, b)| real(a, b)) {
        problem.add_constraint(Relation::eq(Timing::end(a.as_str()), Timing::start(b.as_str())));
    }
    for (a, b, lag) in special.start_at_end_plus_offset.iter().filter(|(a, b, _)| real(a, b)) {
        problem.add_constraint(Relation::le(
            Timing::end(a.as_str()).plus(*lag),
            Timing::start(b.as_str()),
        ));
    }
    for (a, b, lag) in special.start_after_nunit.iter().filter(|(a, b, _)| real(a, b)) {
        problem.add_constraint(Relation::le(
            Timing::start(a.as_str()).plus(*lag),
            Timing::start(b.as_str()),
        ));
    }

    for (resource, calendar) in &model.resources {
        for window in calendar.unavailability_windows() {
            let (start, end) = (window.start as i64, window.end as i64);
            problem.add_decrease_effect(start, resource.as_str(), window.amount);
            problem.add_increase_effect(end, resource.as_str(), window.amount);
        }
    }

    for activity in activities {
        problem.add_activity(activity);
    }

    info!(
        activities = problem.activities.len(),
        resources = problem.fluents.len(),
        constraints = problem.constraints.len(),
        calendar_effects = problem.base_effects.len(),
        "rebuilt scheduling problem from RCPSP model"
    );
    problem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;
    use crate::convert::ProblemConverter;

    fn source_problem() -> SchedulingProblem {
        SchedulingProblem::new("source")
            .with_resource("R", 3)
            .with_resource("Q", 1)
            .with_activity(Activity::new("A", 5).uses("R", 2))
            .with_activity(Activity::new("B", 4).uses("R", 1).uses("Q", 1))
            .with_activity(Activity::new("C", 2).add_deadline(40).add_release_date(3))
            .with_constraint(Relation::le(Timing::end("A"), Timing::start("B")))
            .with_constraint(Relation::eq(Timing::start("A"), Timing::start("C")))
            .with_constraint(Relation::le(Timing::start("A").plus(2), Timing::start("B")))
            .with_unavailability("R", 2, 10, 15)
    }

    fn to_model(problem: &SchedulingProblem) -> RcpspModel {
        let config = ConversionConfig::default()
            .with_horizon(60)
            .with_special_constraints(true);
        ProblemConverter::with_config(problem, config)
            .build_rcpsp_model()
            .unwrap()
            .model
    }

    #[test]
    fn test_rebuilds_activities_and_resources() {
        let model = to_model(&source_problem());
        let problem = from_rcpsp_model(&model);

        let names: Vec<&str> = problem.activities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(problem.fluent("R").and_then(|f| f.capacity()), Some(3));
        assert_eq!(problem.activity("B").unwrap().duration.fixed_value(), Some(4));
        assert!(problem
            .constraints
            .contains(&Constraint::precedence("A", "B")));
        assert!(problem.constraints.contains(&Constraint::StartTogether {
            first: "A".into(),
            second: "C".into(),
        }));
    }

    #[test]
    fn test_windows_become_activity_constraints() {
        let model = to_model(&source_problem());
        let problem = from_rcpsp_model(&model);
        let c = problem.activity("C").unwrap();
        assert!(c.constraints.contains(&Constraint::deadline("C", 40)));
        assert!(c.constraints.contains(&Constraint::release("C", 3)));
    }

    #[test]
    fn test_round_trip_preserves_model() {
        let model = to_model(&source_problem());
        let rebuilt = to_model(&from_rcpsp_model(&model));

        assert_eq!(rebuilt.tasks_list, model.tasks_list);
        assert_eq!(rebuilt.resources, model.resources);
        assert_eq!(rebuilt.mode_details, model.mode_details);
        assert_eq!(rebuilt.successors, model.successors);
        assert_eq!(rebuilt.special_constraints, model.special_constraints);
    }

    #[test]
    fn test_anchor_edges_skipped() {
        let model = to_model(&source_problem());
        let problem = from_rcpsp_model(&model);
        for constraint in &problem.constraints {
            assert!(constraint.activities().iter().all(|a| !model.is_anchor(a)));
        }
        assert_eq!(problem.base_effects.len(), 2);
    }
}
