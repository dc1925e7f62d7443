//! Backward conversion: RCPSP solution → plan.

use tracing::debug;

use super::ProblemConverter;
use crate::models::Plan;
use crate::rcpsp::RcpspSolution;

impl ProblemConverter<'_> {
    /// Maps a solution back onto the activities of the converted problem.
    ///
    /// Only tasks that are also activities of the problem are kept; anchors
    /// and foreign tasks are skipped. Activities absent from the solution
    /// are left out of the plan. Plan order follows the problem.
    pub fn build_plan(&self, solution: &RcpspSolution) -> Plan {
        let mut plan = Plan::new();
        for activity in &self.problem.activities {
            if let Some(window) = solution.schedule.get(&activity.name) {
                plan.schedule_activity(activity.name.as_str(), window.start, window.end);
            }
        }
        for task in solution.tasks() {
            if !self.activity_index.contains_key(task) {
                debug!(task, "skipping task with no matching activity");
            }
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, SchedulingProblem};

    fn problem() -> SchedulingProblem {
        SchedulingProblem::new("plan")
            .with_activity(Activity::new("A", 5))
            .with_activity(Activity::new("B", 3))
            .with_activity(Activity::new("C", 2))
    }

    #[test]
    fn test_plan_covers_known_tasks() {
        let problem = problem();
        let converter = ProblemConverter::new(&problem);
        let solution = RcpspSolution::new()
            .with_task("source_", 0, 0)
            .with_task("B", 0, 3)
            .with_task("A", 3, 8)
            .with_task("foreign", 1, 2)
            .with_task("sink_", 8, 8);

        let plan = converter.build_plan(&solution);
        assert_eq!(plan.activities, vec!["A", "B"]);
        assert_eq!(plan.start_of("A"), Some(3));
        assert_eq!(plan.end_of("A"), Some(8));
        assert_eq!(plan.start_of("B"), Some(0));
        assert_eq!(plan.end_of("B"), Some(3));
        // C is missing from the schedule
        assert_eq!(plan.start_of("C"), None);
        assert_eq!(plan.start_of("foreign"), None);
        assert_eq!(plan.assignment.len(), 4);
    }

    #[test]
    fn test_every_shared_task_is_mapped() {
        let problem = problem();
        let converter = ProblemConverter::new(&problem);
        let m = converter.build_rcpsp_model().unwrap().model;
        let solution = m.dummy_solution().unwrap();
        let plan = converter.build_plan(&solution);

        for task in solution.tasks() {
            if problem.activity(task).is_some() {
                assert_eq!(plan.start_of(task), solution.start_time(task));
                assert_eq!(plan.end_of(task), solution.end_time(task));
            }
        }
        assert_eq!(plan.len(), 3);
    }
}
