//! RCPSP solution model.
//!
//! A solution maps task names to their start and end times. Solvers
//! produce solutions; the converter maps them back into plans.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Start and end of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWindow {
    pub start: i64,
    pub end: i64,
}

impl TaskWindow {
    /// Creates a task window.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Length of the window.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

/// A (possibly partial) RCPSP schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcpspSolution {
    /// Task name → scheduled window.
    pub schedule: BTreeMap<String, TaskWindow>,
}

impl RcpspSolution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a task window.
    pub fn insert(&mut self, task: impl Into<String>, start: i64, end: i64) {
        self.schedule.insert(task.into(), TaskWindow::new(start, end));
    }

    /// Builder: records a task window.
    pub fn with_task(mut self, task: impl Into<String>, start: i64, end: i64) -> Self {
        self.insert(task, start, end);
        self
    }

    /// Start time of a task.
    pub fn start_time(&self, task: &str) -> Option<i64> {
        self.schedule.get(task).map(|w| w.start)
    }

    /// End time of a task.
    pub fn end_time(&self, task: &str) -> Option<i64> {
        self.schedule.get(task).map(|w| w.end)
    }

    /// Whether a task is scheduled.
    pub fn contains(&self, task: &str) -> bool {
        self.schedule.contains_key(task)
    }

    /// Scheduled task names.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.schedule.keys().map(String::as_str)
    }

    /// Latest end time over all tasks.
    pub fn makespan(&self) -> i64 {
        self.schedule.values().map(|w| w.end).max().unwrap_or(0)
    }

    /// Number of scheduled tasks.
    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    /// Whether no task is scheduled.
    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_queries() {
        let sol = RcpspSolution::new()
            .with_task("A", 0, 5)
            .with_task("B", 5, 12);

        assert_eq!(sol.start_time("A"), Some(0));
        assert_eq!(sol.end_time("B"), Some(12));
        assert_eq!(sol.start_time("Z"), None);
        assert!(sol.contains("B"));
        assert_eq!(sol.makespan(), 12);
        assert_eq!(sol.tasks().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_task_window_duration() {
        assert_eq!(TaskWindow::new(3, 10).duration(), 7);
    }

    #[test]
    fn test_empty_solution() {
        let sol = RcpspSolution::new();
        assert!(sol.is_empty());
        assert_eq!(sol.makespan(), 0);
    }
}
