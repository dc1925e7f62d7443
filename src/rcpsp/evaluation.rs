//! Solution evaluation.
//!
//! Checks an RCPSP solution against its model and reports makespan plus
//! every violated constraint.
//!
//! # Checks
//!
//! | Check | Condition |
//! |-------|-----------|
//! | Missing task | every task of `tasks_list` is scheduled |
//! | Duration | `end - start` equals the mode duration |
//! | Precedence | `end(a) <= start(b)` for every successor edge |
//! | Capacity | per-unit usage never exceeds the calendar |
//! | Window | start/end windows hold |
//! | Special | start-together, start-at-end and offset precedences hold |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use super::{RcpspModel, RcpspSolution};

/// Classification of solution violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A model task is absent from the solution.
    MissingTask,
    /// Scheduled length differs from the mode duration.
    DurationMismatch,
    /// A task started before a predecessor finished.
    PrecedenceViolation,
    /// A resource was used beyond its calendar capacity.
    CapacityExceeded,
    /// A start or end window was not met.
    WindowViolation,
    /// A generalized precedence was not met.
    SpecialConstraintViolation,
}

/// A violated constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Task or resource concerned.
    pub entity: String,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity: entity.into(),
            message: message.into(),
        }
    }
}

/// Result of checking a solution against a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionEvaluation {
    /// End of the sink task, or latest end if the sink is not scheduled.
    pub makespan: i64,
    pub violations: Vec<Violation>,
}

impl SolutionEvaluation {
    /// Evaluates `solution` against `model`.
    pub fn evaluate(model: &RcpspModel, solution: &RcpspSolution) -> Self {
        let mut violations = Vec::new();

        for task in &model.tasks_list {
            let Some(window) = solution.schedule.get(task) else {
                violations.push(Violation::new(
                    ViolationKind::MissingTask,
                    task.as_str(),
                    format!("Task '{task}' is not scheduled"),
                ));
                continue;
            };
            if let Some(duration) = model.duration(task) {
                if window.duration() != duration {
                    violations.push(Violation::new(
                        ViolationKind::DurationMismatch,
                        task.as_str(),
                        format!(
                            "Task '{task}' lasts {} instead of {duration}",
                            window.duration()
                        ),
                    ));
                }
            }
            for succ in model.successors_of(task) {
                if let Some(next) = solution.schedule.get(succ) {
                    if next.start < window.end {
                        violations.push(Violation::new(
                            ViolationKind::PrecedenceViolation,
                            succ.as_str(),
                            format!(
                                "Task '{succ}' starts at {} before '{task}' ends at {}",
                                next.start, window.end
                            ),
                        ));
                    }
                }
            }
        }

        check_capacity(model, solution, &mut violations);
        check_windows(model, solution, &mut violations);
        check_special(model, solution, &mut violations);

        let makespan = solution
            .end_time(&model.sink_task)
            .unwrap_or_else(|| solution.makespan());

        Self {
            makespan,
            violations,
        }
    }

    /// Whether the solution satisfies every checked constraint.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations of a given kind.
    pub fn violations_of(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.kind == kind).collect()
    }
}

/// Reports the first overloaded time unit of each resource.
fn check_capacity(model: &RcpspModel, solution: &RcpspSolution, violations: &mut Vec<Violation>) {
    for (resource, calendar) in &model.resources {
        let mut usage = vec![0i64; calendar.len()];
        for (task, window) in &solution.schedule {
            let Some(mode) = model.mode(task) else {
                continue;
            };
            let demand = mode.demand(resource);
            if demand <= 0 {
                continue;
            }
            let start = window.start.max(0) as usize;
            let end = (window.end.max(0) as usize).min(usage.len());
            for slot in usage.iter_mut().take(end).skip(start) {
                *slot += demand;
            }
        }

        let overload = usage
            .iter()
            .zip(calendar.values())
            .position(|(used, cap)| used > cap);
        if let Some(t) = overload {
            violations.push(Violation::new(
                ViolationKind::CapacityExceeded,
                resource.as_str(),
                format!(
                    "Resource '{resource}' uses {} of {} at t={t}",
                    usage[t],
                    calendar.at(t).unwrap_or(0)
                ),
            ));
        }
    }
}

fn check_windows(model: &RcpspModel, solution: &RcpspSolution, violations: &mut Vec<Violation>) {
    let special = &model.special_constraints;
    let sides = [
        ("start", &special.start_times_window, true),
        ("end", &special.end_times_window, false),
    ];
    for (side, windows, is_start) in sides {
        for (task, &(earliest, latest)) in windows {
            let Some(w) = solution.schedule.get(task) else {
                continue;
            };
            let t = if is_start { w.start } else { w.end };
            let early = earliest.is_some_and(|e| t < e);
            let late = latest.is_some_and(|l| t > l);
            if early || late {
                violations.push(Violation::new(
                    ViolationKind::WindowViolation,
                    task.as_str(),
                    format!("Task '{task}' {side} {t} outside [{earliest:?}, {latest:?}]"),
                ));
            }
        }
    }
}

fn check_special(model: &RcpspModel, solution: &RcpspSolution, violations: &mut Vec<Violation>) {
    let special = &model.special_constraints;
    let mut fail = |entity: &str, message: String| {
        violations.push(Violation::new(
            ViolationKind::SpecialConstraintViolation,
            entity,
            message,
        ));
    };

    for (a, b) in &special.start_together {
        if let (Some(sa), Some(sb)) = (solution.start_time(a), solution.start_time(b)) {
            if sa != sb {
                fail(b, format!("'{a}' starts at {sa} but '{b}' at {sb}"));
            }
        }
    }
    for (a, b) in &special.start_at_end {
        if let (Some(ea), Some(sb)) = (solution.end_time(a), solution.start_time(b)) {
            if ea != sb {
                fail(b, format!("'{b}' starts at {sb} instead of end of '{a}' ({ea})"));
            }
        }
    }
    for (a, b, lag) in &special.start_at_end_plus_offset {
        if let (Some(ea), Some(sb)) = (solution.end_time(a), solution.start_time(b)) {
            if sb < ea + lag {
                fail(b, format!("'{b}' starts at {sb} before end of '{a}' + {lag}"));
            }
        }
    }
    for (a, b, lag) in &special.start_after_nunit {
        if let (Some(sa), Some(sb)) = (solution.start_time(a), solution.start_time(b)) {
            if sb < sa + lag {
                fail(b, format!("'{b}' starts at {sb} before start of '{a}' + {lag}"));
            }
        }
    }
}
