//! Structural validation of scheduling problems and RCPSP models.
//!
//! Checks structural integrity before conversion and before solving.
//! Detects:
//! - Duplicate or empty names
//! - Invalid durations and fluent domains
//! - Unknown successor and resource references
//! - Circular precedence dependencies (DAG validation)
//! - Broken source/sink anchors and calendar sizes
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::{FluentType, SchedulingProblem};
use crate::rcpsp::RcpspModel;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two entities share the same name.
    DuplicateId,
    /// An entity has an empty name.
    EmptyName,
    /// Duration bounds are negative or inverted.
    InvalidDuration,
    /// Integer fluent domain has lower > upper.
    InvalidDomain,
    /// A task has no mode details.
    MissingMode,
    /// A successor edge names an unknown task.
    InvalidSuccessor,
    /// A mode consumes an unknown resource.
    InvalidResourceReference,
    /// Precedence graph contains a cycle.
    CyclicDependency,
    /// A calendar does not cover exactly the horizon.
    CalendarLength,
    /// Source or sink anchor is malformed.
    AnchorInvariant,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a scheduling problem.
///
/// Checks:
/// 1. No duplicate or empty fluent names
/// 2. No duplicate or empty activity names
/// 3. Duration bounds satisfy 0 <= lower <= upper
/// 4. Integer fluent domains satisfy lower <= upper
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(problem: &SchedulingProblem) -> ValidationResult {
    let mut errors = Vec::new();

    let mut fluent_names = HashSet::new();
    for fluent in &problem.fluents {
        if fluent.name.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                "Fluent with empty name",
            ));
        }
        if !fluent_names.insert(fluent.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate fluent name: {}", fluent.name),
            ));
        }
        if let FluentType::Int { lower, upper } = fluent.fluent_type {
            if lower > upper {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDomain,
                    format!("Fluent '{}' has empty domain [{lower}, {upper}]", fluent.name),
                ));
            }
        }
    }

    let mut activity_names = HashSet::new();
    for activity in &problem.activities {
        if activity.name.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                "Activity with empty name",
            ));
        }
        if !activity_names.insert(activity.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate activity name: {}", activity.name),
            ));
        }
        let d = activity.duration;
        if d.lower < 0 || d.upper < d.lower {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Activity '{}' has invalid duration [{}, {}]",
                    activity.name, d.lower, d.upper
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an RCPSP model.
///
/// Checks:
/// 1. No duplicate task names
/// 2. Source first, sink last, both zero-duration with no demand
/// 3. Source has no predecessors, sink has no successors
/// 4. Every task has mode details with non-negative duration
/// 5. Successor edges and mode consumptions reference known entities
/// 6. Every calendar covers exactly the horizon
/// 7. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_model(model: &RcpspModel) -> ValidationResult {
    let mut errors = Vec::new();

    let mut task_names = HashSet::new();
    for task in &model.tasks_list {
        if !task_names.insert(task.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task name: {task}"),
            ));
        }
    }

    check_anchors(model, &mut errors);

    for task in &model.tasks_list {
        match model.mode(task) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingMode,
                format!("Task '{task}' has no mode details"),
            )),
            Some(mode) => {
                if mode.duration < 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidDuration,
                        format!("Task '{task}' has negative duration {}", mode.duration),
                    ));
                }
                for resource in mode.consumption.keys() {
                    let known = model.resources.contains_key(resource)
                        || model.non_renewable_resources.contains(resource);
                    if !known {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::InvalidResourceReference,
                            format!("Task '{task}' consumes unknown resource '{resource}'"),
                        ));
                    }
                }
            }
        }
    }

    // Sorted for deterministic error order
    let mut edges: Vec<(&String, &Vec<String>)> = model.successors.iter().collect();
    edges.sort();
    for (task, successors) in edges {
        if !task_names.contains(task.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSuccessor,
                format!("Successor list for unknown task '{task}'"),
            ));
        }
        for next in successors {
            if !task_names.contains(next.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSuccessor,
                    format!("Task '{task}' references unknown successor '{next}'"),
                ));
            }
        }
    }

    for (resource, calendar) in &model.resources {
        if calendar.len() != model.horizon {
            errors.push(ValidationError::new(
                ValidationErrorKind::CalendarLength,
                format!(
                    "Calendar of '{resource}' covers {} units, horizon is {}",
                    calendar.len(),
                    model.horizon
                ),
            ));
        }
    }

    if let Some(cycle_err) = detect_cycles(model) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_anchors(model: &RcpspModel, errors: &mut Vec<ValidationError>) {
    let mut fail = |message: String| {
        errors.push(ValidationError::new(ValidationErrorKind::AnchorInvariant, message));
    };

    if model.tasks_list.first() != Some(&model.source_task) {
        fail(format!("Source '{}' is not the first task", model.source_task));
    }
    if model.tasks_list.last() != Some(&model.sink_task) {
        fail(format!("Sink '{}' is not the last task", model.sink_task));
    }
    for anchor in [&model.source_task, &model.sink_task] {
        if let Some(mode) = model.mode(anchor) {
            if mode.duration != 0 || mode.consumption.values().any(|&v| v != 0) {
                fail(format!("Anchor '{anchor}' must have zero duration and no demand"));
            }
        }
    }
    if !model.successors_of(&model.sink_task).is_empty() {
        fail(format!("Sink '{}' has successors", model.sink_task));
    }
    let source_has_predecessor = model
        .successors
        .values()
        .flatten()
        .any(|next| *next == model.source_task);
    if source_has_predecessor {
        fail(format!("Source '{}' has predecessors", model.source_task));
    }
}

/// Detects cycles in the successor graph.
///
/// # Algorithm
/// Kahn's topological sort: repeatedly remove tasks without remaining
/// predecessors. Tasks left over once the queue empties lie on, or behind,
/// a cycle. Iterative, so long precedence chains cannot exhaust the stack.
///
/// # Reference
/// Kahn (1962), "Topological sorting of large networks"
fn detect_cycles(model: &RcpspModel) -> Option<ValidationError> {
    let mut seen = HashSet::new();
    let tasks: Vec<&str> = model
        .tasks_list
        .iter()
        .map(String::as_str)
        .filter(|t| seen.insert(*t))
        .collect();

    let mut in_degree: HashMap<&str, usize> = tasks.iter().map(|&t| (t, 0)).collect();
    for next in tasks.iter().flat_map(|t| model.successors_of(t)) {
        if let Some(d) = in_degree.get_mut(next.as_str()) {
            *d += 1;
        }
    }

    let mut queue: VecDeque<&str> = tasks
        .iter()
        .copied()
        .filter(|t| in_degree.get(t) == Some(&0))
        .collect();
    let mut removed = 0;
    while let Some(task) = queue.pop_front() {
        removed += 1;
        for next in model.successors_of(task) {
            if let Some(d) = in_degree.get_mut(next.as_str()) {
                *d -= 1;
                if *d == 0 {
                    queue.push_back(next.as_str());
                }
            }
        }
    }

    if removed == in_degree.len() {
        return None;
    }
    let blocked = tasks
        .iter()
        .find(|t| in_degree.get(*t).is_some_and(|&d| d > 0))?;
    Some(ValidationError::new(
        ValidationErrorKind::CyclicDependency,
        format!("Circular dependency detected involving task '{blocked}'"),
    ))
}
