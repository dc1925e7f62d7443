//! Forward conversion: scheduling problem → RCPSP model.
//!
//! # Steps
//!
//! 1. Every integer fluent becomes a resource whose calendar is filled
//!    with its declared capacity.
//! 2. Base effects apply permanent steps to those calendars.
//! 3. Every activity becomes a single-mode task; decreases at its start
//!    become the mode's consumption.
//! 4. Precedence constraints become successor edges. Generalized
//!    constraints go to [`SpecialConstraints`] when enabled.
//! 5. Source and sink anchors frame the task graph.
//!
//! Anything else is reported as a [`Diagnostic`].

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info};

use super::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog};
use crate::config::ConversionConfig;
use crate::error::ConversionError;
use crate::models::{Activity, Anchor, Constraint, EffectKind, SchedulingProblem, Timing};
use crate::rcpsp::{single_mode, CapacityCalendar, Mode, RcpspModel, SpecialConstraints};
use crate::validation::{self, ValidationError, ValidationErrorKind};

/// Result of a forward conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub model: RcpspModel,
    /// Constructs left out of `model`.
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    /// Whether the model captures the whole problem.
    pub fn is_exact(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Converts one scheduling problem to RCPSP and maps solutions back.
///
/// The activity index is built once from the borrowed problem, so a
/// converter is bound to a single problem instance.
#[derive(Debug)]
pub struct ProblemConverter<'a> {
    pub(super) problem: &'a SchedulingProblem,
    config: ConversionConfig,
    /// Activity name → position in the problem.
    pub(super) activity_index: HashMap<&'a str, usize>,
}

impl<'a> ProblemConverter<'a> {
    /// Creates a converter with the default configuration.
    pub fn new(problem: &'a SchedulingProblem) -> Self {
        Self::with_config(problem, ConversionConfig::default())
    }

    /// Creates a converter with an explicit configuration.
    pub fn with_config(problem: &'a SchedulingProblem, config: ConversionConfig) -> Self {
        let activity_index = problem
            .activities
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.as_str(), i))
            .collect();
        Self {
            problem,
            config,
            activity_index,
        }
    }

    /// The problem being converted.
    pub fn problem(&self) -> &'a SchedulingProblem {
        self.problem
    }

    /// The conversion options.
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Builds the RCPSP model.
    ///
    /// # Errors
    /// Hard precondition violations (invalid problem, non-fixed duration,
    /// non-constant calendar amount, negative effect time, calendar out of
    /// `[0, capacity]`, demand above capacity). In strict mode, any
    /// diagnostic is an error too.
    pub fn build_rcpsp_model(&self) -> Result<Conversion, ConversionError> {
        validation::validate_problem(self.problem).map_err(ConversionError::Invalid)?;
        self.check_anchor_names()?;

        let mut log = DiagnosticLog::default();
        let mut model = RcpspModel::new(
            self.config.source_task.as_str(),
            self.config.sink_task.as_str(),
            self.config.horizon,
        );

        let capacities = self.extract_resources(&mut model);
        self.apply_calendars(&mut model, &capacities, &mut log)?;
        self.extract_tasks(&mut model, &capacities, &mut log)?;
        let edges = self.extract_precedences(&mut model.special_constraints, &mut log);
        self.insert_anchors(&mut model, &edges);

        let diagnostics = log.into_inner();
        info!(
            problem = %self.problem.name,
            tasks = model.tasks_list.len(),
            resources = model.resources.len(),
            edges = edges.values().map(Vec::len).sum::<usize>(),
            diagnostics = diagnostics.len(),
            "converted scheduling problem to RCPSP"
        );

        if self.config.strict && !diagnostics.is_empty() {
            return Err(ConversionError::Unsupported(diagnostics));
        }
        Ok(Conversion { model, diagnostics })
    }

    fn check_anchor_names(&self) -> Result<(), ConversionError> {
        let collisions: Vec<ValidationError> = [&self.config.source_task, &self.config.sink_task]
            .into_iter()
            .filter(|name| self.activity_index.contains_key(name.as_str()))
            .map(|name| {
                ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Activity '{name}' collides with an anchor task"),
                )
            })
            .collect();
        if collisions.is_empty() {
            Ok(())
        } else {
            Err(ConversionError::Invalid(collisions))
        }
    }

    /// Step 1: one constant calendar per integer fluent.
    fn extract_resources(&self, model: &mut RcpspModel) -> BTreeMap<&'a str, i64> {
        let mut capacities = BTreeMap::new();
        for fluent in self.problem.resources() {
            let Some(capacity) = fluent.capacity() else {
                continue;
            };
            debug!(resource = %fluent.name, capacity, "resource");
            model.resources.insert(
                fluent.name.clone(),
                CapacityCalendar::constant(capacity, self.config.horizon),
            );
            capacities.insert(fluent.name.as_str(), capacity);
        }
        capacities
    }

    /// Step 2: permanent steps from base effects, then bound checks.
    fn apply_calendars(
        &self,
        model: &mut RcpspModel,
        capacities: &BTreeMap<&'a str, i64>,
        log: &mut DiagnosticLog,
    ) -> Result<(), ConversionError> {
        for base in &self.problem.base_effects {
            let effect = &base.effect;
            if base.time < 0 {
                return Err(ConversionError::NegativeEffectTime {
                    fluent: effect.fluent.clone(),
                    time: base.time,
                });
            }
            if self.problem.fluent(&effect.fluent).is_none() {
                log.report(
                    DiagnosticKind::UnknownResource,
                    effect.fluent.as_str(),
                    format!("Base effect at t={} targets unknown fluent '{}'", base.time, effect.fluent),
                );
                continue;
            }
            if !capacities.contains_key(effect.fluent.as_str()) {
                log.report(
                    DiagnosticKind::UnsupportedEffect,
                    effect.fluent.as_str(),
                    format!("Base effect at t={} targets non-resource fluent '{}'", base.time, effect.fluent),
                );
                continue;
            }
            let sign = match effect.kind {
                EffectKind::Decrease => -1,
                EffectKind::Increase => 1,
                EffectKind::Assign => {
                    log.report(
                        DiagnosticKind::UnsupportedEffect,
                        effect.fluent.as_str(),
                        format!("Assignment to '{}' at t={} is not a calendar step", effect.fluent, base.time),
                    );
                    continue;
                }
            };
            let amount = effect.amount.constant_value().ok_or_else(|| {
                ConversionError::NonConstantEffect {
                    fluent: effect.fluent.clone(),
                    lower: effect.amount.lower,
                    upper: effect.amount.upper,
                }
            })?;

            let from = usize::try_from(base.time).unwrap_or(usize::MAX);
            if let Some(calendar) = model.resources.get_mut(&effect.fluent) {
                calendar.apply_step(from, sign * amount);
                debug!(resource = %effect.fluent, time = base.time, delta = sign * amount, "calendar step");
            }
        }

        for (resource, calendar) in &model.resources {
            let capacity = capacities.get(resource.as_str()).copied().unwrap_or(0);
            if let Some(time) = calendar.first_negative() {
                return Err(ConversionError::CapacityUnderflow {
                    resource: resource.clone(),
                    time,
                });
            }
            if let Some(time) = calendar.first_above(capacity) {
                return Err(ConversionError::CapacityOverflow {
                    resource: resource.clone(),
                    capacity,
                    time,
                });
            }
        }
        Ok(())
    }

    /// Step 3: one single-mode task per activity.
    fn extract_tasks(
        &self,
        model: &mut RcpspModel,
        capacities: &BTreeMap<&'a str, i64>,
        log: &mut DiagnosticLog,
    ) -> Result<(), ConversionError> {
        for activity in &self.problem.activities {
            let duration = activity.duration.fixed_value().ok_or_else(|| {
                ConversionError::NonFixedDuration {
                    activity: activity.name.clone(),
                    lower: activity.duration.lower,
                    upper: activity.duration.upper,
                }
            })?;
            let mode = extract_mode(activity, duration, capacities, log)?;
            debug!(task = %activity.name, duration, demands = mode.consumption.len(), "task");
            model
                .mode_details
                .insert(activity.name.clone(), single_mode(mode));
        }
        Ok(())
    }

    /// Step 4: successor edges and special constraints.
    fn extract_precedences(
        &self,
        special: &mut SpecialConstraints,
        log: &mut DiagnosticLog,
    ) -> HashMap<&'a str, Vec<&'a str>> {
        let mut edges: HashMap<&'a str, Vec<&'a str>> = HashMap::new();

        for constraint in self.problem.all_constraints() {
            if let Constraint::Unclassified(relation) = constraint {
                log.report(
                    DiagnosticKind::UnclassifiedConstraint,
                    relation.to_string(),
                    format!("Relation '{relation}' has no RCPSP counterpart"),
                );
                continue;
            }
            let unknown = constraint
                .activities()
                .into_iter()
                .find(|name| !self.activity_index.contains_key(name));
            if let Some(name) = unknown {
                log.report(
                    DiagnosticKind::UnknownActivity,
                    name,
                    format!("Constraint '{constraint}' references unknown activity '{name}'"),
                );
                continue;
            }

            match constraint {
                Constraint::Precedence { before, after } => {
                    let successors = edges.entry(before.as_str()).or_default();
                    if !successors.contains(&after.as_str()) {
                        debug!(before = %before, after = %after, "precedence");
                        successors.push(after.as_str());
                    }
                }
                other if !self.config.special_constraints => {
                    log.report(
                        DiagnosticKind::SpecialConstraintsDisabled,
                        other.to_string(),
                        format!("Constraint '{other}' needs special constraints enabled"),
                    );
                }
                Constraint::StartAtEnd { before, after } => {
                    special.start_at_end.push((before.clone(), after.clone()));
                }
                Constraint::StartTogether { first, second } => {
                    special.start_together.push((first.clone(), second.clone()));
                }
                Constraint::OffsetPrecedence {
                    anchor,
                    before,
                    after,
                    lag,
                } => {
                    let record = (before.clone(), after.clone(), *lag);
                    match anchor {
                        Anchor::End => special.start_at_end_plus_offset.push(record),
                        Anchor::Start => special.start_after_nunit.push(record),
                    }
                }
                Constraint::Window {
                    activity,
                    anchor,
                    earliest,
                    latest,
                } => match anchor {
                    Anchor::Start => special.restrict_start(activity, *earliest, *latest),
                    Anchor::End => special.restrict_end(activity, *earliest, *latest),
                },
                Constraint::Unclassified(_) => {}
            }
        }

        edges
    }

    /// Step 5: source → every task → sink.
    fn insert_anchors(&self, model: &mut RcpspModel, edges: &HashMap<&'a str, Vec<&'a str>>) {
        let source = &self.config.source_task;
        let sink = &self.config.sink_task;
        let real: Vec<String> = self
            .problem
            .activities
            .iter()
            .map(|a| a.name.clone())
            .collect();

        model.tasks_list = std::iter::once(source.clone())
            .chain(real.iter().cloned())
            .chain(std::iter::once(sink.clone()))
            .collect();
        if !real.is_empty() {
            model.successors.insert(source.clone(), real.clone());
        }
        for task in real {
            let mut successors: Vec<String> = edges
                .get(task.as_str())
                .map(|s| s.iter().map(|t| t.to_string()).collect())
                .unwrap_or_default();
            successors.push(sink.clone());
            model.successors.insert(task, successors);
        }
    }
}

/// Builds the mode of one activity from its effects.
///
/// Decreases at `start + 0` are consumption. Increases at `end + 0` on a
/// consumed fluent are the matching release and need no record.
fn extract_mode(
    activity: &Activity,
    duration: i64,
    capacities: &BTreeMap<&str, i64>,
    log: &mut DiagnosticLog,
) -> Result<Mode, ConversionError> {
    let start = Timing::start(activity.name.as_str());
    let end = Timing::end(activity.name.as_str());
    let consumed: HashSet<&str> = activity
        .start_effects()
        .filter(|e| e.kind == EffectKind::Decrease)
        .map(|e| e.fluent.as_str())
        .collect();

    let mut mode = Mode::new(duration);
    for timed in &activity.effects {
        let effect = &timed.effect;
        match effect.kind {
            EffectKind::Decrease if timed.timing == start => {
                if !capacities.contains_key(effect.fluent.as_str()) {
                    log.report(
                        DiagnosticKind::UnknownResource,
                        effect.fluent.as_str(),
                        format!(
                            "Activity '{}' consumes unknown resource '{}'",
                            activity.name, effect.fluent
                        ),
                    );
                    continue;
                }
                *mode.consumption.entry(effect.fluent.clone()).or_insert(0) += effect.amount.upper;
            }
            EffectKind::Increase
                if timed.timing == end && consumed.contains(effect.fluent.as_str()) => {}
            kind => log.report(
                DiagnosticKind::UnsupportedEffect,
                activity.name.as_str(),
                format!(
                    "Activity '{}' has {kind:?} effect on '{}' at {}",
                    activity.name, effect.fluent, timed.timing
                ),
            ),
        }
    }

    for (resource, &demand) in &mode.consumption {
        let capacity = capacities.get(resource.as_str()).copied().unwrap_or(0);
        if demand > capacity {
            return Err(ConversionError::DemandExceedsCapacity {
                activity: activity.name.clone(),
                resource: resource.clone(),
                demand,
                capacity,
            });
        }
    }
    Ok(mode)
}
