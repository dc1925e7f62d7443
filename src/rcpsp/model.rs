//! RCPSP model.
//!
//! The resource-constrained project scheduling problem is described by a
//! task list, per-task execution modes (duration and resource consumption),
//! a successor graph, and one capacity calendar per renewable resource.
//! Synthetic zero-duration source and sink tasks anchor the graph.
//!
//! # Reference
//! Kolisch & Sprecher (1997), "PSPLIB - A project scheduling problem library"

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{sgs, CapacityCalendar, RcpspSolution, SolutionEvaluation};

/// Key of the single mode produced by conversion.
pub const DEFAULT_MODE: u32 = 1;

/// One way of executing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    /// Processing time.
    pub duration: i64,
    /// Resource name → units held during the whole task.
    pub consumption: BTreeMap<String, i64>,
}

impl Mode {
    /// Creates a mode with no resource consumption.
    pub fn new(duration: i64) -> Self {
        Self {
            duration,
            consumption: BTreeMap::new(),
        }
    }

    /// Builder: consumes `amount` units of `resource`.
    pub fn with_consumption(mut self, resource: impl Into<String>, amount: i64) -> Self {
        self.consumption.insert(resource.into(), amount);
        self
    }

    /// Units of `resource` consumed (0 if none).
    pub fn demand(&self, resource: &str) -> i64 {
        self.consumption.get(resource).copied().unwrap_or(0)
    }
}

/// Generalized temporal constraints beyond plain precedences.
///
/// Windows are `(earliest, latest)` pairs; `None` leaves a side open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialConstraints {
    /// `start(a) == start(b)`
    pub start_together: Vec<(String, String)>,
    /// `start(b) == end(a)`
    pub start_at_end: Vec<(String, String)>,
    /// `start(b) >= end(a) + lag`
    pub start_at_end_plus_offset: Vec<(String, String, i64)>,
    /// `start(b) >= start(a) + lag`
    pub start_after_nunit: Vec<(String, String, i64)>,
    /// Task → (earliest start, latest start).
    pub start_times_window: BTreeMap<String, (Option<i64>, Option<i64>)>,
    /// Task → (earliest end, latest end).
    pub end_times_window: BTreeMap<String, (Option<i64>, Option<i64>)>,
}

impl SpecialConstraints {
    /// Whether no special constraint is recorded.
    pub fn is_empty(&self) -> bool {
        self.start_together.is_empty()
            && self.start_at_end.is_empty()
            && self.start_at_end_plus_offset.is_empty()
            && self.start_after_nunit.is_empty()
            && self.start_times_window.is_empty()
            && self.end_times_window.is_empty()
    }

    /// Tightens the start window of a task.
    pub fn restrict_start(&mut self, task: &str, earliest: Option<i64>, latest: Option<i64>) {
        merge_window(&mut self.start_times_window, task, earliest, latest);
    }

    /// Tightens the end window of a task.
    pub fn restrict_end(&mut self, task: &str, earliest: Option<i64>, latest: Option<i64>) {
        merge_window(&mut self.end_times_window, task, earliest, latest);
    }

    /// Earliest start allowed by the start window.
    pub fn earliest_start(&self, task: &str) -> Option<i64> {
        self.start_times_window.get(task).and_then(|w| w.0)
    }
}

/// Intersects a new window with an existing one (max of lowers, min of uppers).
fn merge_window(
    windows: &mut BTreeMap<String, (Option<i64>, Option<i64>)>,
    task: &str,
    earliest: Option<i64>,
    latest: Option<i64>,
) {
    let entry = windows.entry(task.to_string()).or_insert((None, None));
    entry.0 = match (entry.0, earliest) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };
    entry.1 = match (entry.1, latest) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
}

/// A single- or multi-mode RCPSP instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcpspModel {
    /// All tasks: source first, sink last.
    pub tasks_list: Vec<String>,
    /// Synthetic origin task.
    pub source_task: String,
    /// Synthetic terminal task.
    pub sink_task: String,
    /// Task → mode id → mode.
    pub mode_details: HashMap<String, BTreeMap<u32, Mode>>,
    /// Task → tasks that may start only after it completes.
    pub successors: HashMap<String, Vec<String>>,
    /// Renewable resource → capacity calendar.
    pub resources: BTreeMap<String, CapacityCalendar>,
    /// Names of non-renewable resources.
    pub non_renewable_resources: Vec<String>,
    /// Number of discrete time units covered by calendars.
    pub horizon: usize,
    /// Generalized precedences and time windows.
    pub special_constraints: SpecialConstraints,
}

impl RcpspModel {
    /// Creates an empty model with anchors and a horizon.
    pub fn new(source_task: impl Into<String>, sink_task: impl Into<String>, horizon: usize) -> Self {
        let source_task = source_task.into();
        let sink_task = sink_task.into();
        let mut mode_details = HashMap::new();
        mode_details.insert(source_task.clone(), single_mode(Mode::new(0)));
        mode_details.insert(sink_task.clone(), single_mode(Mode::new(0)));
        let mut successors = HashMap::new();
        successors.insert(source_task.clone(), vec![sink_task.clone()]);
        successors.insert(sink_task.clone(), Vec::new());

        Self {
            tasks_list: vec![source_task.clone(), sink_task.clone()],
            source_task,
            sink_task,
            mode_details,
            successors,
            resources: BTreeMap::new(),
            non_renewable_resources: Vec::new(),
            horizon,
            special_constraints: SpecialConstraints::default(),
        }
    }

    /// Whether a task is the source or the sink.
    pub fn is_anchor(&self, task: &str) -> bool {
        task == self.source_task || task == self.sink_task
    }

    /// Non-anchor tasks in list order.
    pub fn real_tasks(&self) -> impl Iterator<Item = &str> {
        self.tasks_list
            .iter()
            .map(String::as_str)
            .filter(move |t| !self.is_anchor(t))
    }

    /// The default mode of a task (mode 1, or the lowest mode id).
    pub fn mode(&self, task: &str) -> Option<&Mode> {
        let modes = self.mode_details.get(task)?;
        modes
            .get(&DEFAULT_MODE)
            .or_else(|| modes.values().next())
    }

    /// Duration of a task's default mode.
    pub fn duration(&self, task: &str) -> Option<i64> {
        self.mode(task).map(|m| m.duration)
    }

    /// Direct successors of a task.
    pub fn successors_of(&self, task: &str) -> &[String] {
        self.successors.get(task).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Inverse of the successor map.
    pub fn predecessors(&self) -> HashMap<&str, Vec<&str>> {
        let mut preds: HashMap<&str, Vec<&str>> = self
            .tasks_list
            .iter()
            .map(|t| (t.as_str(), Vec::new()))
            .collect();
        for task in &self.tasks_list {
            for succ in self.successors_of(task) {
                preds.entry(succ.as_str()).or_default().push(task.as_str());
            }
        }
        preds
    }

    /// Resource names in sorted order.
    pub fn resources_list(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    }

    /// Largest capacity of a resource over the horizon.
    pub fn max_capacity(&self, resource: &str) -> Option<i64> {
        self.resources.get(resource).map(CapacityCalendar::max)
    }

    /// A feasible (not necessarily good) schedule.
    ///
    /// Decodes `tasks_list` with the serial schedule generation scheme.
    /// Returns `None` if some task cannot be placed inside the horizon.
    pub fn dummy_solution(&self) -> Option<RcpspSolution> {
        let order: Vec<&str> = self.tasks_list.iter().map(String::as_str).collect();
        sgs::serial_schedule(self, &order)
    }

    /// Checks a solution against this model.
    pub fn evaluate(&self, solution: &RcpspSolution) -> SolutionEvaluation {
        SolutionEvaluation::evaluate(self, solution)
    }
}

/// Wraps a mode as the only mode of a task.
pub fn single_mode(mode: Mode) -> BTreeMap<u32, Mode> {
    let mut modes = BTreeMap::new();
    modes.insert(DEFAULT_MODE, mode);
    modes
}
