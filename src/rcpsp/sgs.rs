//! Serial schedule generation scheme (SGS).
//!
//! # Algorithm
//!
//! 1. Walk the priority list; pick the first task whose predecessors and
//!    generalized-precedence reference tasks are all scheduled.
//! 2. Bound its start: latest predecessor end, start/end windows and
//!    generalized precedences give `[earliest, latest]`; `start_at_end`
//!    and `start_together` pin it to a single instant.
//! 3. Shift right inside the bounds until every consumed resource has
//!    enough residual capacity over the whole task duration.
//! 4. Reserve the capacity and repeat.
//!
//! The result satisfies every constraint of the model but is not optimal.
//! A task that finds no slot inside its bounds aborts the decoding.
//!
//! # Complexity
//! O(n² + n * (H * r + s)) where n=tasks, H=horizon, r=resources per task,
//! s=special constraints.
//!
//! # Reference
//! Kolisch (1996), "Serial and parallel resource-constrained project
//! scheduling methods revisited: Theory and computation"

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{CapacityCalendar, Mode, RcpspModel, RcpspSolution, TaskWindow};

/// Decodes a priority list into a schedule.
///
/// Returns `None` when a task cannot be placed inside the horizon or its
/// windows, when a task lacks mode details, when pinned starts conflict, or
/// when the precedence graph (special constraints included) is cyclic.
pub fn serial_schedule(model: &RcpspModel, order: &[&str]) -> Option<RcpspSolution> {
    let preds = model.predecessors();
    let waits_for = references(model);
    let mut residual: BTreeMap<&str, CapacityCalendar> = model
        .resources
        .iter()
        .map(|(name, cal)| (name.as_str(), cal.clone()))
        .collect();
    let mut placed: HashMap<&str, TaskWindow> = HashMap::new();
    let mut pending: Vec<&str> = order.to_vec();

    while !pending.is_empty() {
        let Some(idx) = pending.iter().position(|task| {
            let ready = |deps: Option<&Vec<&str>>| {
                deps.map_or(true, |ps| ps.iter().all(|p| placed.contains_key(p)))
            };
            ready(preds.get(task)) && ready(waits_for.get(task))
        }) else {
            debug!(remaining = pending.len(), "no eligible task, precedence graph is cyclic");
            return None;
        };
        let task = pending.remove(idx);
        let mode = model.mode(task)?;
        let duration = usize::try_from(mode.duration).ok()?;

        let bounds = start_bounds(model, task, mode.duration, &preds, &placed)?;
        let Some(start) = find_slot(&residual, mode, &bounds, model.horizon) else {
            debug!(task, ?bounds, "no slot inside the start bounds");
            return None;
        };

        for (resource, &amount) in &mode.consumption {
            if amount > 0 {
                if let Some(cal) = residual.get_mut(resource.as_str()) {
                    cal.consume(start, duration, amount);
                }
            }
        }

        let start = start as i64;
        placed.insert(task, TaskWindow::new(start, start + mode.duration));
    }

    let mut solution = RcpspSolution::new();
    for (task, window) in placed {
        solution.insert(task, window.start, window.end);
    }
    Some(solution)
}

/// Task → tasks its generalized precedences refer to.
fn references(model: &RcpspModel) -> HashMap<&str, Vec<&str>> {
    let special = &model.special_constraints;
    let mut refs: HashMap<&str, Vec<&str>> = HashMap::new();
    let pairs = special
        .start_together
        .iter()
        .chain(&special.start_at_end)
        .map(|(a, b)| (a, b))
        .chain(special.start_at_end_plus_offset.iter().map(|(a, b, _)| (a, b)))
        .chain(special.start_after_nunit.iter().map(|(a, b, _)| (a, b)));
    for (before, after) in pairs {
        refs.entry(after.as_str()).or_default().push(before.as_str());
    }
    refs
}

/// Admissible start instants of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StartBounds {
    earliest: i64,
    latest: Option<i64>,
    pinned: Option<i64>,
}

impl StartBounds {
    fn pin(&mut self, at: i64) -> Option<()> {
        match self.pinned {
            Some(p) if p != at => None,
            _ => {
                self.pinned = Some(at);
                Some(())
            }
        }
    }

    fn cap(&mut self, latest: i64) {
        self.latest = Some(self.latest.map_or(latest, |l| l.min(latest)));
    }
}

/// Start bounds of `task` given the already placed tasks.
///
/// Returns `None` when two pinned starts disagree.
fn start_bounds(
    model: &RcpspModel,
    task: &str,
    duration: i64,
    preds: &HashMap<&str, Vec<&str>>,
    placed: &HashMap<&str, TaskWindow>,
) -> Option<StartBounds> {
    let mut bounds = StartBounds {
        earliest: preds
            .get(task)
            .into_iter()
            .flatten()
            .filter_map(|p| placed.get(p))
            .map(|w| w.end)
            .max()
            .unwrap_or(0),
        latest: None,
        pinned: None,
    };

    let special = &model.special_constraints;
    if let Some(&(earliest, latest)) = special.start_times_window.get(task) {
        if let Some(e) = earliest {
            bounds.earliest = bounds.earliest.max(e);
        }
        if let Some(l) = latest {
            bounds.cap(l);
        }
    }
    if let Some(&(earliest, latest)) = special.end_times_window.get(task) {
        if let Some(e) = earliest {
            bounds.earliest = bounds.earliest.max(e - duration);
        }
        if let Some(l) = latest {
            bounds.cap(l - duration);
        }
    }

    for (before, after, lag) in &special.start_at_end_plus_offset {
        if after == task {
            if let Some(w) = placed.get(before.as_str()) {
                bounds.earliest = bounds.earliest.max(w.end + lag);
            }
        }
    }
    for (before, after, lag) in &special.start_after_nunit {
        if after == task {
            if let Some(w) = placed.get(before.as_str()) {
                bounds.earliest = bounds.earliest.max(w.start + lag);
            }
        }
    }
    for (first, second) in &special.start_at_end {
        if second == task {
            if let Some(w) = placed.get(first.as_str()) {
                bounds.pin(w.end)?;
            }
        }
    }
    for (first, second) in &special.start_together {
        if second == task {
            if let Some(w) = placed.get(first.as_str()) {
                bounds.pin(w.start)?;
            }
        }
    }

    bounds.earliest = bounds.earliest.max(0);
    Some(bounds)
}

/// First start inside `bounds` where all consumed resources fit.
fn find_slot(
    residual: &BTreeMap<&str, CapacityCalendar>,
    mode: &Mode,
    bounds: &StartBounds,
    horizon: usize,
) -> Option<usize> {
    let duration = usize::try_from(mode.duration).ok()?;
    let mut last = horizon.checked_sub(duration)?;
    if let Some(latest) = bounds.latest {
        last = last.min(usize::try_from(latest).ok()?);
    }
    let first = match bounds.pinned {
        Some(pin) if pin < bounds.earliest => return None,
        Some(pin) => {
            let pin = usize::try_from(pin).ok()?;
            last = last.min(pin);
            pin
        }
        None => usize::try_from(bounds.earliest).ok()?,
    };

    (first..=last).find(|&t| {
        mode.consumption.iter().all(|(resource, &amount)| {
            amount <= 0
                || residual
                    .get(resource.as_str())
                    .is_some_and(|cal| cal.can_host(t, duration, amount))
        })
    })
}
