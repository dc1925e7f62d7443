//! Dense resource capacity calendars.
//!
//! RCPSP solvers consume resource availability as one capacity value per
//! discrete time unit up to the horizon. Calendars are therefore
//! materialised arrays, not symbolic windows.
//!
//! # Time Model
//! Index `t` holds the capacity available during [t, t+1).

use serde::{Deserialize, Serialize};

/// Capacity of one resource at every time unit of the horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityCalendar {
    values: Vec<i64>,
}

/// A maximal interval [start, end) where capacity is below the calendar maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unavailability {
    /// Interval start (inclusive).
    pub start: usize,
    /// Interval end (exclusive).
    pub end: usize,
    /// Units missing with respect to the maximum.
    pub amount: i64,
}

impl CapacityCalendar {
    /// A calendar with the same capacity everywhere.
    pub fn constant(capacity: i64, horizon: usize) -> Self {
        Self {
            values: vec![capacity; horizon],
        }
    }

    /// Wraps explicit per-unit capacities.
    pub fn from_values(values: Vec<i64>) -> Self {
        Self { values }
    }

    /// Permanent step change: adds `delta` to every index from `from` to the end.
    ///
    /// A step at or beyond the horizon has no effect.
    pub fn apply_step(&mut self, from: usize, delta: i64) {
        if let Some(tail) = self.values.get_mut(from..) {
            for v in tail {
                *v += delta;
            }
        }
    }

    /// Capacity at a time unit.
    #[inline]
    pub fn at(&self, t: usize) -> Option<i64> {
        self.values.get(t).copied()
    }

    /// Raw capacity values.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Horizon length.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the calendar covers no time at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest capacity over the horizon (0 if empty).
    pub fn max(&self) -> i64 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    /// Smallest capacity over the horizon (0 if empty).
    pub fn min(&self) -> i64 {
        self.values.iter().copied().min().unwrap_or(0)
    }

    /// First index whose capacity is negative.
    pub fn first_negative(&self) -> Option<usize> {
        self.values.iter().position(|&v| v < 0)
    }

    /// First index whose capacity exceeds `bound`.
    pub fn first_above(&self, bound: i64) -> Option<usize> {
        self.values.iter().position(|&v| v > bound)
    }

    /// Whether `demand` units are available during [start, start + duration).
    ///
    /// Intervals that leave the horizon never fit.
    pub fn can_host(&self, start: usize, duration: usize, demand: i64) -> bool {
        match self.values.get(start..start + duration) {
            Some(slice) => slice.iter().all(|&v| v >= demand),
            None => false,
        }
    }

    /// Removes `demand` units during [start, start + duration), clipped to the horizon.
    pub fn consume(&mut self, start: usize, duration: usize, demand: i64) {
        let end = (start + duration).min(self.values.len());
        if let Some(slice) = self.values.get_mut(start.min(end)..end) {
            for v in slice {
                *v -= demand;
            }
        }
    }

    /// Maximal intervals where capacity is below the maximum.
    ///
    /// A new interval starts whenever the missing amount changes, so each
    /// interval has a constant `amount`.
    pub fn unavailability_windows(&self) -> Vec<Unavailability> {
        let max = self.max();
        let mut windows = Vec::new();
        let mut current: Option<Unavailability> = None;

        for (t, &v) in self.values.iter().enumerate() {
            let missing = max - v;
            if let Some(w) = current.as_mut() {
                if w.amount == missing {
                    w.end = t + 1;
                    continue;
                }
            }
            if let Some(w) = current.take() {
                windows.push(w);
            }
            if missing > 0 {
                current = Some(Unavailability {
                    start: t,
                    end: t + 1,
                    amount: missing,
                });
            }
        }
        if let Some(w) = current {
            windows.push(w);
        }

        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_constant_calendar() {
        let cal = CapacityCalendar::constant(3, 10);
        assert_eq!(cal.len(), 10);
        assert_eq!(cal.at(0), Some(3));
        assert_eq!(cal.at(9), Some(3));
        assert_eq!(cal.at(10), None);
        assert_eq!(cal.max(), 3);
        assert_eq!(cal.min(), 3);
    }

    #[test]
    fn test_step_is_permanent() {
        let mut cal = CapacityCalendar::constant(3, 10);
        cal.apply_step(4, -2);
        assert_eq!(cal.values(), &[3, 3, 3, 3, 1, 1, 1, 1, 1, 1]);

        cal.apply_step(7, 2);
        assert_eq!(cal.values(), &[3, 3, 3, 3, 1, 1, 1, 3, 3, 3]);
    }

    #[test]
    fn test_step_beyond_horizon_is_noop() {
        let mut cal = CapacityCalendar::constant(2, 5);
        cal.apply_step(5, -1);
        cal.apply_step(100, -1);
        assert_eq!(cal.values(), &[2; 5]);
    }

    #[test]
    fn test_bound_checks() {
        let mut cal = CapacityCalendar::constant(1, 4);
        cal.apply_step(2, -2);
        assert_eq!(cal.first_negative(), Some(2));
        cal.apply_step(0, 3);
        assert_eq!(cal.first_above(3), Some(0));
        assert_eq!(cal.first_above(4), None);
    }

    #[test]
    fn test_can_host_and_consume() {
        let mut cal = CapacityCalendar::constant(3, 10);
        assert!(cal.can_host(0, 5, 2));
        cal.consume(0, 5, 2);
        assert!(!cal.can_host(3, 4, 2));
        assert!(cal.can_host(5, 5, 3));
        // leaves the horizon
        assert!(!cal.can_host(8, 5, 1));
        // zero-length intervals fit anywhere inside the horizon
        assert!(cal.can_host(10, 0, 5));
    }

    #[test]
    fn test_unavailability_windows() {
        let mut cal = CapacityCalendar::constant(3, 12);
        cal.apply_step(2, -1);
        cal.apply_step(4, 1);
        cal.apply_step(6, -3);
        cal.apply_step(8, 1);
        cal.apply_step(9, 2);

        assert_eq!(
            cal.unavailability_windows(),
            vec![
                Unavailability { start: 2, end: 4, amount: 1 },
                Unavailability { start: 6, end: 8, amount: 3 },
                Unavailability { start: 8, end: 9, amount: 2 },
            ]
        );
    }

    #[test]
    fn test_unavailability_until_horizon() {
        let mut cal = CapacityCalendar::constant(2, 6);
        cal.apply_step(4, -1);
        // The maximum still occurs before t=4, so the tail is a window
        assert_eq!(
            cal.unavailability_windows(),
            vec![Unavailability { start: 4, end: 6, amount: 1 }]
        );
    }

    proptest! {
        #[test]
        fn prop_single_decrease_splits_calendar(
            capacity in 1i64..50,
            amount in 0i64..50,
            horizon in 1usize..300,
            t in 0usize..400,
        ) {
            let mut cal = CapacityCalendar::constant(capacity, horizon);
            cal.apply_step(t, -amount);
            for (i, &v) in cal.values().iter().enumerate() {
                if i < t {
                    prop_assert_eq!(v, capacity);
                } else {
                    prop_assert_eq!(v, capacity - amount);
                }
            }
        }
    }
}
