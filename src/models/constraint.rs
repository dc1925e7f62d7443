//! Temporal relations and classified scheduling constraints.
//!
//! Relations are raw comparisons between two timings. When a relation is
//! added to a problem it is classified once into a [`Constraint`] variant
//! (precedence, start-at-end, start-together, offset precedence, time
//! window). Relations with no scheduling meaning stay
//! [`Constraint::Unclassified`] so that downstream consumers can report
//! them instead of dropping them.
//!
//! # Time Model
//! Time is integer-valued, so a strict relation `x < y` is normalised to
//! `x + 1 <= y` before classification.
//!
//! # Reference
//! Brucker et al. (1999), "Resource-constrained project scheduling:
//! Notation, classification, models, and methods" (generalized precedences)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Anchor, Timepoint, Timing};

/// Comparison operator of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationOp {
    /// `lhs <= rhs`
    Le,
    /// `lhs < rhs`
    Lt,
    /// `lhs == rhs`
    Eq,
}

/// A binary comparison between two timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub op: RelationOp,
    pub lhs: Timing,
    pub rhs: Timing,
}

impl Relation {
    /// `lhs <= rhs`
    pub fn le(lhs: Timing, rhs: Timing) -> Self {
        Self {
            op: RelationOp::Le,
            lhs,
            rhs,
        }
    }

    /// `lhs < rhs`
    pub fn lt(lhs: Timing, rhs: Timing) -> Self {
        Self {
            op: RelationOp::Lt,
            lhs,
            rhs,
        }
    }

    /// `lhs == rhs`
    pub fn eq(lhs: Timing, rhs: Timing) -> Self {
        Self {
            op: RelationOp::Eq,
            lhs,
            rhs,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            RelationOp::Le => "<=",
            RelationOp::Lt => "<",
            RelationOp::Eq => "==",
        };
        write!(f, "{} {op} {}", self.lhs, self.rhs)
    }
}

/// A classified scheduling constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// `after` cannot start until `before` finishes.
    Precedence { before: String, after: String },

    /// `after` starts exactly when `before` ends.
    StartAtEnd { before: String, after: String },

    /// Both activities start at the same time.
    StartTogether { first: String, second: String },

    /// `after` starts at least `lag` units after the `anchor` side of `before`.
    ///
    /// Zero-lag end-anchored relations are plain [`Constraint::Precedence`].
    OffsetPrecedence {
        anchor: Anchor,
        before: String,
        after: String,
        lag: i64,
    },

    /// The `anchor` side of `activity` lies within [earliest, latest].
    ///
    /// Release dates bound the start from below, deadlines bound the end
    /// from above.
    Window {
        activity: String,
        anchor: Anchor,
        earliest: Option<i64>,
        latest: Option<i64>,
    },

    /// A relation with no scheduling interpretation.
    Unclassified(Relation),
}

impl Constraint {
    /// Creates a zero-delay precedence constraint.
    pub fn precedence(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self::Precedence {
            before: before.into(),
            after: after.into(),
        }
    }

    /// Creates a deadline (latest end) on an activity.
    pub fn deadline(activity: impl Into<String>, time: i64) -> Self {
        Self::Window {
            activity: activity.into(),
            anchor: Anchor::End,
            earliest: None,
            latest: Some(time),
        }
    }

    /// Creates a release date (earliest start) on an activity.
    pub fn release(activity: impl Into<String>, time: i64) -> Self {
        Self::Window {
            activity: activity.into(),
            anchor: Anchor::Start,
            earliest: Some(time),
            latest: None,
        }
    }

    /// Classifies a raw relation.
    ///
    /// Both sides are normalised to `lhs.timepoint + lag (op) rhs.timepoint`
    /// with `lag = lhs.delay - rhs.delay` (plus one for strict relations).
    pub fn classify(relation: Relation) -> Self {
        let lhs = &relation.lhs.timepoint;
        let rhs = &relation.rhs.timepoint;
        let offset = relation.lhs.delay - relation.rhs.delay;

        match relation.op {
            RelationOp::Le | RelationOp::Lt => {
                let lag = if relation.op == RelationOp::Lt {
                    offset + 1
                } else {
                    offset
                };
                match (lhs, rhs) {
                    (Timepoint::End(a), Timepoint::Start(b)) if a != b => {
                        if lag == 0 {
                            Self::precedence(a.as_str(), b.as_str())
                        } else {
                            Self::OffsetPrecedence {
                                anchor: Anchor::End,
                                before: a.clone(),
                                after: b.clone(),
                                lag,
                            }
                        }
                    }
                    (Timepoint::Start(a), Timepoint::Start(b)) if a != b => {
                        Self::OffsetPrecedence {
                            anchor: Anchor::Start,
                            before: a.clone(),
                            after: b.clone(),
                            lag,
                        }
                    }
                    (Timepoint::GlobalStart, tp) => match activity_side(tp) {
                        Some((activity, anchor)) => Self::Window {
                            activity,
                            anchor,
                            earliest: Some(lag),
                            latest: None,
                        },
                        None => Self::Unclassified(relation),
                    },
                    (tp, Timepoint::GlobalStart) => match activity_side(tp) {
                        Some((activity, anchor)) => Self::Window {
                            activity,
                            anchor,
                            earliest: None,
                            latest: Some(-lag),
                        },
                        None => Self::Unclassified(relation),
                    },
                    _ => Self::Unclassified(relation),
                }
            }
            RelationOp::Eq => match (lhs, rhs) {
                (Timepoint::End(a), Timepoint::Start(b))
                | (Timepoint::Start(b), Timepoint::End(a))
                    if a != b && offset == 0 =>
                {
                    Self::StartAtEnd {
                        before: a.clone(),
                        after: b.clone(),
                    }
                }
                (Timepoint::Start(a), Timepoint::Start(b)) if a != b && offset == 0 => {
                    Self::StartTogether {
                        first: a.clone(),
                        second: b.clone(),
                    }
                }
                (Timepoint::GlobalStart, tp) | (tp, Timepoint::GlobalStart) => {
                    match activity_side(tp) {
                        Some((activity, anchor)) => {
                            // tp == global delay - tp delay
                            let time = if relation.lhs.is_global() {
                                offset
                            } else {
                                -offset
                            };
                            Self::Window {
                                activity,
                                anchor,
                                earliest: Some(time),
                                latest: Some(time),
                            }
                        }
                        None => Self::Unclassified(relation),
                    }
                }
                _ => Self::Unclassified(relation),
            },
        }
    }

    /// Activity names referenced by this constraint.
    pub fn activities(&self) -> Vec<&str> {
        match self {
            Self::Precedence { before, after }
            | Self::StartAtEnd { before, after }
            | Self::OffsetPrecedence { before, after, .. } => vec![before, after],
            Self::StartTogether { first, second } => vec![first, second],
            Self::Window { activity, .. } => vec![activity],
            Self::Unclassified(relation) => [&relation.lhs, &relation.rhs]
                .iter()
                .filter_map(|t| t.timepoint.activity())
                .collect(),
        }
    }
}

fn activity_side(tp: &Timepoint) -> Option<(String, Anchor)> {
    Some((tp.activity()?.to_string(), tp.anchor()?))
}

impl From<Relation> for Constraint {
    fn from(relation: Relation) -> Self {
        Self::classify(relation)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precedence { before, after } => write!(f, "end({before}) <= start({after})"),
            Self::StartAtEnd { before, after } => write!(f, "end({before}) == start({after})"),
            Self::StartTogether { first, second } => {
                write!(f, "start({first}) == start({second})")
            }
            Self::OffsetPrecedence {
                anchor,
                before,
                after,
                lag,
            } => {
                let side = match anchor {
                    Anchor::Start => "start",
                    Anchor::End => "end",
                };
                write!(f, "{side}({before}) + {lag} <= start({after})")
            }
            Self::Window {
                activity,
                anchor,
                earliest,
                latest,
            } => {
                let side = match anchor {
                    Anchor::Start => "start",
                    Anchor::End => "end",
                };
                write!(f, "{side}({activity}) in [{earliest:?}, {latest:?}]")
            }
            Self::Unclassified(relation) => write!(f, "{relation}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_precedence() {
        let c = Constraint::classify(Relation::le(Timing::end("A"), Timing::start("B")));
        assert_eq!(c, Constraint::precedence("A", "B"));
    }

    #[test]
    fn test_classify_precedence_with_balanced_delays() {
        let c = Constraint::classify(Relation::le(
            Timing::end("A").plus(2),
            Timing::start("B").plus(2),
        ));
        assert_eq!(c, Constraint::precedence("A", "B"));
    }

    #[test]
    fn test_classify_strict_precedence_adds_one() {
        let c = Constraint::classify(Relation::lt(Timing::end("A"), Timing::start("B")));
        match c {
            Constraint::OffsetPrecedence {
                anchor,
                before,
                after,
                lag,
            } => {
                assert_eq!(anchor, Anchor::End);
                assert_eq!(before, "A");
                assert_eq!(after, "B");
                assert_eq!(lag, 1);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_classify_start_after_nunit() {
        let c = Constraint::classify(Relation::le(Timing::start("A").plus(4), Timing::start("B")));
        match c {
            Constraint::OffsetPrecedence { anchor, lag, .. } => {
                assert_eq!(anchor, Anchor::Start);
                assert_eq!(lag, 4);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_classify_equalities() {
        let c = Constraint::classify(Relation::eq(Timing::start("A"), Timing::start("B")));
        assert_eq!(
            c,
            Constraint::StartTogether {
                first: "A".into(),
                second: "B".into()
            }
        );

        let c = Constraint::classify(Relation::eq(Timing::start("B"), Timing::end("A")));
        assert_eq!(
            c,
            Constraint::StartAtEnd {
                before: "A".into(),
                after: "B".into()
            }
        );
    }

    #[test]
    fn test_classify_windows() {
        let deadline = Constraint::classify(Relation::le(Timing::end("A"), Timing::global(10)));
        assert_eq!(deadline, Constraint::deadline("A", 10));

        let release = Constraint::classify(Relation::le(Timing::global(3), Timing::start("A")));
        assert_eq!(release, Constraint::release("A", 3));

        let pinned = Constraint::classify(Relation::eq(Timing::start("A"), Timing::global(7)));
        assert_eq!(
            pinned,
            Constraint::Window {
                activity: "A".into(),
                anchor: Anchor::Start,
                earliest: Some(7),
                latest: Some(7),
            }
        );
    }

    #[test]
    fn test_classify_unsupported_shapes() {
        // Self-precedence and end-to-end relations have no RCPSP counterpart
        let self_rel = Relation::le(Timing::end("A"), Timing::start("A"));
        assert!(matches!(
            Constraint::classify(self_rel),
            Constraint::Unclassified(_)
        ));

        let end_end = Relation::le(Timing::end("A"), Timing::end("B"));
        let c = Constraint::classify(end_end);
        assert!(matches!(c, Constraint::Unclassified(_)));
        assert_eq!(c.activities(), vec!["A", "B"]);

        let offset_eq = Relation::eq(Timing::end("A").plus(2), Timing::start("B"));
        assert!(matches!(
            Constraint::classify(offset_eq),
            Constraint::Unclassified(_)
        ));
    }

    #[test]
    fn test_constraint_display() {
        assert_eq!(
            Constraint::precedence("A", "B").to_string(),
            "end(A) <= start(B)"
        );
    }
}
