//! Conversion diagnostics.
//!
//! Input the RCPSP model cannot express is reported, never dropped. Each
//! diagnostic is logged at `warn` level when recorded and returned to the
//! caller with the converted model.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Category of unsupported input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A relation with no scheduling interpretation.
    UnclassifiedConstraint,
    /// A constraint names an activity absent from the problem.
    UnknownActivity,
    /// A generalized constraint while special constraints are disabled.
    SpecialConstraintsDisabled,
    /// An effect targets a fluent that is not a known resource.
    UnknownResource,
    /// An effect shape with no RCPSP counterpart.
    UnsupportedEffect,
}

/// A construct that was left out of the converted model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Activity, fluent or constraint concerned.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

/// Accumulates diagnostics during one conversion.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    /// Records and logs a diagnostic.
    pub(crate) fn report(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic::new(kind, subject, message);
        warn!(kind = ?diagnostic.kind, subject = %diagnostic.subject, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    pub(crate) fn into_inner(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_collects_in_order() {
        let mut log = DiagnosticLog::default();
        log.report(DiagnosticKind::UnknownActivity, "X", "first");
        log.report(DiagnosticKind::UnsupportedEffect, "A", "second");

        let entries = log.into_inner();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].subject, "X");
        assert_eq!(entries[1].kind, DiagnosticKind::UnsupportedEffect);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::new(DiagnosticKind::UnknownResource, "R", "unknown 'R'");
        assert_eq!(d.to_string(), "[UnknownResource] unknown 'R'");
    }
}
