//! Development-mode diagnostics collected during a render pass.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Category of a degraded-input diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Icon name not present in the icon table.
    UnknownIcon,
    /// Repeater or carousel collection missing, not a list, or empty.
    EmptySource,
    /// Repeater without `source` or `template`.
    MissingTemplate,
    /// Event action outside the fixed verb set.
    UnknownAction,
    /// Condition operator the evaluator does not know.
    UnknownOperator,
    /// No async runtime available for a timer.
    NoRuntime,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownIcon => "unknown-icon",
            Self::EmptySource => "empty-source",
            Self::MissingTemplate => "missing-template",
            Self::UnknownAction => "unknown-action",
            Self::UnknownOperator => "unknown-operator",
            Self::NoRuntime => "no-runtime",
        })
    }
}

/// One diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,
    /// Human-readable detail.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Sink for one render pass. Always logs; records only when enabled.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    /// Keep records for the render output.
    enabled: bool,
    /// Records so far.
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// New sink; `enabled` mirrors `EngineSettings::diagnostics`.
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            items: Vec::new(),
        }
    }

    /// Log a diagnostic and keep it when enabled.
    pub(crate) fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        warn!(%kind, "{}", message);
        if self.enabled {
            self.items.push(Diagnostic { kind, message });
        }
    }

    /// Drain the collected records.
    pub(crate) fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }
}
