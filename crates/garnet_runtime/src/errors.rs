//! Errors raised by the runtime.

use garnet_core::{DiagnosticKind, DiagnosticsFormatter, ErrorClass};

use crate::core::Value;

pub type EvalResult<T = Value> = Result<T, RuntimeError>;

/// A raised condition: its exception class, message and the backtrace of the frame that
/// raised it (innermost first).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({class})")]
pub struct RuntimeError {
    pub class: ErrorClass,
    pub kind: DiagnosticKind,
    pub message: String,
    pub backtrace: Vec<String>,
}

impl RuntimeError {
    pub fn new(kind: DiagnosticKind) -> Self {
        Self::with_backtrace(kind, Vec::new())
    }

    pub fn with_backtrace(kind: DiagnosticKind, backtrace: Vec<String>) -> Self {
        let message = DiagnosticsFormatter::format(&kind);
        let class = kind.error_class();
        tracing::trace!(%class, %message, "raise");
        Self {
            class,
            kind,
            message,
            backtrace,
        }
    }

    pub fn raw(class: ErrorClass, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Raw(class, message.into()))
    }

    pub fn is(&self, class: ErrorClass) -> bool {
        self.class == class
    }
}

impl From<DiagnosticKind> for RuntimeError {
    fn from(kind: DiagnosticKind) -> Self {
        Self::new(kind)
    }
}

/// Render an error the way an uncaught exception is reported at top level.
pub fn format_backtrace(err: &RuntimeError) -> String {
    let mut out = String::new();
    if !err.backtrace.is_empty() {
        out.push_str("Traceback (most recent call last):\n");
        for i in (1..err.backtrace.len()).rev() {
            out.push_str(&format!("        {}: from {}\n", i, err.backtrace[i]));
        }
        out.push_str(&err.backtrace[0]);
        out.push_str(": ");
    }
    out.push_str(&format!("{} ({})", err.message, err.class));
    out
}
