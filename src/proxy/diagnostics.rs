//! Diagnostics for proxy strings that could not be used.
//!
//! The transformer never returns an error. When a proxy string fails to
//! parse, or a rule's prefix is not a valid pattern, it reports a
//! [`Diagnostic`] to its [`DiagnosticSink`] and carries on.

use std::fmt;

use crate::error::ProxyEnvError;

pub const DIAGNOSTIC_TAG: &str = "[proxy-from-env]";

#[derive(Debug)]
pub struct Diagnostic {
    /// The raw proxy string, or the offending prefix for pattern errors.
    pub input: String,
    pub error: ProxyEnvError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.error {
            ProxyEnvError::InvalidPattern { .. } => "Failed to compile proxy prefix.",
            _ => "Failed to parse proxy string.",
        };
        write!(
            f,
            "{DIAGNOSTIC_TAG} {what}\n  Input: {}\n  Error: {}",
            self.input, self.error
        )
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Writes each diagnostic to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&self, diagnostic: &Diagnostic) {
        eprintln!("{diagnostic}");
    }
}

/// Emits each diagnostic as a `tracing` error event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic.error {
            ProxyEnvError::InvalidPattern { .. } => tracing::error!(
                prefix = %diagnostic.input,
                error = %diagnostic.error,
                "proxy rule skipped, prefix is not a valid pattern"
            ),
            _ => tracing::error!(
                input = %diagnostic.input,
                error = %diagnostic.error,
                "failed to parse proxy string"
            ),
        }
    }
}
