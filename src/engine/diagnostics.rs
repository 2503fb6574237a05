//! Compile-time diagnostics.
//!
//! The compiler reports what it does to a [`DiagnosticSink`] supplied by the
//! caller. Nothing is reported at match time. The default sink drops every
//! event, so callers that do not care pay nothing beyond a virtual call per
//! directive.

use std::fmt;

/// One compile-time event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic<'a> {
    /// A directive registered a capture group for a field or collection key.
    Binding { directive: &'a str, group: &'a str, target: String },
    /// A directive unknown to the dialect was captured with the default pattern.
    Fallback { directive: &'a str, pattern: &'a str },
    /// A repeated group name was renamed so the later directive keeps its own group.
    GroupRenamed { directive: &'a str, from: &'a str, to: &'a str },
    /// The final pattern was compiled.
    Compiled { spec: &'a str, pattern: &'a str, groups: usize },
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Binding { directive, group, target } => {
                write!(f, "directive '%{directive}': group '{group}' -> {target}")
            }
            Diagnostic::Fallback { directive, pattern } => {
                write!(f, "directive '%{directive}' unknown, using '{pattern}'")
            }
            Diagnostic::GroupRenamed { directive, from, to } => {
                write!(f, "directive '%{directive}': group '{from}' renamed to '{to}'")
            }
            Diagnostic::Compiled { spec, pattern, groups } => {
                write!(f, "compiled '{spec}' into '{pattern}' ({groups} groups)")
            }
        }
    }
}

/// Receiver for compile-time diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: &Diagnostic<'_>);
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _diagnostic: &Diagnostic<'_>) {}
}

/// Sink that forwards events to `tracing`.
///
/// Bindings, fallbacks and renames are `debug!`; the compiled pattern is `info!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: &Diagnostic<'_>) {
        match diagnostic {
            Diagnostic::Compiled { spec, pattern, groups } => {
                tracing::info!(spec = %spec, pattern = %pattern, groups = *groups, "created log format regex");
            }
            Diagnostic::Fallback { .. } => tracing::debug!(target: "accesslog::fallback", "{diagnostic}"),
            _ => tracing::debug!("{diagnostic}"),
        }
    }
}
