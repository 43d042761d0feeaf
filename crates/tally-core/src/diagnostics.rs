//! # Diagnostics
//!
//! The explicit event channel of a pipeline run.
//!
//! Every component takes `&mut Diagnostics` and records what it could not
//! do (a malformed field, an overwritten folio, a failed query). Each
//! event is also emitted as a `tracing` event, so the binaries get normal
//! log lines while tests assert on [`Diagnostics::events`] directly.

use tracing::{error, info, warn};

/// How bad an event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Folio of the row the event concerns, when there is one.
    pub folio: Option<String>,
    /// Source column the event concerns, when there is one.
    pub field: Option<&'static str>,
}

/// Events of one pipeline run, in emission order.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message.into(), None, None);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into(), None, None);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into(), None, None);
    }

    /// Records a warning about one row.
    pub fn row_warning(&mut self, folio: &str, message: impl Into<String>) {
        self.push(Severity::Warning, message.into(), Some(folio.to_string()), None);
    }

    /// Records a warning about one field of one row.
    pub fn field_warning(&mut self, folio: &str, field: &'static str, message: impl Into<String>) {
        self.push(
            Severity::Warning,
            message.into(),
            Some(folio.to_string()),
            Some(field),
        );
    }

    fn push(
        &mut self,
        severity: Severity,
        message: String,
        folio: Option<String>,
        field: Option<&'static str>,
    ) {
        let diagnostic = Diagnostic {
            severity,
            message,
            folio,
            field,
        };
        emit(&diagnostic);
        self.events.push(diagnostic);
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter().filter(move |d| d.severity == severity)
    }
}

fn emit(diagnostic: &Diagnostic) {
    let folio = diagnostic.folio.as_deref();
    let field = diagnostic.field;
    let message = &diagnostic.message;

    match diagnostic.severity {
        Severity::Info => info!(folio, field, "{}", message),
        Severity::Warning => warn!(folio, field, "{}", message),
        Severity::Error => error!(folio, field, "{}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_keep_order_and_context() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.info("running query");
        diagnostics.field_warning("1001", "Fecha", "invalid date value: \"x\"");
        diagnostics.error("query failed");

        let events = diagnostics.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].severity, Severity::Info);
        assert_eq!(events[1].folio.as_deref(), Some("1001"));
        assert_eq!(events[1].field, Some("Fecha"));
        assert_eq!(events[2].message, "query failed");
    }

    #[test]
    fn test_severity_filters() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert!(!diagnostics.has_errors());

        diagnostics.warn("a");
        diagnostics.row_warning("7", "b");
        assert_eq!(diagnostics.warnings().count(), 2);
        assert!(!diagnostics.has_errors());

        diagnostics.error("c");
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.len(), 3);
    }
}
