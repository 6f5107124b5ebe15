//! Data-quality findings raised while building fonts.
//!
//! Malformed font dictionaries are common in the wild and never abort
//! construction. Each finding is handed to a [`Diagnostics`] sink supplied by
//! the caller, so the font core itself writes to no global state.

use std::cell::RefCell;
use std::fmt;

/// Category of a data-quality finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A field the format requires is absent (e.g. /FirstChar next to /Widths)
    MissingRequiredField,
    /// A field is present but has the wrong shape
    MalformedEntry,
    /// An indirect reference could not be resolved
    UnresolvedReference,
    /// An embedded program or CMap could not be used
    UnsupportedProgram,
}

/// One finding about one font.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// BaseFont of the font being built, or "<unnamed>"
    pub font: String,
    /// Category
    pub kind: DiagnosticKind,
    /// Human-readable detail
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font '{}': {:?}: {}", self.font, self.kind, self.message)
    }
}

/// Sink for construction findings.
pub trait Diagnostics {
    /// Record a finding.
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards every finding to `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}

/// Keeps findings in memory for later inspection.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    findings: RefCell<Vec<Diagnostic>>,
}

impl CollectedDiagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All findings recorded so far.
    pub fn findings(&self) -> Vec<Diagnostic> {
        self.findings.borrow().clone()
    }

    /// Whether any finding of `kind` was recorded.
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.findings.borrow().iter().any(|d| d.kind == kind)
    }

    /// Number of findings recorded.
    pub fn len(&self) -> usize {
        self.findings.borrow().len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.findings.borrow().is_empty()
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        log::debug!("{}", diagnostic);
        self.findings.borrow_mut().push(diagnostic);
    }
}

/// Binds a sink to the font currently being built.
#[derive(Clone, Copy)]
pub(crate) struct Reporter<'a> {
    font: &'a str,
    sink: &'a dyn Diagnostics,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(font: &'a str, sink: &'a dyn Diagnostics) -> Self {
        Self { font, sink }
    }

    pub(crate) fn report(&self, kind: DiagnosticKind, message: impl Into<String>) {
        self.sink.report(Diagnostic {
            font: self.font.to_string(),
            kind,
            message: message.into(),
        });
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            font: "Helvetica".to_string(),
            kind,
            message: "FirstChar missing".to_string(),
        }
    }

    #[test]
    fn test_collected_diagnostics_records_in_order() {
        let sink = CollectedDiagnostics::new();
        assert!(sink.is_empty());

        sink.report(finding(DiagnosticKind::MissingRequiredField));
        sink.report(finding(DiagnosticKind::MalformedEntry));

        assert_eq!(sink.len(), 2);
        assert!(sink.has(DiagnosticKind::MissingRequiredField));
        assert!(!sink.has(DiagnosticKind::UnsupportedProgram));
        assert_eq!(sink.findings()[1].kind, DiagnosticKind::MalformedEntry);
    }

    #[test]
    fn test_reporter_tags_font_name() {
        let sink = CollectedDiagnostics::new();
        Reporter::new("F1", &sink).report(DiagnosticKind::UnresolvedReference, "7 0 R");

        let findings = sink.findings();
        assert_eq!(findings[0].font, "F1");
        assert_eq!(findings[0].message, "7 0 R");
    }

    #[test]
    fn test_diagnostic_display() {
        let text = finding(DiagnosticKind::MissingRequiredField).to_string();
        assert_eq!(
            text,
            "font 'Helvetica': MissingRequiredField: FirstChar missing"
        );
    }
}
