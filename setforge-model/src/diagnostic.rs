//! Severity-tagged findings produced while loading or cross-checking a corpus.
//!
//! Diagnostics never block processing of unrelated records. They accumulate
//! during the run and are rendered at the end; the exit status is derived
//! from the highest severities present.

use std::fmt;
use std::path::PathBuf;

// ── Severity ────────────────────────────────────────────────────────────────

/// How serious a finding is. Ordered so thresholds can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Diagnostic ──────────────────────────────────────────────────────────────

/// One finding: severity, message, and whatever provenance is known.
///
/// `subject` is the record label "(species) setname" when the finding is
/// about a specific record; it is filled from the raw document, so it is
/// usable even before the identifier is confirmed unique.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub subject: Option<String>,
    pub path: Option<PathBuf>,
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            subject: None,
            path: None,
            line: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}", path.display())?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
        }
        if let Some(ref subject) = self.subject {
            if self.path.is_some() {
                f.write_str(":")?;
            }
            write!(f, "{subject}")?;
        }
        if self.path.is_some() || self.subject.is_some() {
            f.write_str("> ")?;
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_order_note_warning_error() {
        assert!(Severity::Note < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn display_includes_provenance() {
        let diag = Diagnostic::error("duplicate identifier")
            .with_subject("(25) Defense")
            .with_path("sets/kanto.yaml")
            .with_line(12);
        assert_eq!(
            diag.to_string(),
            "sets/kanto.yaml:12:(25) Defense> ERROR: duplicate identifier"
        );
    }

    #[test]
    fn display_without_provenance_is_bare() {
        let diag = Diagnostic::note("skipping empty document");
        assert_eq!(diag.to_string(), "NOTE: skipping empty document");
    }

    #[test]
    fn display_with_path_only() {
        let diag = Diagnostic::error("cannot parse file").with_path("bad.yaml");
        assert_eq!(diag.to_string(), "bad.yaml> ERROR: cannot parse file");
    }
}
