//! Diagnostics collected while converting a document
//!
//! Almost every problem found in a LyX source is recoverable: an unknown command, a
//! missing ending, a reference to a label that never appears. These are recorded here
//! with the source line they refer to and the conversion keeps going. Only a truncated
//! input inside a required read is fatal, see [`crate::lyx::error::ParseError`].
//!
//! Each reported diagnostic is also forwarded to the `log` facade so that the command
//! line tool shows them as they happen.

use crate::lyx::error::format_source_context;
use serde::Serialize;
use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
        }
    }
}

/// A single problem found in the source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// 1-based source line, 0 when the problem is not tied to a line
    pub line: usize,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub code: Option<String>,
}

impl Diagnostic {
    pub fn new(line: usize, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            line,
            severity,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// `origin: diagnostic`, followed by the source lines around it when it has a line
    pub fn describe(&self, origin: &str, source: &str) -> String {
        let mut out = format!("{}: {}\n", origin, self);
        if self.line > 0 {
            out.push_str(&format_source_context(source, self.line));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "{} [line {}]: {}", self.severity, self.line, self.message)
        } else {
            write!(f, "{}: {}", self.severity, self.message)
        }
    }
}

/// Ordered collection of diagnostics for one conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            DiagnosticSeverity::Error => log::error!("{}", diagnostic),
            DiagnosticSeverity::Warning => log::warn!("{}", diagnostic),
            DiagnosticSeverity::Information => log::info!("{}", diagnostic),
        }
        self.items.push(diagnostic);
    }

    pub fn error(&mut self, line: usize, code: &str, message: impl Into<String>) {
        self.report(Diagnostic::new(line, DiagnosticSeverity::Error, message).with_code(code));
    }

    pub fn warning(&mut self, line: usize, code: &str, message: impl Into<String>) {
        self.report(Diagnostic::new(line, DiagnosticSeverity::Warning, message).with_code(code));
    }

    pub fn info(&mut self, line: usize, code: &str, message: impl Into<String>) {
        self.report(
            Diagnostic::new(line, DiagnosticSeverity::Information, message).with_code(code),
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All diagnostics carrying the given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.items
            .iter()
            .filter(move |d| d.code.as_deref() == Some(code))
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.with_code(code).next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
    }
}
