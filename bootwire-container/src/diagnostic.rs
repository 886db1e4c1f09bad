//! Non-fatal findings about the wiring state.
//!
//! A [`Diagnostic`] never aborts anything. Injection records `AlreadySet`
//! warnings, validation records missing dependencies, and both end up in a
//! [`DiagnosticSink`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// A field or property already held a value and was left untouched.
    AlreadySet,
    /// An injectable member requires a type no provider covers.
    MissingDependency,
    /// Validation found nothing to report.
    AllValid,
}

/// A single advisory message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
        }
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Emits this diagnostic as a `tracing` event at the matching level.
    pub fn log(&self) {
        match self.severity {
            Severity::Info => info!(code = ?self.code, "{}", self.message),
            Severity::Warning => warn!(code = ?self.code, "{}", self.message),
            Severity::Error => error!(code = ?self.code, "{}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Receives diagnostics as they are produced.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards every diagnostic to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
    }
}

/// Collects diagnostics and optionally mirrors them to `tracing`.
#[derive(Debug, Default)]
pub struct Collector {
    diagnostics: Vec<Diagnostic>,
    mirror: bool,
}

impl Collector {
    pub fn new(mirror: bool) -> Self {
        Self {
            diagnostics: Vec::new(),
            mirror,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for Collector {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if self.mirror {
            diagnostic.log();
        }
        self.diagnostics.push(diagnostic);
    }
}
