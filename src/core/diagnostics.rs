//! # Diagnostics
//!
//! Configuration and execution problems are reported through a [`DiagnosticSink`]
//! instead of being printed directly, so the caller decides whether they end up in
//! the log, in a list, or both.

use thiserror::Error;

/// A reportable problem, each with a stable code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Value {value} for switch '{switch}' is out of range [{min}, {max}].")]
    OutOfRange {
        switch: String,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("Value '{value}' is not a valid choice for property '{property}'.")]
    UnmappedValue { property: String, value: String },
    #[error("Switch '{switch}' requires property '{property}' to be set.")]
    MissingRequiredArgument { switch: String, property: String },
    #[error("Tool '{tool}' exited with code {exit_code}. Command line: {command_line}")]
    ToolFailed {
        tool: String,
        command_line: String,
        exit_code: i32,
    },
    #[error(
        "Tool '{tool}' was denied access (exit code {exit_code}). Command line: {command_line}"
    )]
    AccessDenied {
        tool: String,
        command_line: String,
        exit_code: i32,
    },
    #[error("'{0}' is not a valid exit code and was ignored.")]
    InvalidExitCode(String),
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "TS1001",
            Self::UnmappedValue { .. } => "TS1002",
            Self::MissingRequiredArgument { .. } => "TS1003",
            Self::ToolFailed { .. } => "TS1004",
            Self::AccessDenied { .. } => "TS1005",
            Self::InvalidExitCode(_) => "TS1006",
        }
    }

    /// Whether the diagnostic marks the invocation as failed.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::InvalidExitCode(_))
    }
}

/// Receives diagnostics produced while materializing, rendering or running a command.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    /// Number of error-level diagnostics reported so far.
    fn error_count(&self) -> usize;

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Writes every diagnostic through the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink {
    errors: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors += 1;
            log::error!("{}: {}", diagnostic.code(), diagnostic);
        } else {
            log::warn!("{}: {}", diagnostic.code(), diagnostic);
        }
    }

    fn error_count(&self) -> usize {
        self.errors
    }
}

/// Keeps every diagnostic in memory, in the order reported.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.diagnostics.iter().map(Diagnostic::code).collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::trace!("Collected diagnostic {}: {}", diagnostic.code(), diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}
