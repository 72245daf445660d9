//! Diagnostic types.

use camino::Utf8PathBuf;
use serde::Serialize;

/// A position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
}

/// A diagnostic message produced while extracting a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: DiagnosticCode,
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic message.
    pub message: String,
    /// The file the diagnostic is about.
    pub file: Utf8PathBuf,
    /// The location, when one is known.
    pub position: Option<Position>,
}

impl Diagnostic {
    /// Creates a new diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, message: impl Into<String>, file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            file: file.into(),
            position: None,
        }
    }

    /// Attaches a position.
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.position = Some(Position { line, column });
        self
    }
}

/// The severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational; only reported when verbose output is requested.
    Hint,
    /// Part of a file was skipped.
    Warning,
    /// A whole file produced no components.
    Error,
}

impl Severity {
    /// Returns the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// `parse-error`: the file is not valid source text
    ParseError,
    /// `read-failed`: the file could not be read
    ReadFailed,
    /// `declaration-skipped`: one declaration failed and was left out
    DeclarationSkipped,
    /// `wrapper-depth-exceeded`: too many nested higher-order wrappers
    WrapperDepthExceeded,
    /// `unsupported-default-export`: a default export that is not a component
    UnsupportedDefaultExport,
    /// `unresolved-module`: a relative re-export target does not exist
    UnresolvedModule,
}

impl DiagnosticCode {
    /// Returns the default severity for this diagnostic code.
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticCode::ParseError | DiagnosticCode::ReadFailed => Severity::Error,
            DiagnosticCode::DeclarationSkipped | DiagnosticCode::WrapperDepthExceeded => {
                Severity::Warning
            }
            DiagnosticCode::UnsupportedDefaultExport | DiagnosticCode::UnresolvedModule => {
                Severity::Hint
            }
        }
    }

    /// Returns the diagnostic code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::ParseError => "parse-error",
            DiagnosticCode::ReadFailed => "read-failed",
            DiagnosticCode::DeclarationSkipped => "declaration-skipped",
            DiagnosticCode::WrapperDepthExceeded => "wrapper-depth-exceeded",
            DiagnosticCode::UnsupportedDefaultExport => "unsupported-default-export",
            DiagnosticCode::UnresolvedModule => "unresolved-module",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(Position { line, column }) => write!(
                f,
                "{}:{}:{} {} [{}] {}",
                self.file,
                line,
                column,
                self.severity.as_str(),
                self.code,
                self.message
            ),
            None => write!(
                f,
                "{} {} [{}] {}",
                self.file,
                self.severity.as_str(),
                self.code,
                self.message
            ),
        }
    }
}
