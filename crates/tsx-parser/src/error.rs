//! Parse error types.

use crate::LineCol;
use thiserror::Error;

/// An error that occurred while turning a source file into a syntax tree.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Where the parser gave up, if known.
    pub position: Option<LineCol>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, position: Option<LineCol>) -> Self {
        Self { kind, position }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, Error)]
pub enum ParseErrorKind {
    /// The file extension is not one of the component language dialects.
    #[error("unsupported file extension: {extension}")]
    UnsupportedExtension {
        /// The offending extension (empty when the path has none).
        extension: String,
    },

    /// swc rejected the source text.
    #[error("syntax error: {message}")]
    Syntax {
        /// The parser's message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParseError::new(
            ParseErrorKind::Syntax {
                message: "Expected ';', got '}'".to_string(),
            },
            Some(LineCol::new(3, 7)),
        );
        assert_eq!(error.to_string(), "syntax error: Expected ';', got '}'");
    }

    #[test]
    fn test_unsupported_extension_display() {
        let error = ParseError::new(
            ParseErrorKind::UnsupportedExtension {
                extension: "vue".to_string(),
            },
            None,
        );
        assert_eq!(error.to_string(), "unsupported file extension: vue");
    }
}
