//! Error types for extraction.

use camino::Utf8PathBuf;
use thiserror::Error;
use tsx_parser::ParseError;

/// Errors that stop one file or one declaration from being extracted.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: ParseError,
    },

    /// More higher-order wrappers than the configured limit.
    #[error("`{name}` is nested in more than {limit} wrapper calls")]
    WrapperDepthExceeded {
        /// The declared name.
        name: String,
        /// The configured limit.
        limit: usize,
    },

    /// A declaration handle points at a node that is not there.
    #[error("declaration `{name}` not found in {file}")]
    MissingDeclaration {
        /// The declared name.
        name: String,
        /// The file that should hold it.
        file: Utf8PathBuf,
    },
}

/// Errors that can occur while loading the extractor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// The config path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the config shape.
    #[error("invalid config {path}: {source}")]
    Invalid {
        /// The config path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}
