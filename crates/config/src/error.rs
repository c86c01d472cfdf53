//! Error types for configuration loading and persistence.
//!
//! Responsibilities:
//! - Define error variants for all configuration loading and save failures.
//! - Define the internal lookup failure kinds used by typed accessors.
//!
//! Does NOT handle:
//! - Deciding which failures are fatal (callers and `ConfigStore` do that).
//!
//! Invariants:
//! - All file-related variants carry the path for debugging.
//! - Lookup failures never escape the public accessor boundary; they are
//!   collapsed to the caller-supplied default after being logged.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and persistence.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}, line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to parse config stream at line {line}: {message}")]
    ParseStream { line: usize, message: String },

    #[error("Failed to write config file at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load credential file at {path}: {source}")]
    CredentialFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode section '{section}' for remote storage: {source}")]
    RemoteEncode {
        section: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode section '{section}' from remote storage: {source}")]
    RemoteDecode {
        section: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Remote domain '{0}' not found")]
    RemoteDomainNotFound(String),

    #[error("Remote item '{item}' not found in domain '{domain}'")]
    RemoteItemNotFound { domain: String, item: String },

    #[error("Remote store error: {0}")]
    Remote(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Internal lookup failure kinds.
///
/// Typed accessors collapse these to the caller-supplied default at the
/// public boundary, but the distinction is preserved here for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LookupError {
    /// The section does not exist and no default covers the option.
    SectionAbsent,
    /// The section exists but has no such option and no default covers it.
    OptionAbsent,
    /// The stored value could not be coerced to the requested type.
    ParseError,
}

impl LookupError {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::SectionAbsent => "section absent",
            Self::OptionAbsent => "option absent",
            Self::ParseError => "value not coercible",
        }
    }
}
