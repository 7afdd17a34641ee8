use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Errors from configuring or running tag validation.
#[derive(Debug, Error)]
pub enum FsckError {
    /// A configuration entry names a rule that does not exist.
    #[error("unknown fsck rule: {0}")]
    UnknownRule(String),

    /// A configuration value is not a severity.
    #[error("invalid severity {value:?}: expected one of ignore, warn, error")]
    InvalidSeverity { value: String },

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("failed to read config {}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tag input failed validation.
    #[error("tag input does not pass fsck: {}", summarize(diagnostics))]
    Rejected { diagnostics: Vec<Diagnostic> },

    /// Validation passed, but a field the record needs could not be parsed
    /// because the rule guarding it was configured as non-fatal.
    #[error("tag input has no usable '{field}' header")]
    Incomplete { field: &'static str },
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => "no diagnostics".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// Convenience type alias for fsck operations.
pub type FsckResult<T> = std::result::Result<T, FsckError>;
