//! Error handling for VFP file codecs.
//!
//! Structural problems (wrong counts, missing lines) and numeric problems
//! (a field that should be a number is not) are kept apart so callers can
//! tell a malformed file from a corrupted value. Both carry the 1-based line
//! number they were found on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VfpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Format error at line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("Numeric parse error at line {line}: '{token}' is not a number")]
    NumericParse { line: usize, token: String },

    #[error("Value {value} does not fit a {width}-column field")]
    FieldOverflow { value: String, width: usize },

    #[error("Unrecognised solver file: {path}")]
    UnknownFormat { path: PathBuf },

    #[error("Case directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Flow file name '{name}' not recognised: {reason}")]
    FileName { name: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    FileFailed {
        path: PathBuf,
        #[source]
        source: Box<VfpError>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl VfpError {
    /// Create a structural format error
    pub fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }

    /// Create a numeric parse error for a token
    pub fn numeric(line: usize, token: impl Into<String>) -> Self {
        Self::NumericParse {
            line,
            token: token.into(),
        }
    }

    /// Attach the file path a codec error came from
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::FileFailed {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Line number for errors that point into a file
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Format { line, .. } | Self::NumericParse { line, .. } => Some(*line),
            Self::FileFailed { source, .. } => source.line(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, VfpError>;
