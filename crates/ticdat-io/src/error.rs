//! Error types for reading and writing data sets.

use std::path::PathBuf;

use thiserror::Error;
use ticdat_model::TicDatError;

/// Errors that can occur while reading or writing files.
#[derive(Debug, Error)]
pub enum FormatError {
    // === File System Errors ===
    /// Input file or directory does not exist.
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// Refusing to replace an existing output.
    #[error("{path} already exists, pass allow_overwrite to replace it")]
    AlreadyExists { path: PathBuf },

    /// Failed to read or write.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parse Errors ===
    /// Malformed JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed CSV.
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // === Layout Errors ===
    /// File content does not have the expected structure.
    #[error("unexpected layout in {path}: {reason}")]
    Layout { path: PathBuf, reason: String },

    /// More than one entry matches a declared table.
    #[error("{path} has more than one entry for table {table}")]
    AmbiguousTable { path: PathBuf, table: String },

    /// A CSV header lacks a declared field.
    #[error("{path} has no column for field {field}")]
    MissingColumn { path: PathBuf, field: String },

    // === Model Errors ===
    #[error(transparent)]
    Model(#[from] TicDatError),
}

impl FormatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    pub(crate) fn layout(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Layout {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for format operations.
pub type Result<T> = std::result::Result<T, FormatError>;
