use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems detected before any input is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no output schema selected; choose one of native, legacy-a, legacy-b")]
    NoSchemaSelected,
    #[error("more than one output schema selected: {}", .0.join(", "))]
    ConflictingSchemas(Vec<&'static str>),
    #[error("unknown output schema `{0}` (expected native, legacy-a or legacy-b)")]
    UnknownSchema(String),
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,
    #[error("input directory does not exist: {}", .0.display())]
    MissingInputDir(PathBuf),
}

/// Failures reported by a [`crate::Warehouse`].
#[derive(Debug, Error)]
pub enum SinkError {
    /// Server-side hiccup worth retrying.
    #[error("transient warehouse error: {0}")]
    Transient(String),
    #[error("dataset description would grow to {len} characters (limit {limit})")]
    DescriptionTooLong { len: usize, limit: usize },
    #[error("warehouse error: {0}")]
    Fatal(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SinkError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SinkError::Transient(_))
    }
}
