use std::path::PathBuf;

use crate::schema::SchemaError;

/// Errors that abort reading an input table
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The input file could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error on an in-memory or streamed input
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    /// The header row could not be parsed
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// The header does not resolve onto the canonical schema
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
