use std::path::PathBuf;

/// Errors that can occur while writing results
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The destination could not be created or written
    #[error("Cannot write {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The finished temporary file could not be moved into place
    #[error("Cannot move finished output to {path}: {source}")]
    Persist {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An exported table does not have the expected header
    #[error("Unexpected export header: {0}")]
    Header(String),
}
