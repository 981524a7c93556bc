//! Error types for scan and plot operations.

use thiserror::Error;

/// Errors that can occur while scanning sample folders or plotting summaries.
///
/// Missing and incomplete logs are not errors; they become unavailable
/// records. Anything that reaches this type aborts the whole run.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Filesystem failure (root missing, unreadable sample directory, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input that cannot be summarized (e.g. a summary without a header).
    #[error("{0}")]
    InvalidInput(String),
}

/// Convenience alias for results with [`SummaryError`].
pub type Result<T> = std::result::Result<T, SummaryError>;
