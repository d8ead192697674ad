//! Run-level errors
//!
//! Per-establishment and per-product failures never surface here: they are
//! logged or recorded as failure outcomes. `AppError` covers the faults that
//! stop a run as a whole.

use catalog_client::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog call outside the per-unit isolation (establishment directory)
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Artifact directory or file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact row could not be encoded
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type AppResult<T> = Result<T, AppError>;
