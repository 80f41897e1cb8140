use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading raw records, cleaning them, or reading the
/// normalized table back.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("input is missing expected column '{column}'")]
    MissingColumn { column: String },

    #[error("row {row}, column '{column}': {reason}")]
    Malformed {
        /// File line for CSV, 1-based record number for JSON and Parquet.
        row: usize,
        column: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("failed to move cleaned table into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, Error>;
