use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Error type returned by every ingestion step.
///
/// Nothing here is retried. Decode and write failures bubble up unchanged and
/// leave the destination with whatever batches were already written.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The input path does not end in a supported extension.
    #[error("unsupported file type: {} (expected .parquet or .csv)", path.display())]
    UnsupportedFileType { path: PathBuf },

    /// The destination table name is empty.
    #[error("invalid table name: '{name}'")]
    InvalidTableName { name: String },

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV header does not contain a column the job needs.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be coerced into its declared column type.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    Parse {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// DuckDB failed while attaching, staging or writing.
    #[error("duckdb error: {0}")]
    DuckDb(#[from] duckdb::Error),
}
