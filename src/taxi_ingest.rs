//! Load NYC TLC trip records and zone lookups into a database.
//!
//! Parquet files are copied in one replace. CSV files are streamed in bounded
//! batches: the first batch recreates the destination table and every batch
//! is appended after it. DuckDB does the writing, either into an attached
//! Postgres database or a DuckDB file.

pub mod config;
pub mod duckdb_load;
pub mod error;
pub mod file_load;
pub mod jobs;

pub use config::{ConnectionConfig, IngestConfig};
pub use duckdb_load::core_processor::{CoreProcessor, IngestJob, IngestSummary};
pub use duckdb_load::destination::Destination;
pub use duckdb_load::progress::{IngestEvent, IngestObserver, TracingObserver};
pub use error::{IngestError, IngestResult};
pub use file_load::schema::{BatchSize, ColumnType, TableSchema};
pub use file_load::FileType;
