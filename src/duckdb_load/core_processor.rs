use std::path::PathBuf;
use std::time::Instant;

use duckdb::Connection;
use tracing::{debug, info};

use crate::duckdb_load::csv_strategy::CsvStrategy;
use crate::duckdb_load::destination::{Destination, ATTACHED_CATALOG};
use crate::duckdb_load::parquet_strategy::ParquetStrategy;
use crate::duckdb_load::progress::{IngestEvent, IngestObserver};
use crate::duckdb_load::table_processor::TableProcessor;
use crate::error::{IngestError, IngestResult};
use crate::file_load::schema::{BatchSize, TableSchema};
use crate::file_load::FileType;

/// One file to load into one table.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestJob {
    pub file_path: PathBuf,
    pub table_name: String,
    /// Column types for delimited-text input. Ignored for Parquet.
    pub schema: Option<TableSchema>,
    /// Columns decoded as timestamps for delimited-text input.
    pub date_fields: Vec<String>,
    pub batch_size: BatchSize,
}

impl IngestJob {
    pub fn new(file_path: impl Into<PathBuf>, table_name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            table_name: table_name.into(),
            schema: None,
            date_fields: Vec::new(),
            batch_size: BatchSize::default(),
        }
    }

    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_date_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_batch_size(mut self, batch_size: BatchSize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// What a finished job wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub table: String,
    pub file_type: FileType,
    pub rows: u64,
    pub batches: usize,
}

// Main processor struct that owns the DuckDB session and the destination
// Jobs run through it one at a time over the same connection
pub struct CoreProcessor {
    conn: Connection,
    destination: Destination,
    catalog: String,
}

impl CoreProcessor {
    // Open the DuckDB session and attach the destination
    pub fn connect(destination: Destination) -> IngestResult<Self> {
        let conn = Connection::open_in_memory()?;

        let catalog = match &destination {
            Destination::Postgres { uri, .. } => {
                conn.execute_batch("INSTALL postgres; LOAD postgres;")?;
                conn.execute(
                    &format!(
                        "ATTACH {} AS {} (TYPE POSTGRES)",
                        sql_literal(uri),
                        ATTACHED_CATALOG
                    ),
                    [],
                )?;
                ATTACHED_CATALOG.to_string()
            }
            Destination::DuckDbFile { path, .. } => {
                conn.execute(
                    &format!(
                        "ATTACH {} AS {}",
                        sql_literal(&path.to_string_lossy()),
                        ATTACHED_CATALOG
                    ),
                    [],
                )?;
                ATTACHED_CATALOG.to_string()
            }
            Destination::InMemory { .. } => {
                conn.query_row("SELECT current_database()", [], |row| row.get(0))?
            }
        };

        info!(destination = %destination.describe(), "connected");

        Ok(Self {
            conn,
            destination,
            catalog,
        })
    }

    /// Load `job.file_path` into `job.table_name`, replacing the table.
    ///
    /// The file kind comes from the extension. An unsupported extension or a
    /// blank table name fails before any statement reaches the destination.
    /// Later failures propagate as-is and keep whatever was already written.
    pub fn ingest(
        &self,
        job: &IngestJob,
        observer: &dyn IngestObserver,
    ) -> IngestResult<IngestSummary> {
        let file_type = FileType::from_path(&job.file_path)?;
        if job.table_name.trim().is_empty() {
            return Err(IngestError::InvalidTableName {
                name: job.table_name.clone(),
            });
        }

        observer.on_event(&IngestEvent::JobStarted {
            table: job.table_name.clone(),
            file: job.file_path.clone(),
            file_type,
        });
        let started = Instant::now();

        // Depending on whether the file can be streamed, the appropriate strategy is applied
        let strategy: Box<dyn TableProcessor> = match file_type {
            FileType::Parquet => Box::new(ParquetStrategy),
            FileType::Csv => Box::new(CsvStrategy),
        };
        let summary = strategy.process_into_table(self, job, observer)?;

        observer.on_event(&IngestEvent::JobFinished {
            table: summary.table.clone(),
            rows: summary.rows,
            batches: summary.batches,
            elapsed: started.elapsed(),
        });
        Ok(summary)
    }

    // Create the destination schema if it is missing
    pub fn ensure_schema(&self) -> IngestResult<()> {
        let query = format!(
            "CREATE SCHEMA IF NOT EXISTS {}.{};",
            quote_identifier(&self.catalog),
            quote_identifier(self.destination.schema())
        );
        debug!(%query, "ensuring schema");
        self.conn.execute(&query, [])?;
        Ok(())
    }

    // Get the fully qualified destination table
    pub fn qualified_table(&self, table_name: &str) -> String {
        format!(
            "{}.{}.{}",
            quote_identifier(&self.catalog),
            quote_identifier(self.destination.schema()),
            quote_identifier(table_name.trim())
        )
    }

    // Drop the existing table and recreate it from a query
    pub fn replace_table_as(&self, qualified_table: &str, select: &str) -> IngestResult<()> {
        let drop_table = format!("DROP TABLE IF EXISTS {qualified_table};");
        debug!(query = %drop_table, "dropping destination");
        self.conn.execute(&drop_table, [])?;

        let create_table = format!("CREATE TABLE {qualified_table} AS {select};");
        debug!(query = %create_table, "creating destination");
        self.conn.execute(&create_table, [])?;
        Ok(())
    }

    // Append the rows of a query to an existing table
    pub fn append_from(&self, qualified_table: &str, select: &str) -> IngestResult<usize> {
        let insert = format!("INSERT INTO {qualified_table} {select};");
        debug!(query = %insert, "appending rows");
        Ok(self.conn.execute(&insert, [])?)
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Catalog name destination tables are created in.
    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers_and_literals() {
        assert_eq!(quote_identifier("zones"), "\"zones\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(sql_literal("it's.csv"), "'it''s.csv'");
    }

    #[test]
    fn qualifies_tables_in_memory_catalog() {
        let processor = CoreProcessor::connect(Destination::in_memory()).unwrap();
        assert_eq!(
            processor.qualified_table(" zones_lookup "),
            format!("\"{}\".\"main\".\"zones_lookup\"", processor.catalog())
        );
    }
}
