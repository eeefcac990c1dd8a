use duckdb::{appender_params_from_iter, Connection};
use tracing::{debug, warn};

use crate::duckdb_load::core_processor::{quote_identifier, CoreProcessor, IngestJob, IngestSummary};
use crate::duckdb_load::progress::{IngestEvent, IngestObserver};
use crate::duckdb_load::table_processor::TableProcessor;
use crate::error::IngestResult;
use crate::file_load::csv_batches::{CsvBatchReader, CsvColumn, RowBatch};
use crate::file_load::FileType;

const STAGING_TABLE: &str = "__taxi_ingest_staging";

/// Strategy for CSV input.
/// Rows are decoded in bounded batches. The first batch resets the destination
/// structure, then every batch is appended in file order.
pub struct CsvStrategy;

impl TableProcessor for CsvStrategy {
    fn process_into_table(
        &self,
        core_processor: &CoreProcessor,
        job: &IngestJob,
        observer: &dyn IngestObserver,
    ) -> IngestResult<IngestSummary> {
        let mut reader = CsvBatchReader::from_path(
            &job.file_path,
            job.schema.as_ref(),
            &job.date_fields,
            job.batch_size,
        )?;
        debug!(columns = ?reader.columns(), batch_size = %job.batch_size, "csv header resolved");

        let staging = StagingTable::create(core_processor.conn(), reader.columns())?;
        let qualified_table = core_processor.qualified_table(&job.table_name);
        let structure_only = format!("SELECT * FROM {} LIMIT 0", staging.name());
        let all_rows = format!("SELECT * FROM {}", staging.name());

        let mut replaced = false;
        let mut total_rows: u64 = 0;
        let mut batches = 0;

        while let Some(batch) = reader.next_batch()? {
            staging.load(&batch)?;

            if !replaced {
                core_processor.ensure_schema()?;
                core_processor.replace_table_as(&qualified_table, &structure_only)?;
                observer.on_event(&IngestEvent::TableReplaced {
                    table: job.table_name.clone(),
                    rows: 0,
                });
                replaced = true;
            }

            core_processor.append_from(&qualified_table, &all_rows)?;
            total_rows += batch.len() as u64;
            batches += 1;

            observer.on_event(&IngestEvent::BatchAppended {
                table: job.table_name.clone(),
                batch: batch.index,
                rows: batch.len(),
                total_rows,
            });
        }

        // A header-only file still gets an empty table with the right columns
        if !replaced {
            core_processor.ensure_schema()?;
            core_processor.replace_table_as(&qualified_table, &structure_only)?;
            observer.on_event(&IngestEvent::TableReplaced {
                table: job.table_name.clone(),
                rows: 0,
            });
        }

        Ok(IngestSummary {
            table: job.table_name.clone(),
            file_type: FileType::Csv,
            rows: total_rows,
            batches,
        })
    }
}

// In-memory table a batch is appended into before it is copied to the destination
struct StagingTable<'a> {
    conn: &'a Connection,
}

impl<'a> StagingTable<'a> {
    fn create(conn: &'a Connection, columns: &[CsvColumn]) -> IngestResult<Self> {
        let column_defs = columns
            .iter()
            .map(|column| {
                format!(
                    "{} {}",
                    quote_identifier(&column.name),
                    column.column_type.sql_type()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let query = format!(
            "CREATE OR REPLACE TABLE {} ({column_defs});",
            quote_identifier(STAGING_TABLE)
        );
        debug!(%query, "creating staging table");
        conn.execute(&query, [])?;
        Ok(Self { conn })
    }

    fn name(&self) -> String {
        quote_identifier(STAGING_TABLE)
    }

    // Replace the staged rows with the given batch
    fn load(&self, batch: &RowBatch) -> IngestResult<()> {
        self.conn
            .execute(&format!("DELETE FROM {};", self.name()), [])?;

        let mut appender = self.conn.appender(STAGING_TABLE)?;
        for row in &batch.rows {
            appender.append_row(appender_params_from_iter(row))?;
        }
        appender.flush()?;
        Ok(())
    }
}

impl Drop for StagingTable<'_> {
    fn drop(&mut self) {
        let query = format!("DROP TABLE IF EXISTS {};", self.name());
        if let Err(e) = self.conn.execute(&query, []) {
            warn!(error = %e, "failed to drop staging table");
        }
    }
}
