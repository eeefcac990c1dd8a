use tracing::debug;

use crate::duckdb_load::core_processor::{sql_literal, CoreProcessor, IngestJob, IngestSummary};
use crate::duckdb_load::progress::{IngestEvent, IngestObserver};
use crate::duckdb_load::table_processor::TableProcessor;
use crate::error::IngestResult;
use crate::file_load::FileType;

/// Strategy for Parquet input.
/// The file is self-describing and cannot be streamed, so the whole file is
/// written in a single replace and no types are coerced.
pub struct ParquetStrategy;

impl TableProcessor for ParquetStrategy {
    fn process_into_table(
        &self,
        core_processor: &CoreProcessor,
        job: &IngestJob,
        observer: &dyn IngestObserver,
    ) -> IngestResult<IngestSummary> {
        let source = format!(
            "read_parquet({})",
            sql_literal(&job.file_path.to_string_lossy())
        );

        // Reading the footer first means a missing or corrupt file fails
        // before the destination is dropped
        let rows: i64 = core_processor.conn().query_row(
            &format!("SELECT count(*) FROM {source}"),
            [],
            |row| row.get(0),
        )?;
        let rows = u64::try_from(rows).unwrap_or_default();

        core_processor.ensure_schema()?;
        let qualified_table = core_processor.qualified_table(&job.table_name);
        core_processor.replace_table_as(&qualified_table, &format!("SELECT * FROM {source}"))?;

        observer.on_event(&IngestEvent::TableReplaced {
            table: job.table_name.clone(),
            rows,
        });
        debug!(table = %qualified_table, rows, "parquet file loaded in one pass");

        Ok(IngestSummary {
            table: job.table_name.clone(),
            file_type: FileType::Parquet,
            rows,
            batches: 1,
        })
    }
}
