use crate::duckdb_load::core_processor::{CoreProcessor, IngestJob, IngestSummary};
use crate::duckdb_load::progress::IngestObserver;
use crate::error::IngestResult;

/// Strategy trait for moving one input file into its destination table.
/// Each supported file kind gets its own implementation.
pub trait TableProcessor {
    fn process_into_table(
        &self,
        core_processor: &CoreProcessor,
        job: &IngestJob,
        observer: &dyn IngestObserver,
    ) -> IngestResult<IngestSummary>;
}
