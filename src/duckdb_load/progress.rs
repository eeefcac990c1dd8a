use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::file_load::FileType;

/// Progress events emitted while a job runs.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    JobStarted {
        table: String,
        file: PathBuf,
        file_type: FileType,
    },
    /// The destination was dropped and recreated holding `rows` rows.
    TableReplaced { table: String, rows: u64 },
    BatchAppended {
        table: String,
        batch: usize,
        rows: usize,
        total_rows: u64,
    },
    JobFinished {
        table: String,
        rows: u64,
        batches: usize,
        elapsed: Duration,
    },
}

/// Observer hook for ingestion progress.
///
/// Purely cosmetic; an observer cannot influence the job.
pub trait IngestObserver {
    fn on_event(&self, event: &IngestEvent);
}

/// Reports progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl IngestObserver for TracingObserver {
    fn on_event(&self, event: &IngestEvent) {
        match event {
            IngestEvent::JobStarted {
                table,
                file,
                file_type,
            } => info!(%table, file = %file.display(), %file_type, "loading file"),
            IngestEvent::TableReplaced { table, rows } => {
                info!(%table, rows, "destination table replaced")
            }
            IngestEvent::BatchAppended {
                table,
                batch,
                rows,
                total_rows,
            } => debug!(%table, batch, rows, total_rows, "batch appended"),
            IngestEvent::JobFinished {
                table,
                rows,
                batches,
                elapsed,
            } => info!(
                %table,
                rows,
                batches,
                elapsed_ms = elapsed.as_millis() as u64,
                "table loaded"
            ),
        }
    }
}
