use std::fmt;
use std::path::Path;

use crate::error::{IngestError, IngestResult};

pub mod csv_batches;
pub mod schema;

// Enum that represents the supported input FileTypes
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    Parquet,
    Csv,
}

impl FileType {
    // Determine the file type from the extension alone, so nothing is opened
    // before the caller knows the input is supported
    pub fn from_path(path: &Path) -> IngestResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("parquet") => Ok(FileType::Parquet),
            Some("csv") => Ok(FileType::Csv),
            _ => Err(IngestError::UnsupportedFileType {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Whether the format can be read in bounded batches.
    pub fn supports_batches(self) -> bool {
        matches!(self, FileType::Csv)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Parquet => write!(f, "Parquet"),
            FileType::Csv => write!(f, "CSV"),
        }
    }
}
