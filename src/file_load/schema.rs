//! Column typing for delimited-text inputs.
//!
//! A [`TableSchema`] only lists the columns a caller cares about; anything
//! else found in a CSV header gets a type inferred from the first batch.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Logical type of a loaded column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Nullable 64-bit signed integer.
    Int64,
    /// Nullable 64-bit float.
    Float64,
    /// Nullable UTF-8 string.
    Utf8,
    /// Nullable timestamp without time zone, microsecond precision.
    Timestamp,
}

impl ColumnType {
    /// The DuckDB type used for staging and destination tables.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Int64 => "BIGINT",
            ColumnType::Float64 => "DOUBLE",
            ColumnType::Utf8 => "VARCHAR",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_type())
    }
}

/// Ordered column type declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<(String, ColumnType)>,
}

impl TableSchema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, column_type)| (name.into(), column_type))
                .collect(),
        }
    }

    /// Declared type of `name`, if any.
    pub fn type_of(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, column_type)| *column_type)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// How many rows a delimited-text reader yields per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSize {
    Rows(NonZeroUsize),
    /// Read the whole file as a single batch.
    Unbounded,
}

impl BatchSize {
    pub const DEFAULT_ROWS: usize = 100_000;

    pub fn rows(rows: usize) -> Option<Self> {
        NonZeroUsize::new(rows).map(BatchSize::Rows)
    }

    /// Row limit for one batch, `None` when unbounded.
    pub fn limit(self) -> Option<usize> {
        match self {
            BatchSize::Rows(rows) => Some(rows.get()),
            BatchSize::Unbounded => None,
        }
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        match NonZeroUsize::new(Self::DEFAULT_ROWS) {
            Some(rows) => BatchSize::Rows(rows),
            None => BatchSize::Unbounded,
        }
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSize::Rows(rows) => write!(f, "{rows}"),
            BatchSize::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl FromStr for BatchSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unbounded") {
            return Ok(BatchSize::Unbounded);
        }
        let rows: usize = trimmed
            .parse()
            .map_err(|_| format!("expected a positive row count or 'unbounded', got '{s}'"))?;
        BatchSize::rows(rows).ok_or_else(|| "batch size must be greater than zero".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_batch_sizes() {
        assert_eq!("250".parse::<BatchSize>(), Ok(BatchSize::rows(250).unwrap()));
        assert_eq!("Unbounded".parse::<BatchSize>(), Ok(BatchSize::Unbounded));
        assert!("0".parse::<BatchSize>().is_err());
        assert!("-3".parse::<BatchSize>().is_err());
        assert!("lots".parse::<BatchSize>().is_err());
    }

    #[test]
    fn default_batch_is_one_hundred_thousand_rows() {
        assert_eq!(BatchSize::default().limit(), Some(100_000));
        assert_eq!(BatchSize::Unbounded.limit(), None);
    }

    #[test]
    fn looks_up_declared_types() {
        let schema = TableSchema::new([("LocationID", ColumnType::Int64), ("Zone", ColumnType::Utf8)]);
        assert_eq!(schema.type_of("LocationID"), Some(ColumnType::Int64));
        assert_eq!(schema.type_of("Borough"), None);
        assert_eq!(schema.len(), 2);
    }
}
