//! Streaming CSV decoding into typed row batches.
//!
//! The reader holds at most one batch of rows at a time. Column order follows
//! the file header. Columns without a declared type get one inferred from the
//! first batch, and every later batch is decoded to that same type.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use duckdb::types::{TimeUnit, Value};

use crate::error::{IngestError, IngestResult};
use crate::file_load::schema::{BatchSize, ColumnType, TableSchema};

// Accepted layouts for date-valued columns, tried in order
const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

/// A column found in the CSV header and the type it is decoded as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvColumn {
    pub name: String,
    pub column_type: ColumnType,
}

/// Up to one batch worth of decoded rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBatch {
    /// Zero-based position of the batch in the file.
    pub index: usize,
    pub rows: Vec<Vec<Value>>,
}

impl RowBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct CsvBatchReader<R: Read> {
    reader: csv::Reader<R>,
    columns: Vec<CsvColumn>,
    batch_size: BatchSize,
    // First batch, read ahead to settle the column types
    pending: Option<Vec<csv::StringRecord>>,
    record: csv::StringRecord,
    rows_read: usize,
    batches_read: usize,
    exhausted: bool,
}

impl CsvBatchReader<File> {
    /// Open `path` and resolve its header against the declared types.
    pub fn from_path(
        path: &Path,
        schema: Option<&TableSchema>,
        date_fields: &[String],
        batch_size: BatchSize,
    ) -> IngestResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;
        Self::new(reader, schema, date_fields, batch_size)
    }
}

impl<R: Read> CsvBatchReader<R> {
    pub fn from_reader(
        input: R,
        schema: Option<&TableSchema>,
        date_fields: &[String],
        batch_size: BatchSize,
    ) -> IngestResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input);
        Self::new(reader, schema, date_fields, batch_size)
    }

    fn new(
        mut reader: csv::Reader<R>,
        schema: Option<&TableSchema>,
        date_fields: &[String],
        batch_size: BatchSize,
    ) -> IngestResult<Self> {
        let headers = reader.headers()?.clone();
        check_date_fields(&headers, date_fields)?;

        let limit = batch_size.limit();
        let mut first_batch = Vec::new();
        let mut exhausted = false;
        while limit.map_or(true, |limit| first_batch.len() < limit) {
            let mut record = csv::StringRecord::new();
            if !reader.read_record(&mut record)? {
                exhausted = true;
                break;
            }
            first_batch.push(record);
        }

        let columns = resolve_columns(&headers, schema, date_fields, &first_batch);

        Ok(Self {
            reader,
            columns,
            batch_size,
            pending: Some(first_batch),
            record: csv::StringRecord::new(),
            rows_read: 0,
            batches_read: 0,
            exhausted,
        })
    }

    pub fn columns(&self) -> &[CsvColumn] {
        &self.columns
    }

    /// Decode the next batch, or `None` once the file is exhausted.
    pub fn next_batch(&mut self) -> IngestResult<Option<RowBatch>> {
        let rows = match self.pending.take() {
            Some(records) => {
                let mut rows = Vec::with_capacity(records.len());
                for record in &records {
                    self.rows_read += 1;
                    rows.push(self.decode_record(record)?);
                }
                rows
            }
            None => self.read_rows()?,
        };

        if rows.is_empty() {
            return Ok(None);
        }

        let batch = RowBatch {
            index: self.batches_read,
            rows,
        };
        self.batches_read += 1;
        Ok(Some(batch))
    }

    fn read_rows(&mut self) -> IngestResult<Vec<Vec<Value>>> {
        if self.exhausted {
            return Ok(Vec::new());
        }

        let limit = self.batch_size.limit();
        let mut rows = Vec::with_capacity(limit.unwrap_or(1024).min(8192));

        while limit.map_or(true, |limit| rows.len() < limit) {
            if !self.reader.read_record(&mut self.record)? {
                self.exhausted = true;
                break;
            }
            self.rows_read += 1;
            rows.push(self.decode_record(&self.record)?);
        }
        Ok(rows)
    }

    fn decode_record(&self, record: &csv::StringRecord) -> IngestResult<Vec<Value>> {
        // Header is line 1, so the first record is line 2
        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(self.rows_read + 1);

        // The reader is not flexible, so every record has one field per column
        record
            .iter()
            .zip(&self.columns)
            .map(|(raw, column)| decode_value(line, column, raw))
            .collect()
    }
}

impl<R: Read> Iterator for CsvBatchReader<R> {
    type Item = IngestResult<RowBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_batch() {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => None,
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

fn check_date_fields(headers: &csv::StringRecord, date_fields: &[String]) -> IngestResult<()> {
    match date_fields
        .iter()
        .find(|field| !headers.iter().any(|h| h == field.as_str()))
    {
        Some(missing) => Err(IngestError::SchemaMismatch {
            message: format!(
                "date column '{missing}' not found. headers={:?}",
                headers.iter().collect::<Vec<_>>()
            ),
        }),
        None => Ok(()),
    }
}

fn resolve_columns(
    headers: &csv::StringRecord,
    schema: Option<&TableSchema>,
    date_fields: &[String],
    first_batch: &[csv::StringRecord],
) -> Vec<CsvColumn> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let column_type = if date_fields.iter().any(|field| field == name) {
                ColumnType::Timestamp
            } else {
                schema
                    .and_then(|schema| schema.type_of(name))
                    .unwrap_or_else(|| infer_column_type(first_batch, idx))
            };
            CsvColumn {
                name: name.to_string(),
                column_type,
            }
        })
        .collect()
}

/// Narrowest of `Int64`, `Float64`, `Utf8` that holds every non-empty value.
///
/// A column with no values at all stays `Utf8`.
pub fn infer_column_type(records: &[csv::StringRecord], idx: usize) -> ColumnType {
    let values: Vec<&str> = records
        .iter()
        .filter_map(|record| record.get(idx))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect();

    if values.is_empty() {
        ColumnType::Utf8
    } else if values
        .iter()
        .all(|value| lexical_core::parse::<i64>(value.as_bytes()).is_ok())
    {
        ColumnType::Int64
    } else if values
        .iter()
        .all(|value| lexical_core::parse::<f64>(value.as_bytes()).is_ok())
    {
        ColumnType::Float64
    } else {
        ColumnType::Utf8
    }
}

fn decode_value(row: usize, column: &CsvColumn, raw: &str) -> IngestResult<Value> {
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    if column.column_type == ColumnType::Utf8 {
        return Ok(Value::Text(raw.to_owned()));
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| IngestError::Parse {
        row,
        column: column.name.clone(),
        raw: raw.to_owned(),
        message,
    };

    match column.column_type {
        ColumnType::Utf8 => Ok(Value::Text(raw.to_owned())),
        ColumnType::Int64 => parse_int(trimmed).map(Value::BigInt).map_err(parse_error),
        ColumnType::Float64 => lexical_core::parse::<f64>(trimmed.as_bytes())
            .map(Value::Double)
            .map_err(|e| parse_error(e.to_string())),
        ColumnType::Timestamp => parse_timestamp(trimmed)
            .map(|ts| Value::Timestamp(TimeUnit::Microsecond, ts.and_utc().timestamp_micros()))
            .ok_or_else(|| parse_error("unrecognized timestamp layout".to_string())),
    }
}

// Integral floats such as "1.0" are accepted, as files re-exported from
// Parquet write nullable integer columns that way
fn parse_int(value: &str) -> Result<i64, String> {
    let int_error = match lexical_core::parse::<i64>(value.as_bytes()) {
        Ok(int) => return Ok(int),
        Err(e) => e.to_string(),
    };

    match lexical_core::parse::<f64>(value.as_bytes()) {
        Ok(float)
            if float.is_finite()
                && float.fract() == 0.0
                && float >= i64::MIN as f64
                && float < i64::MAX as f64 =>
        {
            Ok(float as i64)
        }
        Ok(_) => Err("not an integral value in i64 range".to_string()),
        Err(_) => Err(int_error),
    }
}

/// Parse a date-valued field into a naive timestamp.
///
/// Date-only values land on midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
