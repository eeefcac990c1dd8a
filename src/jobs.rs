//! The fixed set of NYC TLC loads a run performs.

use crate::config::IngestConfig;
use crate::duckdb_load::core_processor::IngestJob;
use crate::file_load::schema::{ColumnType, TableSchema};

/// Column layout of a trip file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripLayout {
    /// Yellow cabs, `tpep_*` timestamps.
    Yellow,
    /// Green cabs, `lpep_*` timestamps plus e-hail fee and trip type.
    Green,
}

impl TripLayout {
    pub fn schema(self) -> TableSchema {
        match self {
            TripLayout::Yellow => yellow_trip_schema(),
            TripLayout::Green => green_trip_schema(),
        }
    }

    pub fn date_fields(self) -> [&'static str; 2] {
        match self {
            TripLayout::Yellow => ["tpep_pickup_datetime", "tpep_dropoff_datetime"],
            TripLayout::Green => ["lpep_pickup_datetime", "lpep_dropoff_datetime"],
        }
    }
}

fn common_trip_columns() -> Vec<(&'static str, ColumnType)> {
    vec![
        ("VendorID", ColumnType::Int64),
        ("passenger_count", ColumnType::Int64),
        ("trip_distance", ColumnType::Float64),
        ("RatecodeID", ColumnType::Int64),
        ("store_and_fwd_flag", ColumnType::Utf8),
        ("PULocationID", ColumnType::Int64),
        ("DOLocationID", ColumnType::Int64),
        ("payment_type", ColumnType::Int64),
        ("fare_amount", ColumnType::Float64),
        ("extra", ColumnType::Float64),
        ("mta_tax", ColumnType::Float64),
        ("tip_amount", ColumnType::Float64),
        ("tolls_amount", ColumnType::Float64),
        ("improvement_surcharge", ColumnType::Float64),
        ("total_amount", ColumnType::Float64),
        ("congestion_surcharge", ColumnType::Float64),
    ]
}

pub fn yellow_trip_schema() -> TableSchema {
    TableSchema::new(common_trip_columns())
}

pub fn green_trip_schema() -> TableSchema {
    let mut columns = common_trip_columns();
    columns.push(("ehail_fee", ColumnType::Float64));
    columns.push(("trip_type", ColumnType::Int64));
    TableSchema::new(columns)
}

pub fn zones_schema() -> TableSchema {
    TableSchema::new([
        ("LocationID", ColumnType::Int64),
        ("Borough", ColumnType::Utf8),
        ("Zone", ColumnType::Utf8),
        ("service_zone", ColumnType::Utf8),
    ])
}

/// Trip data first, then the zone lookup.
pub fn default_jobs(config: &IngestConfig) -> Vec<IngestJob> {
    let trips = IngestJob::new(&config.trips_file, &config.trips_table)
        .with_schema(config.trip_layout.schema())
        .with_date_fields(config.trip_layout.date_fields())
        .with_batch_size(config.batch_size);

    let zones = IngestJob::new(&config.zones_file, &config.zones_table)
        .with_schema(zones_schema())
        .with_batch_size(config.batch_size);

    vec![trips, zones]
}
