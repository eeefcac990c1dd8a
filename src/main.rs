//! Command-line driver: load the trip file and the zone lookup, in that order.
//!
//! ```bash
//! # Postgres on localhost with the defaults (root/root, ny_taxi)
//! taxi-ingest
//!
//! # Smaller batches, yellow trip CSV
//! taxi-ingest --chunksize 50000 --trip-layout yellow --trips-file yellow_tripdata_2021-01.csv
//!
//! # No Postgres around: write into a DuckDB file
//! taxi-ingest --duckdb-path ny_taxi.duckdb
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use taxi_ingest::jobs::{default_jobs, TripLayout};
use taxi_ingest::{BatchSize, ConnectionConfig, CoreProcessor, IngestConfig, TracingObserver};

/// Load NYC taxi trip data and zone lookups into Postgres
#[derive(Parser, Debug)]
#[command(name = "taxi-ingest", version, about)]
struct Args {
    /// Postgres user
    #[arg(long, default_value = "root")]
    pg_user: String,

    /// Postgres password
    #[arg(long, default_value = "root", env = "PG_PASSWORD", hide_env_values = true)]
    pg_pass: String,

    /// Postgres host
    #[arg(long, default_value = "localhost")]
    pg_host: String,

    /// Postgres port
    #[arg(long, default_value_t = 5432)]
    pg_port: u16,

    /// Postgres database
    #[arg(long, default_value = "ny_taxi")]
    pg_db: String,

    /// Schema the tables are created in
    #[arg(long, default_value = "public")]
    pg_schema: String,

    /// Rows per CSV batch, or "unbounded" to read each file in one go
    #[arg(long, default_value = "100000", value_parser = parse_batch_size)]
    chunksize: BatchSize,

    /// Trip data file (.parquet or .csv)
    #[arg(long, default_value = "homework/green_tripdata_2025-11.parquet")]
    trips_file: PathBuf,

    /// Destination table for trip data
    #[arg(long, default_value = "green_taxi_data")]
    trips_table: String,

    /// Column layout of the trip file, used when it is a CSV
    #[arg(long, value_enum, default_value = "green")]
    trip_layout: TripLayoutArg,

    /// Zone lookup file (.csv or .parquet)
    #[arg(long, default_value = "homework/taxi_zone_lookup.csv")]
    zones_file: PathBuf,

    /// Destination table for zone lookups
    #[arg(long, default_value = "zones_lookup")]
    zones_table: String,

    /// Write into this DuckDB file instead of Postgres
    #[arg(long, value_name = "FILE")]
    duckdb_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TripLayoutArg {
    /// Yellow taxi trips (tpep_* timestamps)
    Yellow,
    /// Green taxi trips (lpep_* timestamps)
    Green,
}

impl From<TripLayoutArg> for TripLayout {
    fn from(arg: TripLayoutArg) -> Self {
        match arg {
            TripLayoutArg::Yellow => TripLayout::Yellow,
            TripLayoutArg::Green => TripLayout::Green,
        }
    }
}

impl From<Args> for IngestConfig {
    fn from(args: Args) -> Self {
        Self {
            connection: ConnectionConfig {
                user: args.pg_user,
                password: args.pg_pass,
                host: args.pg_host,
                port: args.pg_port,
                database: args.pg_db,
                schema: args.pg_schema,
            },
            duckdb_path: args.duckdb_path,
            batch_size: args.chunksize,
            trips_file: args.trips_file,
            trips_table: args.trips_table,
            trip_layout: args.trip_layout.into(),
            zones_file: args.zones_file,
            zones_table: args.zones_table,
        }
    }
}

fn parse_batch_size(value: &str) -> Result<BatchSize, String> {
    value.parse()
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = IngestConfig::from(args);
    let processor =
        CoreProcessor::connect(config.destination()).context("connecting to destination")?;

    let jobs = default_jobs(&config);
    let mut total_rows = 0;
    for job in &jobs {
        let summary = processor.ingest(job, &TracingObserver).with_context(|| {
            format!(
                "ingesting {} into {}",
                job.file_path.display(),
                job.table_name
            )
        })?;
        total_rows += summary.rows;
    }
    info!(jobs = jobs.len(), rows = total_rows, "all tables loaded");

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "taxi_ingest=debug"
    } else {
        "taxi_ingest=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
