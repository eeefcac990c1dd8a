//! Run configuration.
//!
//! Everything is supplied on the command line; there is no config file.

use std::path::PathBuf;

use crate::duckdb_load::destination::Destination;
use crate::file_load::schema::BatchSize;
use crate::jobs::TripLayout;

/// Postgres connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Schema destination tables are created in.
    pub schema: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            password: "root".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            database: "ny_taxi".to_string(),
            schema: "public".to_string(),
        }
    }
}

impl ConnectionConfig {
    /// libpq keyword/value connection string, as accepted by DuckDB's `ATTACH`.
    pub fn postgres_uri(&self) -> String {
        format!(
            "dbname={} user={} password={} host={} port={}",
            libpq_value(&self.database),
            libpq_value(&self.user),
            libpq_value(&self.password),
            libpq_value(&self.host),
            self.port
        )
    }
}

// Values with spaces or quotes must be single-quoted, escaping ' and \
fn libpq_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub connection: ConnectionConfig,
    /// Write into this DuckDB file instead of Postgres.
    pub duckdb_path: Option<PathBuf>,
    pub batch_size: BatchSize,
    pub trips_file: PathBuf,
    pub trips_table: String,
    pub trip_layout: TripLayout,
    pub zones_file: PathBuf,
    pub zones_table: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            duckdb_path: None,
            batch_size: BatchSize::default(),
            trips_file: PathBuf::from("homework/green_tripdata_2025-11.parquet"),
            trips_table: "green_taxi_data".to_string(),
            trip_layout: TripLayout::Green,
            zones_file: PathBuf::from("homework/taxi_zone_lookup.csv"),
            zones_table: "zones_lookup".to_string(),
        }
    }
}

impl IngestConfig {
    pub fn destination(&self) -> Destination {
        let schema = self.connection.schema.clone();
        match &self.duckdb_path {
            Some(path) => Destination::DuckDbFile {
                path: path.clone(),
                schema,
            },
            None => Destination::Postgres {
                uri: self.connection.postgres_uri(),
                schema,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_default_uri() {
        assert_eq!(
            ConnectionConfig::default().postgres_uri(),
            "dbname=ny_taxi user=root password=root host=localhost port=5432"
        );
    }

    #[test]
    fn quotes_awkward_values() {
        let config = ConnectionConfig {
            password: "it's a secret\\".to_string(),
            ..ConnectionConfig::default()
        };
        assert!(config
            .postgres_uri()
            .contains("password='it\\'s a secret\\\\' host=localhost"));
        assert_eq!(libpq_value(""), "''");
    }

    #[test]
    fn duckdb_path_switches_destination() {
        let mut config = IngestConfig::default();
        assert!(matches!(config.destination(), Destination::Postgres { .. }));

        config.duckdb_path = Some(PathBuf::from("taxi.duckdb"));
        assert_eq!(
            config.destination(),
            Destination::DuckDbFile {
                path: PathBuf::from("taxi.duckdb"),
                schema: "public".to_string(),
            }
        );
    }
}
