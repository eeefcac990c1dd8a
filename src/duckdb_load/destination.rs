use std::path::PathBuf;

/// Catalog alias used when the destination is attached to the DuckDB session.
pub const ATTACHED_CATALOG: &str = "ingest_db";

/// Where destination tables are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A Postgres database reached through DuckDB's postgres extension.
    /// `uri` is a libpq connection string.
    Postgres { uri: String, schema: String },
    /// A DuckDB database file, created if missing.
    DuckDbFile { path: PathBuf, schema: String },
    /// The session's own in-memory catalog. Nothing outlives the process.
    InMemory { schema: String },
}

impl Destination {
    pub fn in_memory() -> Self {
        Destination::InMemory {
            schema: "main".to_string(),
        }
    }

    pub fn schema(&self) -> &str {
        match self {
            Destination::Postgres { schema, .. }
            | Destination::DuckDbFile { schema, .. }
            | Destination::InMemory { schema } => schema,
        }
    }

    /// Short label for logs. Never includes credentials.
    pub fn describe(&self) -> String {
        match self {
            Destination::Postgres { schema, .. } => format!("postgres (schema {schema})"),
            Destination::DuckDbFile { path, schema } => {
                format!("duckdb file {} (schema {schema})", path.display())
            }
            Destination::InMemory { schema } => format!("in-memory duckdb (schema {schema})"),
        }
    }
}
