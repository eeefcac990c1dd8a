pub mod core_processor;
pub mod csv_strategy;
pub mod destination;
pub mod parquet_strategy;
pub mod progress;
pub mod table_processor;
