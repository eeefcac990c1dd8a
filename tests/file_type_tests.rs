use std::path::Path;

use taxi_ingest::{FileType, IngestError};

#[cfg(test)]
mod file_type_tests {
    use super::*;

    #[test]
    fn test_parquet_detection() {
        let detected_type = FileType::from_path(Path::new("homework/green_tripdata_2025-11.parquet")).unwrap();
        assert_eq!(detected_type, FileType::Parquet);
        assert!(!detected_type.supports_batches());
    }

    #[test]
    fn test_csv_detection() {
        let detected_type = FileType::from_path(Path::new("homework/taxi_zone_lookup.csv")).unwrap();
        assert_eq!(detected_type, FileType::Csv);
        assert!(detected_type.supports_batches());
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(FileType::from_path(Path::new("ZONES.CSV")).unwrap(), FileType::Csv);
        assert_eq!(FileType::from_path(Path::new("trips.Parquet")).unwrap(), FileType::Parquet);
    }

    #[test]
    fn test_unsupported_extensions() {
        for path in ["trips.csv.gz", "trips.json", "trips", "trips.parquet.bak", ".csv"] {
            let result = FileType::from_path(Path::new(path));
            assert!(
                matches!(result, Err(IngestError::UnsupportedFileType { .. })),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_file_type_display() {
        assert_eq!(format!("{}", FileType::Csv), "CSV");
        assert_eq!(format!("{}", FileType::Parquet), "Parquet");
    }
}
