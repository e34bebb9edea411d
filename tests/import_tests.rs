use std::io::Write;

use aetrs::import::CsvImporter;
use aetrs::AetError;
use tempfile::NamedTempFile;

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_import_well_formed_csv() {
    let file = write_csv(
        "timestamp,heart_rate,speed,elevation\n\
         0,140,6.0,1000\n\
         1,141,6.1,1000.5\n\
         2,142,6.0,1001\n",
    );
    let series = CsvImporter::new().import(file.path()).unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.samples()[1].heart_rate, 141.0);
    assert_eq!(series.start_seconds(), 0.0);
    assert_eq!(series.end_seconds(), 2.0);
}

#[test]
fn test_import_maps_alternate_column_names() {
    // Converter output uses 'activity' elapsed times and 'enhanced_speed'
    let file = write_csv(
        "activity,hr,enhanced_speed,altitude\n\
         0:00:00,140,6.0,1000\n\
         0:00:01,141,6.1,1000.5\n\
         0:00:02,142,6.0,1001\n",
    );
    let series = CsvImporter::new().import(file.path()).unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.samples()[2].elapsed_seconds, 2.0);
}

#[test]
fn test_import_rejects_missing_column() {
    let file = write_csv("timestamp,heart_rate,speed\n0,140,6.0\n1,141,6.1\n");
    let err = CsvImporter::new().import(file.path()).unwrap_err();
    match err {
        AetError::MalformedInput { row, reason } => {
            assert_eq!(row, 0);
            assert!(reason.contains("elevation"));
        }
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn test_import_rejects_non_numeric_value() {
    let file = write_csv(
        "timestamp,heart_rate,speed,elevation\n\
         0,140,6.0,1000\n\
         1,fast,6.1,1000.5\n",
    );
    let err = CsvImporter::new().import(file.path()).unwrap_err();
    match err {
        AetError::MalformedInput { row, reason } => {
            assert_eq!(row, 2);
            assert!(reason.contains("heart_rate"));
        }
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn test_import_rejects_out_of_order_timestamps() {
    let file = write_csv(
        "timestamp,heart_rate,speed,elevation\n\
         0,140,6.0,1000\n\
         2,141,6.1,1000.5\n\
         1,142,6.0,1001\n",
    );
    let err = CsvImporter::new().import(file.path()).unwrap_err();
    assert!(matches!(err, AetError::MalformedInput { .. }));
}

#[test]
fn test_import_rejects_single_row() {
    let file = write_csv("timestamp,heart_rate,speed,elevation\n0,140,6.0,1000\n");
    let err = CsvImporter::new().import(file.path()).unwrap_err();
    assert!(matches!(err, AetError::MalformedInput { .. }));
}

#[test]
fn test_import_tolerates_gaps_with_warning_only() {
    // A 60s hole is the converter's problem to flag; loading still works
    let file = write_csv(
        "timestamp,heart_rate,speed,elevation\n\
         0,140,6.0,1000\n\
         1,141,6.1,1000.5\n\
         61,142,6.0,1001\n",
    );
    let series = CsvImporter::new()
        .with_gap_threshold(5.0)
        .import(file.path())
        .unwrap();
    assert_eq!(series.len(), 3);
}
