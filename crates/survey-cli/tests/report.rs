//! Integration tests for the output writers.

use std::fs;

use polars::df;
use survey_cli::report::{write_table_csv, write_unique_report};
use survey_core::tables::{SurveyFrame, SurveyTables};
use tempfile::TempDir;

fn sample_tables() -> SurveyTables {
    let single = df!(
        "resp_id" => ["R0001", "R0002"],
        "timestamp" => ["2024-02-03 10:15:00", "2024-02-03 11:00:00"],
        "age" => ["31", "31"],
        "gender" => ["Female", ""],
    )
    .expect("frame");
    let location = df!(
        "resp_id" => ["R0001", "R0002"],
        "city" => ["Quezon City", "Cebu City"],
    )
    .expect("frame");
    let freetext = df!(
        "resp_id" => ["R0001", "R0002"],
        "comms" => ["", ""],
    )
    .expect("frame");
    let junction = df!(
        "resp_id" => ["R0001", "R0001"],
        "generaltools" => ["Excel", "SQL"],
    )
    .expect("frame");
    SurveyTables {
        single: SurveyFrame {
            name: "single".to_string(),
            data: single,
        },
        location: SurveyFrame {
            name: "location".to_string(),
            data: location,
        },
        freetext: SurveyFrame {
            name: "freetext".to_string(),
            data: freetext,
        },
        junctions: vec![SurveyFrame {
            name: "generaltools".to_string(),
            data: junction,
        }],
    }
}

#[test]
fn tables_are_written_as_csv() {
    let dir = TempDir::new().expect("tempdir");
    let tables = sample_tables();

    for table in tables.all() {
        let path = write_table_csv(dir.path(), table).expect("write table");
        assert!(path.is_file());
    }
    let single = fs::read_to_string(dir.path().join("single.csv")).expect("read single");
    let mut lines = single.lines();
    assert_eq!(lines.next(), Some("resp_id,timestamp,age,gender"));
    assert_eq!(single.lines().count(), 3);
}

#[test]
fn unique_report_lists_sorted_distinct_values() {
    let dir = TempDir::new().expect("tempdir");
    let tables = sample_tables();

    let path = write_unique_report(dir.path(), &tables).expect("write report");
    let report = fs::read_to_string(&path).expect("read report");

    // Identifier and timestamp columns are excluded; blanks do not count.
    assert!(!report.contains("resp_id"));
    assert!(!report.contains("timestamp"));
    assert!(report.contains("== age (1 distinct) =="));
    assert!(report.contains("== gender (1 distinct) =="));
    assert!(report.contains("Female"));
}
