use std::fs;

use bulldozer_core::{aggregate, FrequencyTable, RawLogRecord};
use bulldozer_engine::{write_report, REPORT_HEADER};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn record(source: &str, code: &str, message: &str) -> RawLogRecord {
    RawLogRecord {
        severity: "WARNING".to_string(),
        source: source.to_string(),
        code: code.to_string(),
        message: message.to_string(),
        method_name: "method".to_string(),
        time: "0".to_string(),
    }
}

fn sample_records() -> Vec<RawLogRecord> {
    vec![
        record("Rest", "1", "one"),
        record("Rest", "2", "two"),
        record("Rest", "2", "two"),
        record("Admin, Site", "3", "three's, \"quoted\"\nline"),
        record("Rest", "2", "two"),
        record("Rest", "1", "one"),
    ]
}

fn read_rows(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|row| row.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

#[test]
fn report_round_trips_counts_in_descending_order() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("key.csv");
    let records = sample_records();
    let mut table = FrequencyTable::new();
    aggregate(&records, &mut table);

    let written = write_report(&target, &table).unwrap();
    assert_eq!(written, target);

    let (header, rows) = read_rows(&target);
    assert_eq!(header, REPORT_HEADER.to_vec());
    assert_eq!(rows.len(), 3);

    let frequencies: Vec<u64> = rows.iter().map(|row| row[5].parse().unwrap()).collect();
    assert_eq!(frequencies.iter().sum::<u64>(), records.len() as u64);
    assert!(frequencies.windows(2).all(|pair| pair[0] >= pair[1]));

    assert_eq!(rows[0][2], "2");
    assert_eq!(rows[1][2], "1");
    assert_eq!(rows[2][1], "Admin, Site");
    assert_eq!(rows[2][3], "three`s- \"quoted\" line");
}

#[test]
fn empty_table_writes_header_only() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("empty.csv");

    write_report(&target, &FrequencyTable::new()).unwrap();

    let (header, rows) = read_rows(&target);
    assert_eq!(header.len(), 6);
    assert!(rows.is_empty());
}

#[test]
fn existing_report_is_replaced() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("key.csv");
    fs::write(&target, "stale contents that are longer than the new report\n".repeat(100)).unwrap();

    let mut table = FrequencyTable::new();
    aggregate(&[record("Rest", "1", "one")], &mut table);
    write_report(&target, &table).unwrap();

    let (_, rows) = read_rows(&target);
    assert_eq!(rows.len(), 1);
    assert!(!fs::read_to_string(&target).unwrap().contains("stale"));
}

#[test]
fn missing_output_dir_is_created() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested").join("out").join("key.csv");

    write_report(&target, &FrequencyTable::new()).unwrap();
    assert!(target.exists());
}

#[test]
fn unwritable_destination_is_reported() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = write_report(&blocker.join("key.csv"), &FrequencyTable::new());
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
