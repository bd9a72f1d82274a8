//! Integration tests for batch extraction.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use docbench::batch::{process_document, TIME_FILE};
use docbench::{run_batch, BatchOptions, BatchRunner, OutputFormat};
use tempfile::tempdir;

const INVOICE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invoice.json");

const BROKEN: &str = r#"{"Blocks": [
    {"Id": "lay", "BlockType": "LAYOUT_TEXT",
     "Geometry": {"BoundingBox": {"Left": 0, "Top": 0, "Width": 1, "Height": 1}},
     "Relationships": [{"Type": "CHILD", "Ids": ["nowhere"]}]}
]}"#;

fn setup(input: &Path) {
    fs::copy(INVOICE, input.join("invoice.json")).unwrap();
    fs::write(input.join("broken.json"), BROKEN).unwrap();
    fs::write(input.join("readme.md"), "not a response").unwrap();
}

#[test]
fn test_batch_writes_outputs_and_timing() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    setup(input.path());
    let save_dir = output.path().join("results");

    let report = run_batch(input.path(), &save_dir, BatchOptions::new()).unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded, vec![save_dir.join("invoice.txt")]);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("broken.json"));
    assert!(report.failed[0].1.contains("nowhere"));

    let invoice = fs::read_to_string(save_dir.join("invoice.txt")).unwrap();
    assert!(invoice.starts_with("Invoice 2024-001\n\n| Item | Amount |"));
    assert!(!save_dir.join("broken.txt").exists());

    let timing = fs::read_to_string(save_dir.join(TIME_FILE)).unwrap();
    let lines: Vec<&str> = timing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("time: "));
    assert!(lines[1].starts_with("avg time: "));
    assert!(timing.ends_with('\n'));
}

#[test]
fn test_batch_sequential_text_output_and_progress() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    setup(input.path());

    let options = BatchOptions::new()
        .with_format(OutputFormat::Text)
        .with_parallel(false);
    let done = AtomicUsize::new(0);
    let succeeded = AtomicUsize::new(0);
    let report = BatchRunner::new(options)
        .run(input.path(), output.path(), |_, ok| {
            done.fetch_add(1, Ordering::SeqCst);
            if ok {
                succeeded.fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();

    assert_eq!(done.load(Ordering::SeqCst), 2);
    assert_eq!(succeeded.load(Ordering::SeqCst), 1);
    assert_eq!(report.succeeded.len(), 1);

    let text = fs::read_to_string(output.path().join("invoice.txt")).unwrap();
    assert!(text.contains("Item\tAmount\nTotal\t\nTax\t0"));
}

#[test]
fn test_batch_empty_directory() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();

    let report = run_batch(input.path(), output.path(), BatchOptions::new()).unwrap();
    assert_eq!(report.total(), 0);
    assert_eq!(report.average_secs(), 0.0);
    assert!(output.path().join(TIME_FILE).exists());
}

#[test]
fn test_process_document_json() {
    let options = BatchOptions::new().with_format(OutputFormat::Json);
    let json = process_document(Path::new(INVOICE), &options).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["format"], "textract");
    assert_eq!(value["elements"].as_array().unwrap().len(), 3);
    assert_eq!(value["elements"][2]["category"], "TABLE");
}

#[test]
fn test_batch_isolates_malformed_span() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    fs::copy(INVOICE, input.path().join("good.json")).unwrap();
    let bad = r#"{"Blocks": [
        {"Id": "t", "BlockType": "TABLE",
         "Geometry": {"BoundingBox": {"Left": 0, "Top": 0, "Width": 1, "Height": 1}},
         "Relationships": [{"Type": "CHILD", "Ids": ["c"]},
                           {"Type": "MERGED_CELL", "Ids": ["m"]}]},
        {"Id": "c", "BlockType": "CELL", "RowIndex": 1, "ColumnIndex": 1,
         "RowSpan": 1, "ColumnSpan": 1},
        {"Id": "m", "BlockType": "MERGED_CELL", "RowIndex": 18446744073709551615,
         "ColumnIndex": 1, "RowSpan": 2, "ColumnSpan": 1}
    ]}"#;
    fs::write(input.path().join("bad.json"), bad).unwrap();

    let report = run_batch(input.path(), output.path(), BatchOptions::new()).unwrap();

    assert_eq!(report.succeeded, vec![output.path().join("good.txt")]);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("bad.json"));
    assert!(output.path().join("good.txt").exists());
    assert!(!output.path().join("bad.txt").exists());
    assert!(output.path().join(TIME_FILE).exists());
}

#[test]
fn test_batch_isolates_reconstruction_failure() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    fs::copy(INVOICE, input.path().join("good.json")).unwrap();
    // The graph is valid; the second merge covers a cell the first removed.
    let conflict = r#"{"Blocks": [
        {"Id": "t", "BlockType": "TABLE",
         "Geometry": {"BoundingBox": {"Left": 0, "Top": 0, "Width": 1, "Height": 1}},
         "Relationships": [{"Type": "CHILD", "Ids": ["c1", "c2"]},
                           {"Type": "MERGED_CELL", "Ids": ["m1", "m2"]}]},
        {"Id": "c1", "BlockType": "CELL", "RowIndex": 1, "ColumnIndex": 1,
         "RowSpan": 1, "ColumnSpan": 1},
        {"Id": "c2", "BlockType": "CELL", "RowIndex": 1, "ColumnIndex": 2,
         "RowSpan": 1, "ColumnSpan": 1},
        {"Id": "m1", "BlockType": "MERGED_CELL", "RowIndex": 1, "ColumnIndex": 1,
         "RowSpan": 1, "ColumnSpan": 2, "Relationships": [{"Type": "CHILD", "Ids": ["c1", "c2"]}]},
        {"Id": "m2", "BlockType": "MERGED_CELL", "RowIndex": 1, "ColumnIndex": 2,
         "RowSpan": 1, "ColumnSpan": 1, "Relationships": [{"Type": "CHILD", "Ids": ["c2"]}]}
    ]}"#;
    fs::write(input.path().join("conflict.json"), conflict).unwrap();

    let report = run_batch(input.path(), output.path(), BatchOptions::new()).unwrap();

    assert_eq!(report.succeeded, vec![output.path().join("good.txt")]);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("conflict.json"));
    assert!(report.failed[0].1.contains("table t"));
    assert!(!output.path().join("conflict.txt").exists());
    assert!(output.path().join(TIME_FILE).exists());
}

#[test]
fn test_batch_output_name_collision() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    fs::copy(INVOICE, input.path().join("a.json")).unwrap();
    fs::copy(INVOICE, input.path().join("a.JSON")).unwrap();

    let done = AtomicUsize::new(0);
    let report = BatchRunner::new(BatchOptions::new())
        .run(input.path(), output.path(), |_, _| {
            done.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    assert_eq!(done.load(Ordering::SeqCst), 2);
    assert_eq!(report.succeeded, vec![output.path().join("a.txt")]);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("a.json"));
    assert!(report.failed[0].1.contains("a.txt"));
}
