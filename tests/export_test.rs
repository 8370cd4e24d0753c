// tests/export_test.rs

mod common;

use common::scorecard_json;
use golfshot_scraper::export::{COLUMNS, NOT_AVAILABLE, record_cells};
use golfshot_scraper::{ExportFormat, ExportSink, HoleRecord, HoleScore, RoundPayload, normalize};
use serde_json::Value;

fn eighteen_holes(round: &str) -> Vec<HoleRecord> {
    let pars = [4, 4, 3, 5, 4, 4, 3, 4, 5, 4, 4, 3, 5, 4, 4, 3, 4, 5];
    let payload: RoundPayload =
        serde_json::from_value(scorecard_json(&pars, &["Par"; 18])).unwrap();
    normalize(&payload, round).unwrap()
}

#[tokio::test]
async fn test_flush_two_full_rounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rounds.csv");

    let mut sink = ExportSink::new(&path, ExportFormat::Csv);
    sink.append(eighteen_holes("r1"));
    sink.append(eighteen_holes("r2"));
    assert_eq!(sink.len(), 36);
    assert_eq!(sink.path(), path.as_path());
    assert_eq!(sink.records()[18].hole, 1);
    let artifact = sink.flush().await.unwrap();

    assert_eq!(artifact.rows, 36);
    assert_eq!(artifact.path, path);
    assert_eq!(artifact.format, ExportFormat::Csv);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 37, "header plus one line per hole");
    assert_eq!(
        lines[0],
        "Date,Course Name,Hole,Par,Yardage,Handicap,Tee Club,Fairway Hit,Green Status,Putts,Bunker Shots,Penalties,Score,Score Detail"
    );
    assert_eq!(lines[0].split(',').collect::<Vec<_>>(), COLUMNS);
    assert_eq!(
        lines[1],
        "\"Saturday, June 1, 2024\",Payload Course,1,4,400,1,Driver,Hit,MissedLeft,2,N/A,0,4,Par"
    );
    // No stray temp file left behind.
    assert!(!dir.path().join("rounds.csv.tmp").exists());
}

#[test]
fn test_cells_use_sentinel_for_missing_values() {
    let record = HoleRecord {
        date: None,
        course_name: Some("Bear Lake".to_string()),
        hole: 7,
        par: Some(3),
        yardage: None,
        handicap: None,
        tee_club: None,
        fairway_hit: None,
        green_status: Some("Hit".to_string()),
        putts: Some(0),
        bunker_shots: Some(0),
        penalties: None,
        score: HoleScore::Unavailable,
        score_detail: Some("HoleInOne".to_string()),
    };
    let cells = record_cells(&record);

    assert_eq!(cells[0], NOT_AVAILABLE);
    assert_eq!(cells[2], "7");
    assert_eq!(cells[9], "0");
    assert_eq!(cells[10], "0");
    assert_eq!(cells[11], NOT_AVAILABLE);
    assert_eq!(cells[12], NOT_AVAILABLE);
    assert_eq!(cells[13], "HoleInOne");
}

#[tokio::test]
async fn test_json_export_uses_column_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("rounds.json");

    let mut sink = ExportSink::new(&path, ExportFormat::Json);
    sink.append(eighteen_holes("r1").into_iter().take(2));
    sink.flush().await.unwrap();

    let rows: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    let first = rows[0].as_object().unwrap();
    for column in COLUMNS {
        assert!(first.contains_key(column), "missing {}", column);
    }
    assert_eq!(first["Score"], Value::from(4));
    assert_eq!(first["Bunker Shots"], Value::Null);
}

#[tokio::test]
async fn test_empty_sink_still_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    let sink = ExportSink::new(&path, ExportFormat::Csv);
    assert!(sink.is_empty());
    let artifact = sink.flush().await.unwrap();

    assert_eq!(artifact.rows, 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
}

#[tokio::test]
async fn test_failed_flush_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a directory is needed makes the write fail.
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "x").unwrap();
    let path = blocker.join("export_test_failed_flush.csv");

    let mut sink = ExportSink::new(&path, ExportFormat::Csv);
    sink.append(eighteen_holes("r1"));
    let err = sink.flush().await.unwrap_err();

    assert_eq!(err.path, path);
    assert_eq!(err.records.len(), 18);
    let fallback = err.fallback.expect("rows should land in the temp dir");
    let text = std::fs::read_to_string(&fallback).unwrap();
    assert_eq!(text.lines().count(), 19);
    std::fs::remove_file(fallback).ok();
}
