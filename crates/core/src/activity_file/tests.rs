use std::fs::{self, OpenOptions};
use std::io::Write;

use tempfile::tempdir;

use super::*;
use crate::types::PuzzleType;

fn entry(date: &str, score: u32) -> ActivityEntry {
    ActivityEntry {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        solved: score > 0,
        score,
        puzzle_type: PuzzleType::BinaryLogic,
        time_seconds: 75,
        hints_used: 1,
        no_mistakes: false,
        synced: false,
    }
}

#[test]
fn header_and_records_load_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("activity.jsonl");

    let mut writer = ActivityLogWriter::create(&path, "player-7").unwrap();
    writer.append(&entry("2026-02-15", 80)).unwrap();
    writer.append(&entry("2026-02-16", 55)).unwrap();
    writer.append(&entry("2026-02-17", 100)).unwrap();

    let loaded = load_activity_log(&path).unwrap();
    assert_eq!(loaded.format_version, FORMAT_VERSION);
    assert_eq!(loaded.log.user_id, "player-7");
    assert_eq!(loaded.log.entries.len(), 3);
    assert_eq!(loaded.log.entries[1], entry("2026-02-16", 55));
    assert_eq!(loaded.next_seq, 3);
    assert_ne!(loaded.last_sha256_hex, GENESIS_HASH);
}

#[test]
fn edited_score_breaks_the_chain() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("edited.jsonl");

    let mut writer = ActivityLogWriter::create(&path, "player-7").unwrap();
    writer.append(&entry("2026-02-16", 40)).unwrap();
    writer.append(&entry("2026-02-17", 45)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = content.lines().map(String::from).collect();
    lines[2] = lines[2].replace("\"score\":45", "\"score\":100");
    fs::write(&path, lines.join("\n") + "\n").unwrap();

    let result = load_activity_log(&path);
    assert!(
        matches!(result, Err(ActivityLoadError::HashChainBroken { line: 3 })),
        "expected broken chain at line 3, got: {result:?}"
    );
}

#[test]
fn removed_record_is_detected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("removed.jsonl");

    let mut writer = ActivityLogWriter::create(&path, "player-7").unwrap();
    for day in 15..=17 {
        writer.append(&entry(&format!("2026-02-{day}"), 90)).unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    fs::write(&path, format!("{}\n{}\n{}\n", lines[0], lines[1], lines[3])).unwrap();

    let result = load_activity_log(&path);
    assert!(
        matches!(result, Err(ActivityLoadError::InvalidRecord { line: 3, .. })),
        "expected seq gap at line 3, got: {result:?}"
    );
}

#[test]
fn partial_trailing_line_is_incomplete() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.jsonl");

    let mut writer = ActivityLogWriter::create(&path, "player-7").unwrap();
    writer.append(&entry("2026-02-17", 90)).unwrap();
    drop(writer);

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    write!(file, "{{\"seq\":1,\"ent").unwrap();

    let result = load_activity_log(&path);
    assert!(
        matches!(result, Err(ActivityLoadError::IncompleteLine { line: 3 })),
        "expected incomplete line 3, got: {result:?}"
    );
}

#[test]
fn empty_and_garbage_headers_fail() {
    let dir = tempdir().unwrap();

    let empty = dir.path().join("empty.jsonl");
    fs::write(&empty, "").unwrap();
    assert!(matches!(load_activity_log(&empty), Err(ActivityLoadError::EmptyFile)));

    let garbage = dir.path().join("garbage.jsonl");
    fs::write(&garbage, "hello\n").unwrap();
    assert!(matches!(
        load_activity_log(&garbage),
        Err(ActivityLoadError::InvalidHeader { line: 1, .. })
    ));

    let future = dir.path().join("future.jsonl");
    fs::write(&future, "{\"format_version\":9,\"user_id\":\"x\"}\n").unwrap();
    assert!(matches!(
        load_activity_log(&future),
        Err(ActivityLoadError::InvalidHeader { line: 1, .. })
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let result = load_activity_log(&dir.path().join("absent.jsonl"));
    assert!(matches!(result, Err(ActivityLoadError::Io(_))));
}

#[test]
fn resume_extends_the_chain() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("resume.jsonl");

    let mut writer = ActivityLogWriter::create(&path, "player-7").unwrap();
    writer.append(&entry("2026-02-16", 70)).unwrap();
    drop(writer);

    let loaded = load_activity_log(&path).unwrap();
    let mut writer = ActivityLogWriter::resume(&path, &loaded).unwrap();
    assert_eq!(writer.next_seq(), 1);
    writer.append(&entry("2026-02-17", 85)).unwrap();
    drop(writer);

    let reloaded = load_activity_log(&path).unwrap();
    assert_eq!(reloaded.log.entries.len(), 2);
    assert_eq!(reloaded.next_seq, 2);
}

#[test]
fn open_creates_then_resumes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("activity.jsonl");

    let (log, mut writer) = open_activity_log(&path, "player-7").unwrap();
    assert!(log.entries.is_empty());
    writer.append(&entry("2026-02-17", 60)).unwrap();
    drop(writer);

    let (log, writer) = open_activity_log(&path, "someone-else").unwrap();
    assert_eq!(log.user_id, "player-7");
    assert_eq!(log.entries.len(), 1);
    assert_eq!(writer.next_seq(), 1);
}

#[test]
fn mark_synced_appends_instead_of_rewriting() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sync.jsonl");

    let (mut log, mut writer) = open_activity_log(&path, "player-7").unwrap();
    for record in [entry("2026-02-16", 70), entry("2026-02-17", 85)] {
        writer.append(&record).unwrap();
        log.record(record);
    }
    let first = log.entries[0].date;
    assert_eq!(writer.mark_synced(&mut log, &[first]).unwrap(), 1);
    assert_eq!(writer.mark_synced(&mut log, &[first]).unwrap(), 0);
    drop(writer);

    let loaded = load_activity_log(&path).unwrap();
    assert_eq!(loaded.log.entries.len(), 3);
    assert!(!loaded.log.entries[0].synced);
    assert_eq!(loaded.log.unsynced().len(), 1);
    assert_eq!(loaded.log, log);
}
