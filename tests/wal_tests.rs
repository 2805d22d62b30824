//! Tests for the Append Log
//!
//! These tests verify:
//! - Record validation and framing
//! - Open/create semantics
//! - Append round-trip and replay order
//! - Torn tail handling (incomplete trailing records)
//! - Cursor independence from the append position

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkv::wal::{AppendLog, Record, ReplayCursor};
use walkv::WalKvError;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_wal() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let wal_path = temp_dir.path().join("test.wal");
    (temp_dir, wal_path)
}

fn record(key: &str, value: &str) -> Record {
    Record::new(key, value).unwrap()
}

/// Append raw bytes, bypassing framing (for crafting torn tails)
fn append_raw(path: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new().append(true).create(true).open(path).unwrap();
    file.write_all(bytes).unwrap();
    file.sync_all().unwrap();
}

// =============================================================================
// Record Tests
// =============================================================================

#[test]
fn test_record_encoding() {
    let r = record("hey", "hi");

    assert_eq!(r.encode(), b"hey\nhi\n".to_vec());
    assert_eq!(r.encoded_len(), 7);
}

#[test]
fn test_record_rejects_newline_in_key() {
    let err = Record::new("bad\nkey", "v").unwrap_err();
    assert!(matches!(err, WalKvError::InvalidRecord(_)));
}

#[test]
fn test_record_rejects_newline_in_value() {
    let err = Record::new("k", "bad\nvalue").unwrap_err();
    assert!(matches!(err, WalKvError::InvalidRecord(_)));
}

#[test]
fn test_record_allows_empty_fields() {
    let r = record("", "");
    assert_eq!(r.encode(), b"\n\n".to_vec());
}

// =============================================================================
// Open / Create Tests
// =============================================================================

#[test]
fn test_open_creates_missing_file() {
    let (_temp, wal_path) = setup_temp_wal();

    let log = AppendLog::open(&wal_path).unwrap();

    assert!(wal_path.exists());
    assert_eq!(log.path(), wal_path.as_path());
    assert!(log.is_empty().unwrap());
    assert_eq!(log.cursor(), ReplayCursor::start());
}

#[test]
fn test_open_in_missing_directory_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("no_such_dir").join("test.wal");

    let err = AppendLog::open(&path).unwrap_err();

    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
}

#[test]
fn test_create_in_generates_unique_names() {
    let temp = TempDir::new().unwrap();

    let a = AppendLog::create_in(temp.path(), "wal-").unwrap();
    let b = AppendLog::create_in(temp.path(), "wal-").unwrap();

    assert_ne!(a.path(), b.path());
    for log in [&a, &b] {
        assert_eq!(log.path().parent(), Some(temp.path()));
        let name = log.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("wal-"));
        assert_eq!(name.len(), "wal-".len() + 36);
    }
}

// =============================================================================
// Append / Replay Tests
// =============================================================================

#[test]
fn test_append_writes_framed_record() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut log = AppendLog::open(&wal_path).unwrap();

    log.append_record(&record("hey", "hi")).unwrap();
    log.append_record(&record("yo", "hey")).unwrap();

    assert_eq!(fs::read(&wal_path).unwrap(), b"hey\nhi\nyo\nhey\n".to_vec());
    assert_eq!(log.len().unwrap(), 14);
}

#[test]
fn test_append_then_read_from_fresh_cursor() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut log = AppendLog::open(&wal_path).unwrap();
    log.append_record(&record("k", "v")).unwrap();
    log.close().unwrap();

    let mut log = AppendLog::open(&wal_path).unwrap();
    assert_eq!(log.read_next_record().unwrap(), Some(record("k", "v")));
    assert_eq!(log.read_next_record().unwrap(), None);
}

#[test]
fn test_read_empty_file() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut log = AppendLog::open(&wal_path).unwrap();

    assert_eq!(log.read_next_record().unwrap(), None);
    assert_eq!(log.cursor().offset(), 0);
}

#[test]
fn test_read_preserves_order() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut log = AppendLog::open(&wal_path).unwrap();

    let originals: Vec<Record> = (0..50)
        .map(|i| record(&format!("key{}", i), &format!("value{}", i)))
        .collect();
    for r in &originals {
        log.append_record(r).unwrap();
    }

    let replayed: Vec<Record> = log.records().collect::<Result<_, _>>().unwrap();

    assert_eq!(replayed, originals);
    assert_eq!(log.cursor().records(), 50);
    assert_eq!(log.cursor().offset(), log.len().unwrap());
}

#[test]
fn test_empty_key_and_value_are_data() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut log = AppendLog::open(&wal_path).unwrap();

    log.append_record(&record("", "")).unwrap();
    log.append_record(&record("after", "empty")).unwrap();

    assert_eq!(log.read_next_record().unwrap(), Some(record("", "")));
    assert_eq!(log.read_next_record().unwrap(), Some(record("after", "empty")));
    assert_eq!(log.read_next_record().unwrap(), None);
}

#[test]
fn test_values_with_spaces_and_unicode() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut log = AppendLog::open(&wal_path).unwrap();

    log.append_record(&record("whats up", "héllo wörld\t✓")).unwrap();

    assert_eq!(
        log.read_next_record().unwrap(),
        Some(record("whats up", "héllo wörld\t✓"))
    );
}

// =============================================================================
// Cursor Tests
// =============================================================================

#[test]
fn test_append_does_not_move_cursor() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut log = AppendLog::open(&wal_path).unwrap();
    log.append_record(&record("a", "1")).unwrap();
    log.append_record(&record("b", "2")).unwrap();

    assert_eq!(log.read_next_record().unwrap(), Some(record("a", "1")));

    log.append_record(&record("c", "3")).unwrap();

    assert_eq!(log.read_next_record().unwrap(), Some(record("b", "2")));
    assert_eq!(log.read_next_record().unwrap(), Some(record("c", "3")));
    assert_eq!(log.read_next_record().unwrap(), None);
}

#[test]
fn test_read_resumes_after_end_of_log() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut log = AppendLog::open(&wal_path).unwrap();

    assert_eq!(log.read_next_record().unwrap(), None);

    log.append_record(&record("late", "entry")).unwrap();

    assert_eq!(log.read_next_record().unwrap(), Some(record("late", "entry")));
}

#[test]
fn test_seek_to_saved_cursor() {
    let (_temp, wal_path) = setup_temp_wal();
    let mut log = AppendLog::open(&wal_path).unwrap();
    for i in 0..5 {
        log.append_record(&record(&format!("k{}", i), "v")).unwrap();
    }

    log.read_next_record().unwrap();
    log.read_next_record().unwrap();
    let saved = log.cursor();
    assert_eq!(saved.records(), 2);

    let rest: Vec<_> = log.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rest.len(), 3);

    log.seek(saved);
    assert_eq!(log.read_next_record().unwrap(), Some(record("k2", "v")));

    log.rewind();
    assert_eq!(log.read_next_record().unwrap(), Some(record("k0", "v")));
}

// =============================================================================
// Torn Tail Tests
// =============================================================================

#[test]
fn test_unterminated_key_is_end_of_log() {
    let (_temp, wal_path) = setup_temp_wal();
    append_raw(&wal_path, b"a\n1\npartial");

    let mut log = AppendLog::open(&wal_path).unwrap();

    assert_eq!(log.read_next_record().unwrap(), Some(record("a", "1")));
    assert_eq!(log.read_next_record().unwrap(), None);
    assert_eq!(log.cursor().offset(), 4);
}

#[test]
fn test_missing_value_is_end_of_log() {
    let (_temp, wal_path) = setup_temp_wal();
    append_raw(&wal_path, b"a\n1\nb\n");

    let mut log = AppendLog::open(&wal_path).unwrap();

    assert_eq!(log.read_next_record().unwrap(), Some(record("a", "1")));
    assert_eq!(log.read_next_record().unwrap(), None);
    assert_eq!(log.cursor().offset(), 4);
    assert_eq!(log.cursor().records(), 1);
}

#[test]
fn test_unterminated_value_is_end_of_log() {
    let (_temp, wal_path) = setup_temp_wal();
    append_raw(&wal_path, b"b\n2");

    let mut log = AppendLog::open(&wal_path).unwrap();

    assert_eq!(log.read_next_record().unwrap(), None);
    assert_eq!(log.cursor(), ReplayCursor::start());
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_invalid_utf8_is_reported() {
    let (_temp, wal_path) = setup_temp_wal();
    append_raw(&wal_path, b"a\n1\n\xff\xfe\nv\n");

    let mut log = AppendLog::open(&wal_path).unwrap();

    assert_eq!(log.read_next_record().unwrap(), Some(record("a", "1")));
    let err = log.read_next_record().unwrap_err();
    assert!(matches!(err, WalKvError::WalCorruption(_)));
    assert_eq!(log.cursor().offset(), 4);
}

#[test]
fn test_records_iterator_stops_after_error() {
    let (_temp, wal_path) = setup_temp_wal();
    append_raw(&wal_path, b"\xff\nv\na\n1\n");

    let mut log = AppendLog::open(&wal_path).unwrap();
    let results: Vec<_> = log.records().collect();

    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
}
