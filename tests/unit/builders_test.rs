//! Tests for engine builders

use timetable_engine::builders::{build_engine, build_engine_with_store, open_store};
use timetable_engine::config::{EngineConfig, StoreBackendConfig};
use timetable_engine::infra::{InMemorySlotStore, SlotAssignment};
use timetable_engine::infra::store::shared;
use timetable_engine::model::{Semester, TeacherId, Term, Weekday};
use timetable_engine::runtime::TokioSpawner;

#[tokio::test]
async fn test_build_engine_with_defaults() {
    let engine = build_engine(EngineConfig::default(), TokioSpawner::current()).unwrap();
    assert_eq!(engine.config().queue.max_queue_depth, 1024);
    assert!(engine.slots().locks().is_empty());
}

#[tokio::test]
async fn test_build_engine_rejects_invalid_config() {
    let mut config = EngineConfig::default();
    config.locks.sweep_interval_secs = 0;
    let err = build_engine(config, TokioSpawner::current())
        .err()
        .unwrap();
    assert!(err.to_string().contains("config invalid"));
    assert!(err.to_string().contains("sweep_interval_secs"));
}

#[tokio::test]
async fn test_build_engine_with_store_sees_existing_slots() {
    let term = Term::new(2025, Semester::First);
    let store = shared(InMemorySlotStore::with_slots(vec![SlotAssignment::new(
        "t1",
        "10a",
        "math",
        Weekday::Monday,
        1,
        term,
    )]));
    let engine =
        build_engine_with_store(EngineConfig::default(), store, TokioSpawner::current()).unwrap();

    let clash = engine.check_teacher_conflict(&TeacherId::new("t1"), Weekday::Monday, 1, term);
    assert!(clash.is_err());
    let free = engine.check_teacher_conflict(&TeacherId::new("t1"), Weekday::Monday, 2, term);
    assert!(free.is_ok());
}

#[test]
fn test_open_file_store_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store");
    let store = open_store(&StoreBackendConfig::File { path: path.clone() }).unwrap();

    let term = Term::new(2025, Semester::Second);
    store
        .lock()
        .upsert_all(&[SlotAssignment::new("t2", "11b", "lit", Weekday::Friday, 3, term)])
        .unwrap();
    assert!(path.join("slots.jsonl").exists());
    assert_eq!(store.lock().slots(term).unwrap().len(), 1);
}

#[test]
fn test_open_file_store_reports_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("slots.jsonl"), "{ broken\n").unwrap();
    let err = open_store(&StoreBackendConfig::File {
        path: dir.path().to_path_buf(),
    })
    .err()
    .unwrap();
    assert!(err.to_string().contains("opening slot store"));
}
