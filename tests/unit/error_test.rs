//! Tests for error types

use timetable_engine::core::EngineError;
use timetable_engine::model::{ClassId, Semester, TeacherId, Term, Weekday};

#[test]
fn test_queue_full_error() {
    let err = EngineError::QueueFull("max queue depth 2 reached".to_string());
    assert_eq!(format!("{}", err), "queue full: max queue depth 2 reached");
}

#[test]
fn test_teacher_conflict_error() {
    let err = EngineError::TeacherConflict {
        teacher: TeacherId::new("t-kim"),
        existing_class: ClassId::new("10b"),
        day: Weekday::Tuesday,
        period: 3,
        term: Term::new(2024, Semester::Second),
    };
    assert_eq!(
        err.to_string(),
        "teacher t-kim already teaches class 10b on Tuesday period 3 (2024 S2)"
    );
}

#[test]
fn test_slot_busy_error() {
    let err = EngineError::SlotBusy("t1 Monday p1 2024 S1".to_string());
    assert_eq!(format!("{}", err), "slot busy: t1 Monday p1 2024 S1");
}

#[test]
fn test_cancelled_error() {
    assert_eq!(
        EngineError::Cancelled.to_string(),
        "task cancelled before completion"
    );
}

#[test]
fn test_store_error_converts_to_anyhow() {
    let err: anyhow::Error = EngineError::Store("disk full".to_string()).into();
    assert_eq!(err.to_string(), "store error: disk full");
}
