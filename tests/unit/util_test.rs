//! Tests for utility functions

use timetable_engine::util::{now_ms, Priority, TaskId};

#[test]
fn test_priority_ordering() {
    assert!(Priority::Critical > Priority::High);
    assert!(Priority::High > Priority::Normal);
    assert!(Priority::Normal > Priority::Low);
    assert_eq!(Priority::default(), Priority::Normal);
}

#[test]
fn test_priority_serializes_snake_case() {
    let json = serde_json::to_string(&Priority::Critical).unwrap();
    assert_eq!(json, "\"critical\"");
}

#[test]
fn test_task_ids_are_unique() {
    let a: TaskId = uuid::Uuid::new_v4();
    let b: TaskId = uuid::Uuid::new_v4();
    assert_ne!(a, b);
}

#[test]
fn test_clock_moves_forward() {
    let before = now_ms();
    assert!(before > 0);
    assert!(now_ms() >= before);
}
