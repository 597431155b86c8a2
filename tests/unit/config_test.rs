//! Tests for configuration validation

use timetable_engine::config::{
    DayConfig, EngineConfig, GeneratorConfig, GradeSession, ScheduleConfig, StoreBackendConfig,
};
use timetable_engine::model::{ActivitySlot, Session, SubjectRule, Weekday};

fn week(morning: u8, afternoon: u8) -> Vec<DayConfig> {
    Weekday::WORKWEEK
        .iter()
        .map(|d| DayConfig::new(*d, morning, afternoon))
        .collect()
}

#[test]
fn test_engine_config_defaults_are_valid() {
    let cfg = EngineConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.generator.main_attempts, 500);
    assert_eq!(cfg.generator.second_pass_attempts, 100);
    assert_eq!(cfg.generator.max_regenerations, 5);
    assert_eq!(cfg.locks.lock_timeout_secs, 30);
    assert_eq!(cfg.store, StoreBackendConfig::InMemory);
}

#[test]
fn test_engine_config_invalid_probability() {
    let cfg = EngineConfig {
        generator: GeneratorConfig {
            double_period_probability: 1.5,
            ..GeneratorConfig::default()
        },
        ..EngineConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_engine_config_invalid_queue_depth() {
    let mut cfg = EngineConfig::default();
    cfg.queue.max_queue_depth = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_engine_config_from_json_partial() {
    let json = r#"{
        "generator": { "seed": 7, "max_regenerations": 2 },
        "store": { "kind": "file", "path": "/var/lib/timetable" }
    }"#;
    let cfg = EngineConfig::from_json_str(json).expect("parse");
    assert_eq!(cfg.generator.seed, Some(7));
    assert_eq!(cfg.generator.max_regenerations, 2);
    assert_eq!(cfg.generator.main_attempts, 500);
    assert!(matches!(cfg.store, StoreBackendConfig::File { .. }));
}

#[test]
fn test_engine_config_from_json_rejects_garbage() {
    let err = EngineConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_schedule_config_from_json() {
    let json = r#"{
        "days": [
            { "day": "monday", "morning_periods": 4, "afternoon_periods": 3 },
            { "day": "tuesday", "morning_periods": 4, "afternoon_periods": 3 }
        ],
        "grade_sessions": { "10": "morning" },
        "subjects": [
            { "id": "math", "name": "Mathematics", "grades": [10], "periods_per_week": 4, "max_per_day": 2, "allow_double": true }
        ],
        "activities": [
            { "id": "flag", "name": "Flag ceremony", "placement": { "kind": "fixed", "day": "monday", "period": 1 } }
        ]
    }"#;
    let cfg = ScheduleConfig::from_json_str(json).expect("parse");
    assert_eq!(cfg.grade_session(10), GradeSession::Morning);
    assert_eq!(cfg.grade_session(11), GradeSession::Both);
    assert_eq!(cfg.main_capacity(10), 8);
    assert_eq!(cfg.subjects[0].session, Session::Main);
    assert!(cfg.activities[0].is_fixed());
}

#[test]
fn test_schedule_config_rejects_bad_fixed_slot() {
    let cfg = ScheduleConfig::new(week(4, 0)).with_activity(ActivitySlot::fixed(
        "assembly",
        "Assembly",
        &[],
        Weekday::Monday,
        5,
    ));
    assert!(cfg.validate().is_err());

    let cfg = ScheduleConfig::new(week(4, 0)).with_activity(ActivitySlot::fixed(
        "assembly",
        "Assembly",
        &[],
        Weekday::Saturday,
        1,
    ));
    assert!(cfg.validate().is_err());
}

#[test]
fn test_schedule_config_rejects_duplicates_and_empty_days() {
    assert!(ScheduleConfig::new(Vec::new()).validate().is_err());
    assert!(ScheduleConfig::new(vec![DayConfig::new(Weekday::Monday, 0, 0)])
        .validate()
        .is_err());

    let cfg = ScheduleConfig::new(week(4, 0))
        .with_subject(SubjectRule::new("math", "Math", &[10], 3))
        .with_subject(SubjectRule::new("math", "Math again", &[11], 3));
    assert!(cfg.validate().is_err());

    let cfg = ScheduleConfig::new(week(4, 0))
        .with_subject(SubjectRule::new("math", "Math", &[10], 3).with_max_per_day(0));
    assert!(cfg.validate().is_err());
}

#[test]
fn test_capacity_report_lists_overbooked_grades() {
    let cfg = ScheduleConfig::new(vec![DayConfig::new(Weekday::Monday, 2, 2)])
        .with_grade_session(10, GradeSession::Morning)
        .with_subject(SubjectRule::new("math", "Math", &[10, 11], 3).with_max_per_day(3));

    let report = cfg.capacity_report();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].grade, 10);
    assert_eq!(report[0].demand, 3);
    assert_eq!(report[0].capacity, 2);
}
