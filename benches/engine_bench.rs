//! Benchmarks for the timetable engine.
//!
//! Benchmarks cover:
//! - In-memory queue operations with mixed priorities
//! - Slot lock acquisition and sweeping
//! - Timetable generation for growing grades
//! - Serialized commit throughput through the schedule queue

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

use timetable_engine::config::{DayConfig, GeneratorConfig, QueueConfig, ScheduleConfig};
use timetable_engine::core::{EngineError, FnTask, QueuedTask, TaskMeta, TaskQueue};
use timetable_engine::generator::{GenerationRequest, TimetableGenerator};
use timetable_engine::infra::{InMemoryQueue, LockTable, SlotKey};
use timetable_engine::model::{
    AvailabilitySeed, ClassInfo, Semester, SubjectRule, TeachingAssignment, Term, Weekday,
};
use timetable_engine::runtime::TokioSpawner;
use timetable_engine::service::ScheduleQueue;
use timetable_engine::util::serde::Priority;

use tokio::runtime::Runtime;

fn term() -> Term {
    Term::new(2025, Semester::First)
}

fn priority_for(i: u64) -> Priority {
    match i % 4 {
        0 => Priority::Critical,
        1 => Priority::High,
        2 => Priority::Normal,
        _ => Priority::Low,
    }
}

// ============================================================================
// Queue Benchmarks
// ============================================================================

fn bench_queue_priority_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_priority_mix");

    for size in [100_u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut q = InMemoryQueue::new(usize::try_from(size).unwrap());
                for i in 0..size {
                    let meta = TaskMeta::new(priority_for(i), 0);
                    q.enqueue(QueuedTask { meta, payload: i }).unwrap();
                }
                let mut count = 0;
                while let Some(task) = q.dequeue() {
                    black_box(task.payload);
                    count += 1;
                }
                black_box(count);
            });
        });
    }
    group.finish();
}

// ============================================================================
// Lock Benchmarks
// ============================================================================

fn bench_lock_acquire_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("lock_acquire_release");

    for size in [35_u8, 200] {
        let keys: Vec<SlotKey> = (0..size)
            .map(|i| SlotKey::new(format!("t{i}"), Weekday::Monday, i % 7 + 1, term()))
            .collect();
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &keys, |b, keys| {
            let table = LockTable::new(Duration::from_secs(30));
            b.iter(|| {
                for key in keys {
                    black_box(table.acquire(key));
                }
                for key in keys {
                    black_box(table.release(key));
                }
            });
        });
    }
    group.finish();
}

fn bench_lock_sweep(c: &mut Criterion) {
    c.bench_function("lock_sweep_expired_1000", |b| {
        let keys: Vec<SlotKey> = (0..1_000_u32)
            .map(|i| SlotKey::new(format!("t{i}"), Weekday::Friday, 1, term()))
            .collect();
        b.iter(|| {
            let table = LockTable::new(Duration::from_millis(10));
            for (i, key) in keys.iter().enumerate() {
                table.acquire_at(key, if i % 2 == 0 { 0 } else { 1_000 });
            }
            black_box(table.sweep_expired_at(1_005));
        });
    });
}

// ============================================================================
// Generation Benchmarks
// ============================================================================

fn grade_fixture(classes: usize) -> (ScheduleConfig, Vec<ClassInfo>, Vec<TeachingAssignment>) {
    let schedule = ScheduleConfig::new(
        Weekday::WORKWEEK
            .iter()
            .map(|d| DayConfig::new(*d, 5, 0))
            .collect(),
    )
    .with_subject(SubjectRule::new("math", "Math", &[10], 4).with_max_per_day(2).with_double())
    .with_subject(SubjectRule::new("lit", "Literature", &[10], 4))
    .with_subject(SubjectRule::new("eng", "English", &[10], 3))
    .with_subject(SubjectRule::new("phys", "Physics", &[10], 2));

    let roster: Vec<ClassInfo> = (0..classes)
        .map(|i| ClassInfo::new(format!("10-{i}"), format!("10/{i}"), 10))
        .collect();
    // Two classes per teacher and subject keeps the batch clash-prone.
    let assignments = roster
        .iter()
        .enumerate()
        .flat_map(|(i, class)| {
            ["math", "lit", "eng", "phys"].map(|subject| {
                TeachingAssignment::new(
                    format!("{subject}-{}", i / 2),
                    subject,
                    class.id.clone(),
                    term(),
                )
            })
        })
        .collect();
    (schedule, roster, assignments)
}

fn bench_generate_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_grade");
    group.sample_size(20);

    for classes in [4_usize, 12, 24] {
        let (schedule, roster, assignments) = grade_fixture(classes);
        let seed = AvailabilitySeed::new();
        group.throughput(Throughput::Elements(classes as u64));
        group.bench_with_input(BenchmarkId::from_parameter(classes), &classes, |b, _| {
            let mut generator = TimetableGenerator::new(GeneratorConfig {
                seed: Some(17),
                ..GeneratorConfig::default()
            });
            b.iter(|| {
                let report = generator
                    .generate(&GenerationRequest {
                        schedule: &schedule,
                        classes: &roster,
                        assignments: &assignments,
                        term: term(),
                        seed: &seed,
                    })
                    .unwrap();
                black_box(report.shortfalls.len());
            });
        });
    }
    group.finish();
}

// ============================================================================
// Commit Queue Benchmarks
// ============================================================================

fn bench_schedule_queue_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule_queue_throughput");

    for task_count in [10_u64, 100, 500] {
        group.throughput(Throughput::Elements(task_count));
        group.bench_with_input(
            BenchmarkId::from_parameter(task_count),
            &task_count,
            |b, &task_count| {
                b.to_async(Runtime::new().unwrap()).iter(|| async move {
                    let queue = ScheduleQueue::new(&QueueConfig::default(), TokioSpawner::current());
                    let handles: Vec<_> = (0..task_count)
                        .map(|i| {
                            let task = FnTask::new(move || async move { Ok::<_, EngineError>(i) });
                            queue.enqueue(task, priority_for(i), 0).unwrap()
                        })
                        .collect();
                    for handle in handles {
                        black_box(handle.outcome().await.unwrap());
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_queue_priority_mix,
    bench_lock_acquire_release,
    bench_lock_sweep,
    bench_generate_grade,
    bench_schedule_queue_throughput
);
criterion_main!(benches);
