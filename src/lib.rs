//! # Timetable Engine
//!
//! Class-timetable generation and teacher-assignment scheduling for a school.
//!
//! The engine covers three stages that feed each other:
//!
//! - **Assignment planning** ([`planner`]): decide which teacher teaches each
//!   (class, subject) pair for a term, balancing load and carrying semester-1
//!   teachers into semester 2 where possible.
//! - **Timetable generation** ([`generator`]): place every required period of
//!   every subject and activity into a day×period grid per class, with no
//!   adjacent repeats and no teacher in two classes at once, and report what
//!   could not be placed.
//! - **Slot commits** (`service`): serialize "teacher X teaches class Y at
//!   slot Z" edits through a priority queue with timestamped slot locks, so
//!   the conflict check and the write are never interleaved with another
//!   commit.
//!
//! Capacity problems are data, not errors: unstaffed pairs, shortfalls and
//! over-subscribed grades come back as structured values and `tracing`
//! warnings. [`core::EngineError`] is reserved for unusable configuration,
//! queue rejection, teacher conflicts, lock contention and storage failures.
//!
//! ```rust,ignore
//! use timetable_engine::builders::build_engine;
//! use timetable_engine::config::EngineConfig;
//! use timetable_engine::runtime::TokioSpawner;
//! use timetable_engine::util::serde::Priority;
//!
//! let engine = build_engine(EngineConfig::from_env()?, TokioSpawner::current())?;
//! let plan = engine.plan_assignments(ctx, &request);
//! let report = engine.generate_timetables(&schedule, &classes, &plan.assignments, term)?;
//! println!("{report}");
//! let committed = engine.commit_report(&report, Priority::Normal)?.outcome().await?;
//! ```
//!
//! The queue, lock sweeper and facade need the default `tokio-runtime`
//! feature; planning and generation are plain synchronous code.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Errors, queued tasks and the runtime seam.
pub mod core;
/// Schedule grid and engine runtime configuration.
pub mod config;
/// Domain types: teachers, subjects, classes, timetables, availability.
pub mod model;
/// Greedy teacher assignment.
pub mod planner;
/// Randomized timetable generation.
pub mod generator;
/// Queue, lock and slot-store backends.
pub mod infra;
/// Serialized slot commits.
#[cfg(feature = "tokio-runtime")]
pub mod service;
/// Tokio adapter and the engine facade.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Builders wiring an engine from configuration.
#[cfg(feature = "tokio-runtime")]
pub mod builders;
/// Shared utilities.
pub mod util;
