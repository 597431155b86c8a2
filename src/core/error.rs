//! Error types for engine operations.

use thiserror::Error;

use crate::model::{ClassId, TeacherId, Term, Weekday};

/// Errors produced by the planner, generator and slot-commit service.
///
/// Capacity shortfalls are not errors: they travel as structured values in
/// [`crate::planner::PlanOutcome`] and [`crate::generator::GenerationReport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The schedule or engine configuration cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The commit queue is at its maximum depth.
    #[error("queue full: {0}")]
    QueueFull(String),
    /// The teacher already teaches another class in that slot.
    #[error(
        "teacher {teacher} already teaches class {existing_class} on {day} period {period} ({term})"
    )]
    TeacherConflict {
        /// Teacher being double-booked.
        teacher: TeacherId,
        /// Class already holding the slot.
        existing_class: ClassId,
        /// Day of the slot.
        day: Weekday,
        /// 1-based period of the slot.
        period: u8,
        /// Term of the slot.
        term: Term,
    },
    /// A live lock holds the slot; try again later.
    #[error("slot busy: {0}")]
    SlotBusy(String),
    /// A queued task failed for a task-specific reason.
    #[error("task failed: {0}")]
    TaskFailed(String),
    /// Slot storage failure with context.
    #[error("store error: {0}")]
    Store(String),
    /// The queue dropped the task before reporting an outcome.
    #[error("task cancelled before completion")]
    Cancelled,
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
