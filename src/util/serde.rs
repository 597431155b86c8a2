//! Small serializable types shared across the engine.

use serde::{Deserialize, Serialize};

/// Identifier assigned to every queued task.
pub type TaskId = uuid::Uuid;

/// Queue priority for slot-commit tasks. Higher variants are drained first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Background work such as bulk re-commits.
    Low,
    /// Regular administrative edits.
    #[default]
    Normal,
    /// Edits that should jump ahead of the regular backlog.
    High,
    /// Corrections that must run before anything else.
    Critical,
}
