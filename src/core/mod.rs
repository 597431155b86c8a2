//! Core abstractions: errors, queued tasks and the runtime seam.

pub mod error;
pub mod executor;
pub mod task;

pub use error::{AppResult, EngineError};
pub use executor::{FnTask, QueueTask};
pub use task::{QueuedTask, Spawn, TaskMeta, TaskQueue};
