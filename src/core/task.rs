//! Queue entries and the traits queue backends and runtimes implement.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::core::EngineError;
use crate::util::serde::{Priority, TaskId};

/// Metadata carried by every queued task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMeta {
    /// Unique task identifier.
    pub id: TaskId,
    /// Priority used for queue ordering.
    pub priority: Priority,
    /// Retries still available after a failure.
    pub retries_left: u32,
    /// Enqueue timestamp in milliseconds since epoch.
    pub enqueued_at_ms: u128,
}

impl TaskMeta {
    /// Fresh metadata with a new v4 id, stamped now.
    #[must_use]
    pub fn new(priority: Priority, retries_left: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            priority,
            retries_left,
            enqueued_at_ms: crate::util::clock::now_ms(),
        }
    }
}

/// A queued unit of work with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedTask<P> {
    /// Scheduling metadata.
    pub meta: TaskMeta,
    /// Payload run by the drain loop.
    pub payload: P,
}

/// Abstraction for queue backends.
pub trait TaskQueue<P> {
    /// Insert behind every task of equal or higher priority.
    ///
    /// # Errors
    ///
    /// [`EngineError::QueueFull`] when the queue is at its maximum depth.
    fn enqueue(&mut self, task: QueuedTask<P>) -> Result<(), EngineError>;
    /// Put a task back at the very front, ignoring the depth limit.
    fn requeue_front(&mut self, task: QueuedTask<P>);
    /// Next task to run.
    fn dequeue(&mut self) -> Option<QueuedTask<P>>;
    /// Maximum depth allowed for this queue.
    fn max_depth(&self) -> usize;
    /// Current depth.
    fn len(&self) -> usize;
    /// Whether nothing is queued.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Abstraction for spawning background futures on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
