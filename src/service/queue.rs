//! Serialized commit queue: one task at a time, retried with a fixed delay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::config::QueueConfig;
use crate::core::{EngineError, QueueTask, QueuedTask, Spawn, TaskMeta, TaskQueue};
use crate::infra::InMemoryQueue;
use crate::util::serde::{Priority, TaskId};

/// Type-erased queued work that reports its own outcome.
#[async_trait]
trait Attempt: Send {
    /// Run once; on success the value is delivered to the caller.
    async fn attempt(&mut self) -> Result<(), EngineError>;
    /// Deliver the final error.
    fn fail(self: Box<Self>, error: EngineError);
}

struct Delivering<T: QueueTask> {
    task: Arc<T>,
    reply: Option<oneshot::Sender<Result<T::Output, EngineError>>>,
}

#[async_trait]
impl<T: QueueTask> Attempt for Delivering<T> {
    async fn attempt(&mut self) -> Result<(), EngineError> {
        // Own task per attempt; a panic comes back as a JoinError.
        let task = Arc::clone(&self.task);
        let value = tokio::spawn(async move { task.run().await })
            .await
            .map_err(|e| EngineError::TaskFailed(format!("attempt aborted: {e}")))??;
        if let Some(reply) = self.reply.take() {
            // The caller may have dropped its handle.
            let _ = reply.send(Ok(value));
        }
        Ok(())
    }

    fn fail(self: Box<Self>, error: EngineError) {
        if let Some(reply) = self.reply {
            let _ = reply.send(Err(error));
        }
    }
}

type Job = Box<dyn Attempt>;

/// Caller side of a queued task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    id: TaskId,
    rx: oneshot::Receiver<Result<T, EngineError>>,
}

impl<T> TaskHandle<T> {
    /// Id of the queued task.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Wait for the task's value or its final error.
    ///
    /// # Errors
    ///
    /// The task's last error once its retries are spent, or
    /// [`EngineError::Cancelled`] if the queue dropped it.
    pub async fn outcome(self) -> Result<T, EngineError> {
        self.rx.await.unwrap_or(Err(EngineError::Cancelled))
    }
}

struct Shared {
    queue: Mutex<InMemoryQueue<Job>>,
    draining: AtomicBool,
    retry_delay: Duration,
    default_retries: u32,
}

/// Priority queue executing at most one task at a time.
///
/// A drain loop is spawned on the first enqueue and exits once the queue is
/// empty; the next enqueue starts a new one.
pub struct ScheduleQueue<S> {
    shared: Arc<Shared>,
    spawner: S,
}

impl<S: Clone> Clone for ScheduleQueue<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            spawner: self.spawner.clone(),
        }
    }
}

impl<S> ScheduleQueue<S>
where
    S: Spawn,
{
    /// Create a queue from its settings.
    pub fn new(config: &QueueConfig, spawner: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(InMemoryQueue::new(config.max_queue_depth)),
                draining: AtomicBool::new(false),
                retry_delay: config.retry_delay(),
                default_retries: config.default_retries,
            }),
            spawner,
        }
    }

    /// Enqueue `task` with an explicit retry budget.
    ///
    /// # Errors
    ///
    /// [`EngineError::QueueFull`] when the queue is at its maximum depth.
    pub fn enqueue<T: QueueTask>(
        &self,
        task: T,
        priority: Priority,
        retries: u32,
    ) -> Result<TaskHandle<T::Output>, EngineError> {
        let (tx, rx) = oneshot::channel();
        let meta = TaskMeta::new(priority, retries);
        let id = meta.id;
        let job: Job = Box::new(Delivering {
            task: Arc::new(task),
            reply: Some(tx),
        });
        self.shared.queue.lock().enqueue(QueuedTask { meta, payload: job })?;
        tracing::debug!("task {} enqueued at {:?} priority", id, priority);
        self.ensure_draining();
        Ok(TaskHandle { id, rx })
    }

    /// Enqueue `task` with the configured default retry budget.
    ///
    /// # Errors
    ///
    /// [`EngineError::QueueFull`] when the queue is at its maximum depth.
    pub fn submit<T: QueueTask>(
        &self,
        task: T,
        priority: Priority,
    ) -> Result<TaskHandle<T::Output>, EngineError> {
        self.enqueue(task, priority, self.shared.default_retries)
    }

    /// Tasks waiting to run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Whether no task is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_draining(&self) {
        if self
            .shared
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.spawner.spawn(drain(Arc::clone(&self.shared)));
        }
    }
}

async fn drain(shared: Arc<Shared>) {
    tracing::debug!("queue drain started");
    loop {
        let next = shared.queue.lock().dequeue();
        let Some(mut entry) = next else {
            shared.draining.store(false, Ordering::Release);
            // An enqueue may have slipped in after the empty dequeue.
            if shared.queue.lock().is_empty() || shared.draining.swap(true, Ordering::AcqRel) {
                break;
            }
            continue;
        };

        let id = entry.meta.id;
        match entry.payload.attempt().await {
            Ok(()) => tracing::debug!("task {} completed", id),
            Err(e) if entry.meta.retries_left > 0 => {
                entry.meta.retries_left -= 1;
                tracing::warn!(
                    "task {} failed: {}; retrying ({} left)",
                    id,
                    e,
                    entry.meta.retries_left
                );
                tokio::time::sleep(shared.retry_delay).await;
                shared.queue.lock().requeue_front(entry);
            }
            Err(e) => {
                tracing::warn!("task {} failed: {}; no retries left", id, e);
                entry.payload.fail(e);
            }
        }
    }
    tracing::debug!("queue drain idle");
}
