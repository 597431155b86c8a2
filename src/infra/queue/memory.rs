//! In-memory priority queue, FIFO within a priority.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{EngineError, QueuedTask, TaskQueue};

/// Heap entry ordered by (requeued, priority, arrival), highest first.
struct Ranked<P> {
    front: bool,
    seq: u64,
    task: QueuedTask<P>,
}

impl<P> Ranked<P> {
    fn key(&self) -> (bool, crate::util::serde::Priority) {
        (self.front, self.task.meta.priority)
    }
}

impl<P> PartialEq for Ranked<P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P> Eq for Ranked<P> {}

impl<P> PartialOrd for Ranked<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Ranked<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.key().cmp(&other.key()) {
            // Regular entries: lower sequence first. Requeued ones: latest first.
            Ordering::Equal if self.front => self.seq.cmp(&other.seq),
            Ordering::Equal => other.seq.cmp(&self.seq),
            ord => ord,
        }
    }
}

/// In-memory queue using a binary heap.
pub struct InMemoryQueue<P> {
    max_depth: usize,
    next_seq: u64,
    tasks: BinaryHeap<Ranked<P>>,
}

impl<P> InMemoryQueue<P> {
    /// Create an empty queue holding at most `max_depth` tasks.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            next_seq: 0,
            tasks: BinaryHeap::with_capacity(max_depth.min(1024)),
        }
    }

    fn push(&mut self, front: bool, task: QueuedTask<P>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(Ranked { front, seq, task });
    }
}

impl<P> TaskQueue<P> for InMemoryQueue<P> {
    fn enqueue(&mut self, task: QueuedTask<P>) -> Result<(), EngineError> {
        if self.len() >= self.max_depth() {
            return Err(EngineError::QueueFull(format!(
                "max queue depth {} reached",
                self.max_depth
            )));
        }
        self.push(false, task);
        Ok(())
    }

    fn requeue_front(&mut self, task: QueuedTask<P>) {
        self.push(true, task);
    }

    fn dequeue(&mut self) -> Option<QueuedTask<P>> {
        self.tasks.pop().map(|r| r.task)
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }
}
