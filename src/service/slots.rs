//! Conflict-checked, lock-guarded slot commits through the schedule queue.

use std::sync::Arc;

use async_trait::async_trait;

use super::queue::{ScheduleQueue, TaskHandle};
use crate::core::{EngineError, QueueTask, Spawn};
use crate::infra::{LockTable, SharedSlotStore, SlotAssignment, SlotKey, SlotStore};
use crate::model::{ClassId, TeacherId, Term, Weekday};
use crate::util::serde::Priority;

/// Entry point for single-slot and batch edits of committed timetables.
pub struct SlotCoordinator<S> {
    queue: ScheduleQueue<S>,
    locks: Arc<LockTable>,
    store: SharedSlotStore,
}

impl<S: Clone> Clone for SlotCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            locks: Arc::clone(&self.locks),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Spawn> SlotCoordinator<S> {
    /// Wire a coordinator over a queue, a lock table and a store.
    pub fn new(queue: ScheduleQueue<S>, locks: Arc<LockTable>, store: SharedSlotStore) -> Self {
        Self {
            queue,
            locks,
            store,
        }
    }

    /// Fail with [`EngineError::TeacherConflict`] if `teacher` already
    /// teaches a class at (`day`, `period`) in `term`.
    ///
    /// # Errors
    ///
    /// `TeacherConflict` on a clash, `Store` when the store cannot be read.
    pub fn check_teacher_conflict(
        &self,
        teacher: &TeacherId,
        day: Weekday,
        period: u8,
        term: Term,
    ) -> Result<(), EngineError> {
        let store = self.store.lock();
        match store.teacher_slot(teacher, day, period, term)? {
            Some(existing) => Err(conflict(&existing)),
            None => Ok(()),
        }
    }

    /// Queue a single-slot change. Resolves to the number of slots written.
    ///
    /// # Errors
    ///
    /// [`EngineError::QueueFull`] when the queue rejects the task.
    pub fn enqueue_slot_change(
        &self,
        slot: SlotAssignment,
        priority: Priority,
    ) -> Result<TaskHandle<usize>, EngineError> {
        self.enqueue_batch(vec![slot], priority)
    }

    /// Queue an all-or-nothing batch. Every slot is checked before any write.
    ///
    /// # Errors
    ///
    /// [`EngineError::QueueFull`] when the queue rejects the task.
    pub fn enqueue_batch(
        &self,
        slots: Vec<SlotAssignment>,
        priority: Priority,
    ) -> Result<TaskHandle<usize>, EngineError> {
        tracing::info!("queueing commit of {} slots", slots.len());
        self.submit(slots, None, priority)
    }

    /// Queue a batch that replaces every committed slot of `classes` in
    /// `term`, as when newly generated timetables are committed.
    ///
    /// # Errors
    ///
    /// [`EngineError::QueueFull`] when the queue rejects the task.
    pub fn enqueue_replacement(
        &self,
        term: Term,
        classes: Vec<ClassId>,
        slots: Vec<SlotAssignment>,
        priority: Priority,
    ) -> Result<TaskHandle<usize>, EngineError> {
        tracing::info!(
            "queueing replacement of {} classes with {} slots",
            classes.len(),
            slots.len()
        );
        self.submit(slots, Some((term, classes)), priority)
    }

    fn submit(
        &self,
        slots: Vec<SlotAssignment>,
        replacing: Option<(Term, Vec<ClassId>)>,
        priority: Priority,
    ) -> Result<TaskHandle<usize>, EngineError> {
        self.queue.submit(
            CommitSlots {
                slots,
                replacing,
                locks: Arc::clone(&self.locks),
                store: Arc::clone(&self.store),
            },
            priority,
        )
    }

    /// Store shared with queued tasks.
    #[must_use]
    pub const fn store(&self) -> &SharedSlotStore {
        &self.store
    }

    /// Lock table guarding teacher slots.
    #[must_use]
    pub const fn locks(&self) -> &Arc<LockTable> {
        &self.locks
    }
}

fn conflict(existing: &SlotAssignment) -> EngineError {
    EngineError::TeacherConflict {
        teacher: existing.teacher.clone(),
        existing_class: existing.class.clone(),
        day: existing.day,
        period: existing.period,
        term: existing.term,
    }
}

/// Queued commit: re-read, check, lock, write, unlock.
struct CommitSlots {
    slots: Vec<SlotAssignment>,
    replacing: Option<(Term, Vec<ClassId>)>,
    locks: Arc<LockTable>,
    store: SharedSlotStore,
}

impl CommitSlots {
    /// Whether `existing` is about to be dropped by this commit.
    fn replaces(&self, existing: &SlotAssignment) -> bool {
        self.replacing
            .as_ref()
            .is_some_and(|(term, classes)| existing.term == *term && classes.contains(&existing.class))
    }

    fn write(&self, store: &mut dyn SlotStore) -> Result<(), EngineError> {
        match &self.replacing {
            Some((term, classes)) => store.replace_classes(*term, classes, &self.slots),
            None => store.upsert_all(&self.slots),
        }
    }

    fn check(&self, store: &dyn SlotStore) -> Result<(), EngineError> {
        for (i, slot) in self.slots.iter().enumerate() {
            let clash_in_batch = self.slots[..i].iter().find(|other| {
                other.lock_key() == slot.lock_key() && other.class != slot.class
            });
            if let Some(other) = clash_in_batch {
                return Err(conflict(other));
            }
            let existing = store.teacher_slot(&slot.teacher, slot.day, slot.period, slot.term)?;
            if let Some(existing) = existing {
                if existing.class != slot.class && !self.replaces(&existing) {
                    return Err(conflict(&existing));
                }
            }
        }
        Ok(())
    }

    fn lock_all(&self) -> Result<Vec<SlotKey>, EngineError> {
        let mut held: Vec<SlotKey> = Vec::with_capacity(self.slots.len());
        for key in self.slots.iter().map(SlotAssignment::lock_key) {
            if held.contains(&key) {
                continue;
            }
            if !self.locks.acquire(&key) {
                self.release_all(&held);
                return Err(EngineError::SlotBusy(key.to_string()));
            }
            held.push(key);
        }
        Ok(held)
    }

    fn release_all(&self, keys: &[SlotKey]) {
        for key in keys {
            self.locks.release(key);
        }
    }
}

#[async_trait]
impl QueueTask for CommitSlots {
    type Output = usize;

    async fn run(&self) -> Result<usize, EngineError> {
        self.check(&*self.store.lock())?;
        let held = self.lock_all()?;
        let written = {
            let mut store = self.store.lock();
            // Re-check under the locks: a writer outside the queue may have
            // landed between the first check and acquisition.
            self.check(&*store).and_then(|()| self.write(&mut *store))
        };
        self.release_all(&held);
        written?;
        tracing::info!("committed {} slots", self.slots.len());
        Ok(self.slots.len())
    }
}
