//! Timestamped slot locks with timeout-based abandonment.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::model::{TeacherId, Term, Weekday};
use crate::util::clock::now_ms;

/// Key of one teacher slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// Teacher.
    pub teacher: TeacherId,
    /// Day.
    pub day: Weekday,
    /// 1-based period.
    pub period: u8,
    /// Term.
    pub term: Term,
}

impl SlotKey {
    /// Create a key.
    pub fn new(teacher: impl Into<TeacherId>, day: Weekday, period: u8, term: Term) -> Self {
        Self {
            teacher: teacher.into(),
            day,
            period,
            term,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} p{} {}",
            self.teacher, self.day, self.period, self.term
        )
    }
}

/// Map of held slot locks to their acquisition time.
///
/// A lock older than the timeout is considered abandoned: the next
/// [`acquire`](Self::acquire) replaces it and [`sweep_expired`](Self::sweep_expired)
/// evicts it.
#[derive(Debug)]
pub struct LockTable {
    timeout_ms: u128,
    locks: Mutex<HashMap<SlotKey, u128>>,
}

impl LockTable {
    /// Create an empty table with the given abandonment timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout_ms: timeout.as_millis(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Try to take the lock on `key`. Returns `false` if a live lock holds it.
    pub fn acquire(&self, key: &SlotKey) -> bool {
        self.acquire_at(key, now_ms())
    }

    /// [`acquire`](Self::acquire) against an explicit clock.
    pub fn acquire_at(&self, key: &SlotKey, now_ms: u128) -> bool {
        let mut locks = self.locks.lock();
        if let Some(&taken_at) = locks.get(key) {
            if now_ms.saturating_sub(taken_at) < self.timeout_ms {
                return false;
            }
            tracing::warn!("replacing abandoned lock on {}", key);
        }
        locks.insert(key.clone(), now_ms);
        true
    }

    /// Drop the lock on `key`. Returns whether one was held.
    pub fn release(&self, key: &SlotKey) -> bool {
        self.locks.lock().remove(key).is_some()
    }

    /// Evict every lock older than the timeout. Returns how many were evicted.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(now_ms())
    }

    /// [`sweep_expired`](Self::sweep_expired) against an explicit clock.
    pub fn sweep_expired_at(&self, now_ms: u128) -> usize {
        let timeout = self.timeout_ms;
        let mut locks = self.locks.lock();
        let before = locks.len();
        locks.retain(|key, taken_at| {
            let live = now_ms.saturating_sub(*taken_at) < timeout;
            if !live {
                tracing::warn!("evicting abandoned lock on {}", key);
            }
            live
        });
        before - locks.len()
    }

    /// Whether a lock entry exists for `key`, live or not.
    #[must_use]
    pub fn is_held(&self, key: &SlotKey) -> bool {
        self.locks.lock().contains_key(key)
    }

    /// Number of lock entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    /// Whether no lock is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
