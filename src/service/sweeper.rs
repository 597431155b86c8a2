//! Background eviction of abandoned slot locks.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::core::Spawn;
use crate::infra::LockTable;

/// Spawn a task sweeping `table` every `interval`.
///
/// The task holds only a weak reference and stops once the table is dropped.
pub fn spawn_lock_sweeper<S: Spawn>(table: &Arc<LockTable>, interval: Duration, spawner: &S) {
    let weak: Weak<LockTable> = Arc::downgrade(table);
    spawner.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let Some(table) = weak.upgrade() else {
                tracing::debug!("lock table dropped, sweeper exiting");
                break;
            };
            let evicted = table.sweep_expired();
            if evicted > 0 {
                tracing::info!("swept {} abandoned slot locks", evicted);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::SlotKey;
    use crate::model::{Semester, Term, Weekday};
    use crate::runtime::TokioSpawner;

    #[tokio::test]
    async fn test_sweeper_evicts_expired_locks() {
        let table = Arc::new(LockTable::new(Duration::from_millis(20)));
        let key = SlotKey::new("t1", Weekday::Monday, 1, Term::new(2024, Semester::First));
        assert!(table.acquire(&key));

        spawn_lock_sweeper(&table, Duration::from_millis(10), &TokioSpawner::current());
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!table.is_held(&key));
    }
}
