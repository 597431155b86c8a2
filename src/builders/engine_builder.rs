//! Build a ready-to-use engine from configuration.

use std::sync::Arc;

use anyhow::Context;

use crate::config::{EngineConfig, StoreBackendConfig};
use crate::core::{AppResult, Spawn};
use crate::infra::store::shared;
use crate::infra::{FileSlotStore, InMemorySlotStore, LockTable, SharedSlotStore};
use crate::runtime::TimetableEngine;
use crate::service::{spawn_lock_sweeper, ScheduleQueue, SlotCoordinator};

/// Open the slot store selected by `backend`.
///
/// # Errors
///
/// Fails when a file store cannot be opened or parsed.
pub fn open_store(backend: &StoreBackendConfig) -> AppResult<SharedSlotStore> {
    match backend {
        StoreBackendConfig::InMemory => Ok(shared(InMemorySlotStore::new())),
        StoreBackendConfig::File { path } => {
            let store = FileSlotStore::open(path)
                .with_context(|| format!("opening slot store at {}", path.display()))?;
            Ok(shared(store))
        }
    }
}

/// Validate `config`, open its store and wire the engine.
///
/// Must be called from within the runtime `spawner` targets, since the lock
/// sweeper starts immediately.
///
/// # Errors
///
/// Fails on invalid configuration or an unreadable store.
pub fn build_engine<S>(config: EngineConfig, spawner: S) -> AppResult<TimetableEngine<S>>
where
    S: Spawn + Clone,
{
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config invalid: {e}"))?;
    let store = open_store(&config.store)?;
    build_engine_with_store(config, store, spawner)
}

/// Wire the engine around an already-open store.
///
/// # Errors
///
/// Fails on invalid configuration.
pub fn build_engine_with_store<S>(
    config: EngineConfig,
    store: SharedSlotStore,
    spawner: S,
) -> AppResult<TimetableEngine<S>>
where
    S: Spawn + Clone,
{
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config invalid: {e}"))?;

    let locks = Arc::new(LockTable::new(config.locks.lock_timeout()));
    spawn_lock_sweeper(&locks, config.locks.sweep_interval(), &spawner);
    let queue = ScheduleQueue::new(&config.queue, spawner);
    let slots = SlotCoordinator::new(queue, locks, store);

    tracing::info!(
        "timetable engine ready (queue depth {}, lock timeout {}s, store {:?})",
        config.queue.max_queue_depth,
        config.locks.lock_timeout_secs,
        config.store
    );
    Ok(TimetableEngine::new(config, slots))
}
