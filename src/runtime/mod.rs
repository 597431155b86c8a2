//! Tokio runtime adapter and the engine facade.

pub mod api;
pub mod tokio_spawner;

pub use api::TimetableEngine;
pub use tokio_spawner::TokioSpawner;
