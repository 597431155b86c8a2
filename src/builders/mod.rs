//! Builders wiring an engine from configuration.

pub mod engine_builder;

pub use engine_builder::{build_engine, build_engine_with_store, open_store};
