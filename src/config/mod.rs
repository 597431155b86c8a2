//! Configuration models for the schedule grid and the engine runtime.

pub mod engine;
pub mod schedule;

pub use engine::{EngineConfig, GeneratorConfig, LockConfig, QueueConfig, StoreBackendConfig};
pub use schedule::{CapacityViolation, DayConfig, GradeSession, ScheduleConfig};
