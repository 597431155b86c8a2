//! Serialized slot commits: the schedule queue, lock sweeping and the slot
//! coordinator built on them.

pub mod queue;
pub mod slots;
pub mod sweeper;

pub use queue::{ScheduleQueue, TaskHandle};
pub use slots::SlotCoordinator;
pub use sweeper::spawn_lock_sweeper;
