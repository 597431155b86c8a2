//! Infrastructure adapters: task queue, slot locks and slot storage.

pub mod lock;
pub mod queue;
pub mod store;

pub use lock::{LockTable, SlotKey};
pub use queue::InMemoryQueue;
pub use store::{
    FileSlotStore, InMemorySlotStore, SharedSlotStore, SlotAssignment, SlotStore,
};
