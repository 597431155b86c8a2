//! In-memory slot store for development and tests.

use super::{clear, merge, SlotAssignment, SlotStore};
use crate::core::EngineError;
use crate::model::{ClassId, Term};

/// Slot store kept in a vector.
#[derive(Debug, Clone, Default)]
pub struct InMemorySlotStore {
    slots: Vec<SlotAssignment>,
}

impl InMemorySlotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `slots`.
    #[must_use]
    pub fn with_slots(slots: Vec<SlotAssignment>) -> Self {
        Self { slots }
    }
}

impl SlotStore for InMemorySlotStore {
    fn slots(&self, term: Term) -> Result<Vec<SlotAssignment>, EngineError> {
        Ok(self.slots.iter().filter(|s| s.term == term).cloned().collect())
    }

    fn upsert_all(&mut self, slots: &[SlotAssignment]) -> Result<(), EngineError> {
        merge(&mut self.slots, slots);
        Ok(())
    }

    fn replace_classes(
        &mut self,
        term: Term,
        classes: &[ClassId],
        slots: &[SlotAssignment],
    ) -> Result<(), EngineError> {
        clear(&mut self.slots, term, classes);
        merge(&mut self.slots, slots);
        Ok(())
    }
}
