//! Committed timetable slots and their storage backends.

pub mod file;
pub mod memory;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::EngineError;
use crate::infra::lock::SlotKey;
use crate::model::{
    AvailabilitySeed, BusySlot, ClassId, ClassTimetable, ItemRef, SubjectId, TeacherId, Term,
    Weekday,
};

pub use file::FileSlotStore;
pub use memory::InMemorySlotStore;

/// One committed (class, day, period) cell with its subject and teacher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAssignment {
    /// Teacher in charge.
    pub teacher: TeacherId,
    /// Class taught.
    pub class: ClassId,
    /// Subject taught.
    pub subject: SubjectId,
    /// Day.
    pub day: Weekday,
    /// 1-based period.
    pub period: u8,
    /// Term.
    pub term: Term,
}

impl SlotAssignment {
    /// Create a slot assignment.
    pub fn new(
        teacher: impl Into<TeacherId>,
        class: impl Into<ClassId>,
        subject: impl Into<SubjectId>,
        day: Weekday,
        period: u8,
        term: Term,
    ) -> Self {
        Self {
            teacher: teacher.into(),
            class: class.into(),
            subject: subject.into(),
            day,
            period,
            term,
        }
    }

    /// Lock key of the teacher slot this assignment occupies.
    #[must_use]
    pub fn lock_key(&self) -> SlotKey {
        SlotKey::new(self.teacher.clone(), self.day, self.period, self.term)
    }

    /// Whether `other` targets the same class cell.
    #[must_use]
    pub fn same_cell(&self, other: &Self) -> bool {
        self.class == other.class
            && self.day == other.day
            && self.period == other.period
            && self.term == other.term
    }

    /// Every staffed subject cell of a generated timetable.
    #[must_use]
    pub fn from_timetable(timetable: &ClassTimetable) -> Vec<Self> {
        timetable
            .occupied()
            .filter_map(|(day, period, cell)| {
                let occupant = cell.occupant.as_ref()?;
                let (ItemRef::Subject(subject), Some(teacher)) = (&occupant.item, &occupant.teacher)
                else {
                    return None;
                };
                Some(Self {
                    teacher: teacher.clone(),
                    class: timetable.class.clone(),
                    subject: subject.clone(),
                    day,
                    period,
                    term: timetable.term,
                })
            })
            .collect()
    }
}

/// Storage of committed slots.
pub trait SlotStore: Send {
    /// All slots of `term`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Store`] when the backend cannot be read.
    fn slots(&self, term: Term) -> Result<Vec<SlotAssignment>, EngineError>;

    /// Write `slots`, each replacing whatever held the same class cell.
    ///
    /// # Errors
    ///
    /// [`EngineError::Store`] when the backend cannot be written.
    fn upsert_all(&mut self, slots: &[SlotAssignment]) -> Result<(), EngineError>;

    /// Drop every slot of `classes` in `term`, then write `slots`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Store`] when the backend cannot be written.
    fn replace_classes(
        &mut self,
        term: Term,
        classes: &[ClassId],
        slots: &[SlotAssignment],
    ) -> Result<(), EngineError>;

    /// Slot in which `teacher` already teaches at (`day`, `period`, `term`).
    ///
    /// # Errors
    ///
    /// [`EngineError::Store`] when the backend cannot be read.
    fn teacher_slot(
        &self,
        teacher: &TeacherId,
        day: Weekday,
        period: u8,
        term: Term,
    ) -> Result<Option<SlotAssignment>, EngineError> {
        Ok(self
            .slots(term)?
            .into_iter()
            .find(|s| &s.teacher == teacher && s.day == day && s.period == period))
    }
}

/// Store shared between the coordinator and queued tasks.
pub type SharedSlotStore = Arc<Mutex<dyn SlotStore>>;

/// Wrap a store for sharing.
pub fn shared<S: SlotStore + 'static>(store: S) -> SharedSlotStore {
    Arc::new(Mutex::new(store))
}

/// Remove the slots of `classes` in `term` from `current`.
pub(crate) fn clear(current: &mut Vec<SlotAssignment>, term: Term, classes: &[ClassId]) {
    current.retain(|s| s.term != term || !classes.contains(&s.class));
}

/// Replace same-cell entries of `current` by `incoming`, keeping order.
pub(crate) fn merge(current: &mut Vec<SlotAssignment>, incoming: &[SlotAssignment]) {
    for slot in incoming {
        match current.iter_mut().find(|s| s.same_cell(slot)) {
            Some(existing) => existing.clone_from(slot),
            None => current.push(slot.clone()),
        }
    }
}

impl AvailabilitySeed {
    /// Busy slots committed in `store` for `term`, skipping the classes about
    /// to be regenerated.
    ///
    /// # Errors
    ///
    /// [`EngineError::Store`] when the backend cannot be read.
    pub fn from_store(
        store: &dyn SlotStore,
        term: Term,
        regenerating: &[ClassId],
    ) -> Result<Self, EngineError> {
        let busy = store
            .slots(term)?
            .into_iter()
            .filter(|s| !regenerating.contains(&s.class))
            .map(|s| BusySlot {
                teacher: s.teacher,
                day: s.day,
                period: s.period,
            })
            .collect();
        Ok(Self { busy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Occupant, Semester};

    fn term() -> Term {
        Term::new(2024, Semester::Second)
    }

    #[test]
    fn test_merge_replaces_same_cell() {
        let mut current = vec![
            SlotAssignment::new("t1", "10a", "math", Weekday::Monday, 1, term()),
            SlotAssignment::new("t2", "10a", "lit", Weekday::Monday, 2, term()),
        ];
        merge(
            &mut current,
            &[
                SlotAssignment::new("t3", "10a", "art", Weekday::Monday, 1, term()),
                SlotAssignment::new("t1", "10b", "math", Weekday::Monday, 1, term()),
            ],
        );
        assert_eq!(current.len(), 3);
        assert_eq!(current[0].subject, SubjectId::new("art"));
    }

    #[test]
    fn test_replace_classes_drops_stale_cells() {
        let mut store = InMemorySlotStore::with_slots(vec![
            SlotAssignment::new("t1", "10a", "math", Weekday::Monday, 1, term()),
            SlotAssignment::new("t1", "10a", "math", Weekday::Friday, 4, term()),
            SlotAssignment::new("t2", "10b", "lit", Weekday::Monday, 1, term()),
        ]);
        store
            .replace_classes(
                term(),
                &[ClassId::new("10a")],
                &[SlotAssignment::new("t1", "10a", "math", Weekday::Tuesday, 2, term())],
            )
            .unwrap();

        let slots = store.slots(term()).unwrap();
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.day != Weekday::Friday));
    }

    #[test]
    fn test_seed_skips_regenerated_classes() {
        let mut store = InMemorySlotStore::new();
        store
            .upsert_all(&[
                SlotAssignment::new("t1", "10a", "math", Weekday::Monday, 1, term()),
                SlotAssignment::new("t2", "10b", "lit", Weekday::Monday, 1, term()),
                SlotAssignment::new("t3", "10c", "art", Weekday::Monday, 1, term().first_semester()),
            ])
            .unwrap();

        let seed = AvailabilitySeed::from_store(&store, term(), &[ClassId::new("10b")]).unwrap();
        assert_eq!(seed.busy.len(), 1);
        assert_eq!(seed.busy[0].teacher, TeacherId::new("t1"));
    }

    #[test]
    fn test_from_timetable_keeps_staffed_subjects() {
        let mut t = ClassTimetable::empty(ClassId::new("10a"), 10, term(), [(Weekday::Monday, 2)]);
        t.days[0].cells[0].occupant = Some(Occupant {
            item: ItemRef::Subject(SubjectId::new("math")),
            name: "Math".into(),
            teacher: Some(TeacherId::new("t1")),
        });
        t.days[0].cells[1].occupant = Some(Occupant {
            item: ItemRef::Activity("club".into()),
            name: "Club".into(),
            teacher: None,
        });

        let slots = SlotAssignment::from_timetable(&t);
        assert_eq!(
            slots,
            vec![SlotAssignment::new("t1", "10a", "math", Weekday::Monday, 1, term())]
        );
    }
}
