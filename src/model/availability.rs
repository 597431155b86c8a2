//! Per-teacher free/busy grids used during one generation run.
//!
//! A [`TeacherAvailability`] is built fresh at the start of every run from an
//! [`AvailabilitySeed`] and is owned by that run alone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ClassTimetable, TeacherId, Weekday};

/// Day×period grid of free slots for one teacher, stored as a flat arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityMatrix {
    width: usize,
    free: Vec<bool>,
}

impl AvailabilityMatrix {
    /// A fully free grid of `days` rows and `width` periods.
    #[must_use]
    pub fn new(days: usize, width: usize) -> Self {
        Self {
            width,
            free: vec![true; days * width],
        }
    }

    fn offset(&self, day: usize, idx: usize) -> Option<usize> {
        (idx < self.width)
            .then_some(day * self.width + idx)
            .filter(|&o| o < self.free.len())
    }

    /// Whether the 0-based slot is free. Out-of-range slots are never free.
    #[must_use]
    pub fn is_free(&self, day: usize, idx: usize) -> bool {
        self.offset(day, idx).is_some_and(|o| self.free[o])
    }

    /// Mark the slot occupied.
    pub fn occupy(&mut self, day: usize, idx: usize) {
        if let Some(o) = self.offset(day, idx) {
            self.free[o] = false;
        }
    }

    /// Number of free slots.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.iter().filter(|f| **f).count()
    }
}

/// A slot in which a teacher is already busy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusySlot {
    /// Busy teacher.
    pub teacher: TeacherId,
    /// Day.
    pub day: Weekday,
    /// 1-based period.
    pub period: u8,
}

/// Persisted state a generation run starts from: declared unavailability and
/// slots already committed for classes outside the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilitySeed {
    /// Busy slots.
    pub busy: Vec<BusySlot>,
}

impl AvailabilitySeed {
    /// An empty seed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a busy slot.
    #[must_use]
    pub fn with_busy(mut self, teacher: impl Into<TeacherId>, day: Weekday, period: u8) -> Self {
        self.busy.push(BusySlot {
            teacher: teacher.into(),
            day,
            period,
        });
        self
    }
}

/// Availability of every teacher for one generation run.
#[derive(Debug, Clone)]
pub struct TeacherAvailability {
    days: Vec<Weekday>,
    width: usize,
    matrices: HashMap<TeacherId, AvailabilityMatrix>,
}

impl TeacherAvailability {
    /// Empty availability for a week of `days`, each at most `width` periods long.
    #[must_use]
    pub fn new(days: Vec<Weekday>, width: usize) -> Self {
        Self {
            days,
            width,
            matrices: HashMap::new(),
        }
    }

    /// Availability with every seeded busy slot marked occupied.
    /// Slots on days outside the week are ignored.
    #[must_use]
    pub fn from_seed(days: Vec<Weekday>, width: usize, seed: &AvailabilitySeed) -> Self {
        let mut availability = Self::new(days, width);
        for slot in &seed.busy {
            let Some(day) = availability.day_index(slot.day) else {
                continue;
            };
            if let Some(idx) = usize::from(slot.period).checked_sub(1) {
                availability.occupy(&slot.teacher, day, idx);
            }
        }
        availability
    }

    /// Position of `day` in the week.
    #[must_use]
    pub fn day_index(&self, day: Weekday) -> Option<usize> {
        self.days.iter().position(|d| *d == day)
    }

    /// Whether `teacher` is free at the 0-based slot. Teachers never seen are free.
    #[must_use]
    pub fn is_free(&self, teacher: &TeacherId, day: usize, idx: usize) -> bool {
        match self.matrices.get(teacher) {
            Some(m) => m.is_free(day, idx),
            None => day < self.days.len() && idx < self.width,
        }
    }

    /// Mark `teacher` busy at the 0-based slot.
    pub fn occupy(&mut self, teacher: &TeacherId, day: usize, idx: usize) {
        let (days, width) = (self.days.len(), self.width);
        self.matrices
            .entry(teacher.clone())
            .or_insert_with(|| AvailabilityMatrix::new(days, width))
            .occupy(day, idx);
    }

    /// Mark every teacher cell of `timetable` busy.
    pub fn occupy_timetable(&mut self, timetable: &ClassTimetable) {
        for (day, schedule) in timetable.days.iter().enumerate() {
            for (idx, cell) in schedule.cells.iter().enumerate() {
                if let Some(teacher) = cell.teacher() {
                    self.occupy(teacher, day, idx);
                }
            }
        }
    }

    /// Matrix for `teacher`, if any slot was ever marked.
    #[must_use]
    pub fn matrix(&self, teacher: &TeacherId) -> Option<&AvailabilityMatrix> {
        self.matrices.get(teacher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_occupy_and_bounds() {
        let mut m = AvailabilityMatrix::new(2, 3);
        assert_eq!(m.free_count(), 6);
        m.occupy(1, 2);
        assert!(!m.is_free(1, 2));
        assert!(m.is_free(0, 2));
        assert_eq!(m.free_count(), 5);
        assert!(!m.is_free(0, 3));
        assert!(!m.is_free(2, 0));
    }

    #[test]
    fn test_from_seed_marks_busy_slots() {
        let seed = AvailabilitySeed::new()
            .with_busy("t1", Weekday::Tuesday, 2)
            .with_busy("t1", Weekday::Saturday, 1);
        let avail = TeacherAvailability::from_seed(
            vec![Weekday::Monday, Weekday::Tuesday],
            4,
            &seed,
        );
        let t1 = TeacherId::new("t1");
        assert!(!avail.is_free(&t1, 1, 1));
        assert!(avail.is_free(&t1, 0, 1));
        assert_eq!(avail.matrix(&t1).map(AvailabilityMatrix::free_count), Some(7));
        assert!(avail.is_free(&TeacherId::new("t2"), 1, 1));
    }
}
