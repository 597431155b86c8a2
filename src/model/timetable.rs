//! Per-class timetable grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ActivityId, ClassId, Grade, SubjectId, TeacherId, Term, Weekday};

/// Reference to a placeable item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ItemRef {
    /// A subject.
    Subject(SubjectId),
    /// A non-subject activity.
    Activity(ActivityId),
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subject(id) => write!(f, "subject:{id}"),
            Self::Activity(id) => write!(f, "activity:{id}"),
        }
    }
}

/// What occupies a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    /// Item placed in the cell.
    pub item: ItemRef,
    /// Display name of the item.
    pub name: String,
    /// Teacher, for subjects.
    pub teacher: Option<TeacherId>,
}

/// Position of a cell inside a double period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairRole {
    /// First period of the pair.
    Lead,
    /// Second period of the pair.
    Follow,
}

/// One period of one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Occupant, if any.
    pub occupant: Option<Occupant>,
    /// Fixed activities are locked and never overwritten.
    pub locked: bool,
    /// Set when the cell belongs to a deliberate double period.
    pub double: Option<PairRole>,
}

impl Cell {
    /// Whether nothing is placed here.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.occupant.is_none() && !self.locked
    }

    /// Whether `item` occupies this cell.
    #[must_use]
    pub fn holds(&self, item: &ItemRef) -> bool {
        self.occupant.as_ref().is_some_and(|o| &o.item == item)
    }

    /// Teacher occupying the cell.
    #[must_use]
    pub fn teacher(&self) -> Option<&TeacherId> {
        self.occupant.as_ref().and_then(|o| o.teacher.as_ref())
    }
}

/// All periods of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Weekday.
    pub day: Weekday,
    /// Cells indexed by `period - 1`.
    pub cells: Vec<Cell>,
}

/// A class's week for one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTimetable {
    /// Class the timetable belongs to.
    pub class: ClassId,
    /// Grade of the class.
    pub grade: Grade,
    /// School year and semester.
    pub term: Term,
    /// Days in configuration order.
    pub days: Vec<DaySchedule>,
}

/// A pair of adjacent cells holding the same unlocked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyViolation {
    /// Day of the pair.
    pub day: Weekday,
    /// 1-based period of the first cell.
    pub period: u8,
    /// Repeated item.
    pub item: ItemRef,
}

impl ClassTimetable {
    /// An empty grid shaped by `(day, periods)` entries.
    pub fn empty(
        class: ClassId,
        grade: Grade,
        term: Term,
        shape: impl IntoIterator<Item = (Weekday, usize)>,
    ) -> Self {
        let days = shape
            .into_iter()
            .map(|(day, periods)| DaySchedule {
                day,
                cells: vec![Cell::default(); periods],
            })
            .collect();
        Self {
            class,
            grade,
            term,
            days,
        }
    }

    /// Cell at 1-based `period` of `day`.
    #[must_use]
    pub fn cell(&self, day: Weekday, period: u8) -> Option<&Cell> {
        let idx = usize::from(period).checked_sub(1)?;
        self.days
            .iter()
            .find(|d| d.day == day)
            .and_then(|d| d.cells.get(idx))
    }

    /// Number of cells holding `item` across the week.
    #[must_use]
    pub fn count_of(&self, item: &ItemRef) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.cells.iter())
            .filter(|c| c.holds(item))
            .count()
    }

    /// Occupied cells as `(day, 1-based period, cell)`.
    pub fn occupied(&self) -> impl Iterator<Item = (Weekday, u8, &Cell)> + '_ {
        self.days.iter().flat_map(|d| {
            d.cells
                .iter()
                .enumerate()
                .filter(|(_, c)| c.occupant.is_some())
                .map(move |(i, c)| (d.day, period_number(i), c))
        })
    }

    /// Adjacent same-item pairs that are neither locked nor a double period.
    #[must_use]
    pub fn adjacency_violations(&self) -> Vec<AdjacencyViolation> {
        let mut violations = Vec::new();
        for day in &self.days {
            for (i, pair) in day.cells.windows(2).enumerate() {
                let (a, b) = (&pair[0], &pair[1]);
                let (Some(oa), Some(ob)) = (&a.occupant, &b.occupant) else {
                    continue;
                };
                if oa.item != ob.item || a.locked || b.locked {
                    continue;
                }
                if a.double == Some(PairRole::Lead) && b.double == Some(PairRole::Follow) {
                    continue;
                }
                violations.push(AdjacencyViolation {
                    day: day.day,
                    period: period_number(i),
                    item: oa.item.clone(),
                });
            }
        }
        violations
    }
}

/// Convert a 0-based cell index to a 1-based period number.
pub(crate) fn period_number(idx: usize) -> u8 {
    u8::try_from(idx + 1).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Semester;

    fn occupant(subject: &str) -> Option<Occupant> {
        Some(Occupant {
            item: ItemRef::Subject(SubjectId::new(subject)),
            name: subject.to_owned(),
            teacher: None,
        })
    }

    fn grid() -> ClassTimetable {
        ClassTimetable::empty(
            ClassId::new("10a"),
            10,
            Term::new(2024, Semester::First),
            [(Weekday::Monday, 4)],
        )
    }

    #[test]
    fn test_adjacent_repeat_is_reported() {
        let mut t = grid();
        t.days[0].cells[1].occupant = occupant("math");
        t.days[0].cells[2].occupant = occupant("math");

        let v = t.adjacency_violations();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].period, 2);
    }

    #[test]
    fn test_double_period_and_locked_cells_are_allowed() {
        let mut t = grid();
        t.days[0].cells[0].occupant = occupant("math");
        t.days[0].cells[0].double = Some(PairRole::Lead);
        t.days[0].cells[1].occupant = occupant("math");
        t.days[0].cells[1].double = Some(PairRole::Follow);
        t.days[0].cells[2].occupant = occupant("assembly");
        t.days[0].cells[2].locked = true;
        t.days[0].cells[3].occupant = occupant("assembly");

        assert!(t.adjacency_violations().is_empty());
        assert_eq!(t.count_of(&ItemRef::Subject(SubjectId::new("math"))), 2);
        assert_eq!(t.occupied().count(), 4);
    }

    #[test]
    fn test_cell_uses_one_based_periods() {
        let t = grid();
        assert!(t.cell(Weekday::Monday, 0).is_none());
        assert!(t.cell(Weekday::Monday, 1).is_some());
        assert!(t.cell(Weekday::Monday, 5).is_none());
        assert!(t.cell(Weekday::Tuesday, 1).is_none());
    }
}
