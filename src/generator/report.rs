//! Generation output and the human-readable shortfall report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CapacityViolation;
use crate::model::{ClassId, ClassTimetable, ItemRef, TeacherId, Term, Weekday};

/// Why an item did not reach its weekly periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallReason {
    /// The subject has no teacher for this class and term.
    Unstaffed,
    /// The item's session has no periods for this grade.
    NoWindow,
    /// Placement attempts ran out.
    AttemptsExhausted,
}

impl fmt::Display for ShortfallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Unstaffed => "no teacher assigned",
            Self::NoWindow => "no periods in its session",
            Self::AttemptsExhausted => "attempts exhausted",
        };
        f.write_str(text)
    }
}

/// An item placed fewer times than required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    /// Class concerned.
    pub class: ClassId,
    /// Item concerned.
    pub item: ItemRef,
    /// Display name of the item.
    pub name: String,
    /// Periods placed.
    pub placed: usize,
    /// Periods required per week.
    pub required: usize,
    /// Reason.
    pub reason: ShortfallReason,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "class {}: {} placed {}/{} ({})",
            self.class, self.name, self.placed, self.required, self.reason
        )
    }
}

/// A teacher placed in several classes at the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherClash {
    /// Teacher double-booked.
    pub teacher: TeacherId,
    /// Day of the slot.
    pub day: Weekday,
    /// 1-based period of the slot.
    pub period: u8,
    /// Classes sharing the slot, in batch order.
    pub classes: Vec<ClassId>,
}

/// Everything a generation run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Term generated.
    pub term: Term,
    /// One timetable per class, in input order.
    pub timetables: Vec<ClassTimetable>,
    /// Items that missed their weekly periods.
    pub shortfalls: Vec<Shortfall>,
    /// Grades whose main session is over-subscribed.
    pub capacity_violations: Vec<CapacityViolation>,
    /// Clashes left after the regeneration budget ran out.
    pub clashes: Vec<TeacherClash>,
    /// Number of regeneration rounds performed.
    pub regenerations: u32,
}

impl GenerationReport {
    /// Whether every item was fully placed without clashes.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty() && self.clashes.is_empty()
    }

    /// Timetable of `class`.
    #[must_use]
    pub fn timetable(&self, class: &ClassId) -> Option<&ClassTimetable> {
        self.timetables.iter().find(|t| &t.class == class)
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "timetables for {}: {} classes, {} shortfalls, {} clashes, {} regenerations",
            self.term,
            self.timetables.len(),
            self.shortfalls.len(),
            self.clashes.len(),
            self.regenerations
        )?;
        for violation in &self.capacity_violations {
            writeln!(f, "  capacity: {violation}")?;
        }
        for shortfall in &self.shortfalls {
            writeln!(f, "  shortfall: {shortfall}")?;
        }
        for clash in &self.clashes {
            let classes: Vec<&str> = clash.classes.iter().map(ClassId::as_str).collect();
            writeln!(
                f,
                "  clash: {} on {} period {} in {}",
                clash.teacher,
                clash.day,
                clash.period,
                classes.join(", ")
            )?;
        }
        Ok(())
    }
}
