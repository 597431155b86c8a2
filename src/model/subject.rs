//! Subjects and recurring activities to be placed on the timetable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ActivityId, Grade, SubjectId, Weekday};

/// Which block of the day an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    /// The grade's primary academic block.
    #[default]
    Main,
    /// The complementary supplementary block.
    Extra,
}

/// Placement rules for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRule {
    /// Stable identifier.
    pub id: SubjectId,
    /// Display name.
    pub name: String,
    /// Grades the subject is taught in.
    pub grades: Vec<Grade>,
    /// Weekly periods when no per-grade override exists.
    pub periods_per_week: u8,
    /// Per-grade weekly period overrides.
    #[serde(default)]
    pub periods_per_grade: BTreeMap<Grade, u8>,
    /// Maximum periods on a single day within its session.
    pub max_per_day: u8,
    /// Whether two consecutive periods may be placed together.
    #[serde(default)]
    pub allow_double: bool,
    /// Session the subject is placed in.
    #[serde(default)]
    pub session: Session,
}

impl SubjectRule {
    /// Create a main-session subject with at most one period a day.
    pub fn new(
        id: impl Into<SubjectId>,
        name: impl Into<String>,
        grades: &[Grade],
        periods_per_week: u8,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grades: grades.to_vec(),
            periods_per_week,
            periods_per_grade: BTreeMap::new(),
            max_per_day: 1,
            allow_double: false,
            session: Session::Main,
        }
    }

    /// Set the per-day cap.
    #[must_use]
    pub const fn with_max_per_day(mut self, max_per_day: u8) -> Self {
        self.max_per_day = max_per_day;
        self
    }

    /// Allow double periods.
    #[must_use]
    pub const fn with_double(mut self) -> Self {
        self.allow_double = true;
        self
    }

    /// Move the subject to the given session.
    #[must_use]
    pub const fn in_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Override the weekly period count for one grade.
    #[must_use]
    pub fn with_grade_periods(mut self, grade: Grade, periods: u8) -> Self {
        self.periods_per_grade.insert(grade, periods);
        self
    }

    /// Whether the subject is taught in `grade`.
    #[must_use]
    pub fn applies_to(&self, grade: Grade) -> bool {
        self.grades.contains(&grade)
    }

    /// Weekly periods required in `grade`, or 0 if the subject does not apply.
    #[must_use]
    pub fn periods_for(&self, grade: Grade) -> u8 {
        if !self.applies_to(grade) {
            return 0;
        }
        self.periods_per_grade
            .get(&grade)
            .copied()
            .unwrap_or(self.periods_per_week)
    }
}

/// How an activity is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityPlacement {
    /// Pinned to one slot and locked against displacement.
    Fixed {
        /// Day of the slot.
        day: Weekday,
        /// 1-based period of the slot.
        period: u8,
    },
    /// Placed like a subject.
    Flexible {
        /// Weekly periods required.
        periods_per_week: u8,
        /// Maximum periods on a single day.
        max_per_day: u8,
    },
}

/// A recurring non-subject commitment (assembly, homeroom, club time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySlot {
    /// Stable identifier.
    pub id: ActivityId,
    /// Display name.
    pub name: String,
    /// Grades the activity applies to; empty means every grade.
    #[serde(default)]
    pub grades: Vec<Grade>,
    /// Session tag.
    #[serde(default)]
    pub session: Session,
    /// Fixed or flexible placement.
    pub placement: ActivityPlacement,
}

impl ActivitySlot {
    /// A locked activity at (`day`, `period`).
    pub fn fixed(
        id: impl Into<ActivityId>,
        name: impl Into<String>,
        grades: &[Grade],
        day: Weekday,
        period: u8,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grades: grades.to_vec(),
            session: Session::Main,
            placement: ActivityPlacement::Fixed { day, period },
        }
    }

    /// An activity placed `periods_per_week` times, at most once a day.
    pub fn flexible(
        id: impl Into<ActivityId>,
        name: impl Into<String>,
        grades: &[Grade],
        periods_per_week: u8,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grades: grades.to_vec(),
            session: Session::Main,
            placement: ActivityPlacement::Flexible {
                periods_per_week,
                max_per_day: 1,
            },
        }
    }

    /// Move the activity to the given session.
    #[must_use]
    pub const fn in_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Whether the activity applies to `grade`.
    #[must_use]
    pub fn applies_to(&self, grade: Grade) -> bool {
        self.grades.is_empty() || self.grades.contains(&grade)
    }

    /// Whether the activity is locked to a slot.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self.placement, ActivityPlacement::Fixed { .. })
    }
}
