//! Teacher roster model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Grade, SubjectId, TeacherId};

/// A subject a teacher may teach, with the grades they are cleared for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    /// Subject taught.
    pub subject: SubjectId,
    /// Grades the teacher may take this subject in.
    pub grades: Vec<Grade>,
}

/// A teacher as seen by the engine. Read-only; maintained by the roster screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherProfile {
    /// Stable identifier.
    pub id: TeacherId,
    /// Display name.
    pub name: String,
    /// Subject the teacher is primarily hired for.
    #[serde(default)]
    pub primary_subject: Option<SubjectId>,
    /// Subjects and grades the teacher may be assigned.
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
    /// Contractual weekly periods before reductions.
    pub base_weekly_lessons: u16,
    /// Periods removed for duties (head of department, union, ...).
    #[serde(default)]
    pub reduced_lessons: u16,
    /// Voluntary periods on top of the base quota.
    #[serde(default)]
    pub extra_lessons: u16,
    /// Administrative ceiling on weekly periods.
    #[serde(default)]
    pub max_weekly_lessons: Option<u16>,
    /// Maximum number of classes per grade.
    #[serde(default)]
    pub max_classes_per_grade: BTreeMap<Grade, u16>,
    /// School leaders are never picked by automatic assignment.
    #[serde(default)]
    pub is_leader: bool,
}

impl TeacherProfile {
    /// Create a teacher with a base weekly quota and no qualifications.
    pub fn new(id: impl Into<TeacherId>, name: impl Into<String>, base_weekly_lessons: u16) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            primary_subject: None,
            qualifications: Vec::new(),
            base_weekly_lessons,
            reduced_lessons: 0,
            extra_lessons: 0,
            max_weekly_lessons: None,
            max_classes_per_grade: BTreeMap::new(),
            is_leader: false,
        }
    }

    /// Add a qualification for `subject` in `grades`.
    #[must_use]
    pub fn with_qualification(mut self, subject: impl Into<SubjectId>, grades: &[Grade]) -> Self {
        self.qualifications.push(Qualification {
            subject: subject.into(),
            grades: grades.to_vec(),
        });
        self
    }

    /// Set the primary subject.
    #[must_use]
    pub fn with_primary_subject(mut self, subject: impl Into<SubjectId>) -> Self {
        self.primary_subject = Some(subject.into());
        self
    }

    /// Set duty reductions and voluntary extra periods.
    #[must_use]
    pub const fn with_adjustments(mut self, reduced: u16, extra: u16) -> Self {
        self.reduced_lessons = reduced;
        self.extra_lessons = extra;
        self
    }

    /// Set the administrative weekly ceiling.
    #[must_use]
    pub const fn with_ceiling(mut self, max_weekly_lessons: u16) -> Self {
        self.max_weekly_lessons = Some(max_weekly_lessons);
        self
    }

    /// Cap the number of classes this teacher may take in `grade`.
    #[must_use]
    pub fn with_grade_cap(mut self, grade: Grade, max_classes: u16) -> Self {
        self.max_classes_per_grade.insert(grade, max_classes);
        self
    }

    /// Mark the teacher as part of school leadership.
    #[must_use]
    pub const fn as_leader(mut self) -> Self {
        self.is_leader = true;
        self
    }

    /// Weekly periods the teacher can actually take:
    /// `base - reductions + extra`, capped by the administrative ceiling.
    #[must_use]
    pub fn effective_weekly_lessons(&self) -> u16 {
        let raw = self
            .base_weekly_lessons
            .saturating_sub(self.reduced_lessons)
            .saturating_add(self.extra_lessons);
        self.max_weekly_lessons.map_or(raw, |ceiling| raw.min(ceiling))
    }

    /// Whether the teacher is cleared for `subject` in `grade`.
    #[must_use]
    pub fn can_teach(&self, subject: &SubjectId, grade: Grade) -> bool {
        self.qualifications
            .iter()
            .any(|q| &q.subject == subject && q.grades.contains(&grade))
    }

    /// Whether `subject` is this teacher's primary subject.
    #[must_use]
    pub fn is_primary_for(&self, subject: &SubjectId) -> bool {
        self.primary_subject.as_ref() == Some(subject)
    }

    /// Explicit class cap for `grade`, if any.
    #[must_use]
    pub fn grade_cap(&self, grade: Grade) -> Option<u16> {
        self.max_classes_per_grade.get(&grade).copied()
    }
}
