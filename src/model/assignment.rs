//! Teacher-to-(class, subject) assignments and their typed index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ClassId, SubjectId, TeacherId, Term};

/// One teacher owning one subject in one class for one term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeachingAssignment {
    /// Teacher in charge.
    pub teacher: TeacherId,
    /// Subject taught.
    pub subject: SubjectId,
    /// Class taught.
    pub class: ClassId,
    /// School year and semester.
    pub term: Term,
}

impl TeachingAssignment {
    /// Create an assignment.
    pub fn new(
        teacher: impl Into<TeacherId>,
        subject: impl Into<SubjectId>,
        class: impl Into<ClassId>,
        term: Term,
    ) -> Self {
        Self {
            teacher: teacher.into(),
            subject: subject.into(),
            class: class.into(),
            term,
        }
    }
}

/// Lookup of the teacher owning each (class, subject) pair in one term.
///
/// Assignments for other terms are ignored. If the input holds more than one
/// assignment for the same pair, the last one wins.
#[derive(Debug, Clone, Default)]
pub struct AssignmentIndex {
    by_pair: HashMap<(ClassId, SubjectId), TeacherId>,
}

impl AssignmentIndex {
    /// Index the assignments of `term`.
    #[must_use]
    pub fn for_term(assignments: &[TeachingAssignment], term: Term) -> Self {
        let by_pair = assignments
            .iter()
            .filter(|a| a.term == term)
            .map(|a| ((a.class.clone(), a.subject.clone()), a.teacher.clone()))
            .collect();
        Self { by_pair }
    }

    /// Teacher for (`class`, `subject`), if assigned.
    #[must_use]
    pub fn teacher_for(&self, class: &ClassId, subject: &SubjectId) -> Option<&TeacherId> {
        self.by_pair.get(&(class.clone(), subject.clone()))
    }

    /// Whether (`class`, `subject`) already has a teacher.
    #[must_use]
    pub fn contains(&self, class: &ClassId, subject: &SubjectId) -> bool {
        self.by_pair.contains_key(&(class.clone(), subject.clone()))
    }

    /// Number of indexed pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    /// Whether no pair is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }
}
