//! Running per-teacher load counters for one planning run.

use std::collections::{HashMap, HashSet};

use crate::model::{ClassId, Grade, SubjectId, TeacherId};

/// Load carried by one teacher in the target term.
#[derive(Debug, Clone, Default)]
pub struct TeacherLoad {
    /// Number of (class, subject) assignments.
    pub assignments: u32,
    /// Sum of weekly periods across assignments.
    pub weekly_periods: u32,
    by_subject: HashMap<SubjectId, u32>,
    by_subject_grade: HashMap<(SubjectId, Grade), u32>,
    grade_classes: HashMap<Grade, HashSet<ClassId>>,
}

impl TeacherLoad {
    /// Classes taught in `subject` across all grades.
    #[must_use]
    pub fn subject_classes(&self, subject: &SubjectId) -> u32 {
        self.by_subject.get(subject).copied().unwrap_or(0)
    }

    /// Classes taught in `subject` within `grade`.
    #[must_use]
    pub fn subject_grade_classes(&self, subject: &SubjectId, grade: Grade) -> u32 {
        self.by_subject_grade
            .get(&(subject.clone(), grade))
            .copied()
            .unwrap_or(0)
    }

    /// Distinct classes of `grade` the teacher would teach if `class` were added.
    #[must_use]
    pub fn grade_classes_with(&self, grade: Grade, class: &ClassId) -> usize {
        self.grade_classes.get(&grade).map_or(1, |set| {
            if set.contains(class) {
                set.len()
            } else {
                set.len() + 1
            }
        })
    }
}

/// Load of every teacher, updated after each selection.
#[derive(Debug, Default)]
pub struct LoadLedger {
    loads: HashMap<TeacherId, TeacherLoad>,
}

impl LoadLedger {
    /// Current load of `teacher`.
    #[must_use]
    pub fn load(&self, teacher: &TeacherId) -> TeacherLoad {
        self.loads.get(teacher).cloned().unwrap_or_default()
    }

    /// Number of assignments `teacher` holds.
    #[must_use]
    pub fn assignments(&self, teacher: &TeacherId) -> u32 {
        self.loads.get(teacher).map_or(0, |l| l.assignments)
    }

    /// Weekly periods `teacher` already teaches.
    #[must_use]
    pub fn weekly_periods(&self, teacher: &TeacherId) -> u32 {
        self.loads.get(teacher).map_or(0, |l| l.weekly_periods)
    }

    /// Account one more (class, subject) for `teacher`.
    pub fn record(
        &mut self,
        teacher: &TeacherId,
        subject: &SubjectId,
        class: &ClassId,
        grade: Grade,
        periods: u8,
    ) {
        let load = self.loads.entry(teacher.clone()).or_default();
        load.assignments += 1;
        load.weekly_periods += u32::from(periods);
        *load.by_subject.entry(subject.clone()).or_default() += 1;
        *load
            .by_subject_grade
            .entry((subject.clone(), grade))
            .or_default() += 1;
        load.grade_classes
            .entry(grade)
            .or_default()
            .insert(class.clone());
    }
}
