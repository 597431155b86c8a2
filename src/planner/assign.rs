//! Greedy single-pass teacher assignment.
//!
//! # Algorithm
//!
//! 1. Account existing assignments of the target term into a [`LoadLedger`].
//! 2. For every (class, subject) pair still missing a teacher, in roster order:
//!    - in semester 2, reuse the semester-1 teacher if they are not a leader
//!      and stay within weekly capacity;
//!    - otherwise rank qualified non-leaders (primary subject first, then
//!      fewest assignments) and take the first one passing every load check.
//! 3. Update the ledger immediately after each pick.
//!
//! Pairs nobody can take are reported, never fatal. There is no backtracking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ledger::LoadLedger;
use crate::model::{
    AssignmentIndex, ClassId, ClassInfo, Grade, Semester, SubjectId, SubjectRule, TeacherId,
    TeacherProfile, TeachingAssignment, Term,
};

/// What to plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Grades to cover; empty means every grade in the roster.
    pub grades: Vec<Grade>,
    /// Target school year and semester.
    pub term: Term,
}

impl PlanRequest {
    /// Plan `grades` for `term`.
    #[must_use]
    pub fn new(grades: &[Grade], term: Term) -> Self {
        Self {
            grades: grades.to_vec(),
            term,
        }
    }

    fn covers(&self, grade: Grade) -> bool {
        self.grades.is_empty() || self.grades.contains(&grade)
    }
}

/// Reference data the planner reads.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    /// Class roster.
    pub classes: &'a [ClassInfo],
    /// Subject rules.
    pub subjects: &'a [SubjectRule],
    /// Teacher roster.
    pub teachers: &'a [TeacherProfile],
    /// Assignments already persisted, any term.
    pub existing: &'a [TeachingAssignment],
}

/// Why a pair was left without a teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// Nobody outside leadership is qualified for the subject in this grade.
    NoEligibleTeacher,
    /// Every qualified teacher is at a load limit.
    CapacityExhausted,
}

/// A (class, subject) pair the run could not staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedPair {
    /// Class.
    pub class: ClassId,
    /// Subject.
    pub subject: SubjectId,
    /// Grade of the class.
    pub grade: Grade,
    /// Reason.
    pub reason: UnassignedReason,
}

/// Result of a planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOutcome {
    /// New assignments to persist.
    pub assignments: Vec<TeachingAssignment>,
    /// Pairs left without a teacher.
    pub unassigned: Vec<UnassignedPair>,
    /// How many of the new assignments carried a semester-1 teacher over.
    pub continued: usize,
}

impl PlanOutcome {
    /// Whether every pair got a teacher.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }
}

/// Plans teacher assignments over a roster.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentPlanner<'a> {
    ctx: PlanContext<'a>,
}

impl<'a> AssignmentPlanner<'a> {
    /// Create a planner over `ctx`.
    #[must_use]
    pub const fn new(ctx: PlanContext<'a>) -> Self {
        Self { ctx }
    }

    /// Produce assignments for every uncovered (class, subject) pair.
    #[must_use]
    pub fn plan(&self, request: &PlanRequest) -> PlanOutcome {
        let term = request.term;
        let classes: HashMap<&ClassId, &ClassInfo> =
            self.ctx.classes.iter().map(|c| (&c.id, c)).collect();
        let subjects: HashMap<&SubjectId, &SubjectRule> =
            self.ctx.subjects.iter().map(|s| (&s.id, s)).collect();
        let teachers: HashMap<&TeacherId, &TeacherProfile> =
            self.ctx.teachers.iter().map(|t| (&t.id, t)).collect();

        let same_year: Vec<TeachingAssignment> = self
            .ctx
            .existing
            .iter()
            .filter(|a| a.term.same_year(term))
            .cloned()
            .collect();
        let covered = AssignmentIndex::for_term(&same_year, term);
        let previous = match term.semester {
            Semester::Second => AssignmentIndex::for_term(&same_year, term.first_semester()),
            Semester::First => AssignmentIndex::default(),
        };

        let mut ledger = LoadLedger::default();
        for a in same_year.iter().filter(|a| a.term == term) {
            let (Some(class), Some(subject)) = (classes.get(&a.class), subjects.get(&a.subject))
            else {
                continue;
            };
            ledger.record(
                &a.teacher,
                &a.subject,
                &a.class,
                class.grade,
                subject.periods_for(class.grade),
            );
        }

        let roster: &'a [ClassInfo] = self.ctx.classes;
        let targets: Vec<&'a ClassInfo> = roster
            .iter()
            .filter(|c| request.covers(c.grade))
            .collect();
        let fair_share = self.fair_share(&targets);

        let mut outcome = PlanOutcome::default();
        let subject_rules: &'a [SubjectRule] = self.ctx.subjects;
        let pending = targets.iter().copied().flat_map(|class| {
            subject_rules
                .iter()
                .filter(move |s| s.periods_for(class.grade) > 0)
                .map(move |s| (class, s))
        });

        tracing::info!(
            "planning teacher assignments for {} ({} classes, {} teachers)",
            term,
            targets.len(),
            self.ctx.teachers.len()
        );

        for (class, subject) in pending {
            if covered.contains(&class.id, &subject.id) {
                continue;
            }
            let periods = subject.periods_for(class.grade);

            let carried = previous
                .teacher_for(&class.id, &subject.id)
                .and_then(|id| teachers.get(id).copied())
                .filter(|t| {
                    !t.is_leader
                        && ledger.weekly_periods(&t.id) + u32::from(periods)
                            <= u32::from(t.effective_weekly_lessons())
                });

            let picked = if let Some(teacher) = carried {
                outcome.continued += 1;
                Ok(teacher)
            } else {
                let ceiling = fair_share
                    .get(&(class.grade, &subject.id))
                    .copied()
                    .unwrap_or(0);
                self.select(&ledger, class, subject, ceiling)
            };

            match picked {
                Ok(teacher) => {
                    tracing::debug!(
                        "assigned {} to {} in class {}",
                        teacher.id,
                        subject.id,
                        class.id
                    );
                    ledger.record(&teacher.id, &subject.id, &class.id, class.grade, periods);
                    outcome.assignments.push(TeachingAssignment {
                        teacher: teacher.id.clone(),
                        subject: subject.id.clone(),
                        class: class.id.clone(),
                        term,
                    });
                }
                Err(reason) => {
                    tracing::warn!(
                        "no teacher for {} in class {}: {:?}",
                        subject.id,
                        class.id,
                        reason
                    );
                    outcome.unassigned.push(UnassignedPair {
                        class: class.id.clone(),
                        subject: subject.id.clone(),
                        grade: class.grade,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            "planned {} assignments ({} carried over), {} pairs unassigned",
            outcome.assignments.len(),
            outcome.continued,
            outcome.unassigned.len()
        );
        outcome
    }

    /// Qualified teachers outside leadership, in roster order.
    fn eligible(&self, subject: &SubjectId, grade: Grade) -> impl Iterator<Item = &'a TeacherProfile> {
        let subject = subject.clone();
        let teachers: &'a [TeacherProfile] = self.ctx.teachers;
        teachers
            .iter()
            .filter(move |t| !t.is_leader && t.can_teach(&subject, grade))
    }

    /// ceil(classes needing the subject in a grade / eligible teachers).
    fn fair_share(&self, targets: &[&'a ClassInfo]) -> HashMap<(Grade, &'a SubjectId), u32> {
        let mut needing: HashMap<(Grade, &'a SubjectId), u32> = HashMap::new();
        for class in targets {
            for subject in self.ctx.subjects {
                if subject.periods_for(class.grade) > 0 {
                    *needing.entry((class.grade, &subject.id)).or_default() += 1;
                }
            }
        }
        needing
            .into_iter()
            .filter_map(|((grade, subject), classes)| {
                let teachers = u32::try_from(self.eligible(subject, grade).count()).ok()?;
                (teachers > 0).then(|| ((grade, subject), classes.div_ceil(teachers)))
            })
            .collect()
    }

    fn select(
        &self,
        ledger: &LoadLedger,
        class: &ClassInfo,
        subject: &SubjectRule,
        fair_share: u32,
    ) -> Result<&'a TeacherProfile, UnassignedReason> {
        let mut ranked: Vec<&'a TeacherProfile> = self.eligible(&subject.id, class.grade).collect();
        if ranked.is_empty() {
            return Err(UnassignedReason::NoEligibleTeacher);
        }
        ranked.sort_by_key(|t| (!t.is_primary_for(&subject.id), ledger.assignments(&t.id)));

        let periods = u32::from(subject.periods_for(class.grade));
        ranked
            .into_iter()
            .find(|t| {
                let load = ledger.load(&t.id);
                let capacity = u32::from(t.effective_weekly_lessons());
                let within_weekly = load.weekly_periods + periods <= capacity;
                let within_derived = load.subject_classes(&subject.id) < capacity / periods;
                let within_fair_share =
                    load.subject_grade_classes(&subject.id, class.grade) < fair_share;
                let within_grade_cap = t.grade_cap(class.grade).is_none_or(|cap| {
                    load.grade_classes_with(class.grade, &class.id) <= usize::from(cap)
                });
                within_weekly && within_derived && within_fair_share && within_grade_cap
            })
            .ok_or(UnassignedReason::CapacityExhausted)
    }
}
