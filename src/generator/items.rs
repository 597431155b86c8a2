//! Flattening subjects and activities into per-class placement items.

use std::ops::Range;

use super::report::{Shortfall, ShortfallReason};
use crate::config::ScheduleConfig;
use crate::model::{
    ActivityPlacement, AssignmentIndex, ClassInfo, ItemRef, Occupant, Session, TeacherId,
};

/// One subject or flexible activity to place in one class.
#[derive(Debug, Clone)]
pub struct PlacementItem {
    /// Item reference.
    pub item: ItemRef,
    /// Display name.
    pub name: String,
    /// Weekly periods required.
    pub required: usize,
    /// Per-day cap within the session.
    pub max_per_day: usize,
    /// Whether double periods may be attempted.
    pub allow_double: bool,
    /// Session the item lives in.
    pub session: Session,
    /// Teacher, for subjects.
    pub teacher: Option<TeacherId>,
}

impl PlacementItem {
    pub(crate) fn occupant(&self) -> Occupant {
        Occupant {
            item: self.item.clone(),
            name: self.name.clone(),
            teacher: self.teacher.clone(),
        }
    }
}

/// Items for `class` in configuration order, plus an `Unstaffed` shortfall
/// for every subject without a teacher.
pub fn items_for_class(
    schedule: &ScheduleConfig,
    class: &ClassInfo,
    index: &AssignmentIndex,
) -> (Vec<PlacementItem>, Vec<Shortfall>) {
    let mut items = Vec::new();
    let mut unstaffed = Vec::new();

    for subject in &schedule.subjects {
        let required = usize::from(subject.periods_for(class.grade));
        if required == 0 {
            continue;
        }
        let item = ItemRef::Subject(subject.id.clone());
        let Some(teacher) = index.teacher_for(&class.id, &subject.id) else {
            unstaffed.push(Shortfall {
                class: class.id.clone(),
                item,
                name: subject.name.clone(),
                placed: 0,
                required,
                reason: ShortfallReason::Unstaffed,
            });
            continue;
        };
        items.push(PlacementItem {
            item,
            name: subject.name.clone(),
            required,
            max_per_day: usize::from(subject.max_per_day),
            allow_double: subject.allow_double,
            session: subject.session,
            teacher: Some(teacher.clone()),
        });
    }

    for activity in schedule.activities.iter().filter(|a| a.applies_to(class.grade)) {
        if let ActivityPlacement::Flexible {
            periods_per_week,
            max_per_day,
        } = activity.placement
        {
            if periods_per_week == 0 {
                continue;
            }
            items.push(PlacementItem {
                item: ItemRef::Activity(activity.id.clone()),
                name: activity.name.clone(),
                required: usize::from(periods_per_week),
                max_per_day: usize::from(max_per_day),
                allow_double: false,
                session: activity.session,
                teacher: None,
            });
        }
    }

    (items, unstaffed)
}

/// Main and extra period ranges of every day for one grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionWindows {
    main: Vec<Range<usize>>,
    extra: Vec<Range<usize>>,
}

impl SessionWindows {
    /// Windows of a grade under `schedule`.
    #[must_use]
    pub fn for_grade(schedule: &ScheduleConfig, grade: crate::model::Grade) -> Self {
        let orientation = schedule.grade_session(grade);
        let main = schedule
            .days
            .iter()
            .map(|d| orientation.window(d, Session::Main))
            .collect();
        let extra = schedule
            .days
            .iter()
            .map(|d| orientation.window(d, Session::Extra))
            .collect();
        Self { main, extra }
    }

    /// Per-day ranges of `session`.
    #[must_use]
    pub fn get(&self, session: Session) -> &[Range<usize>] {
        match session {
            Session::Main => &self.main,
            Session::Extra => &self.extra,
        }
    }

    /// Whether `session` has at least one period in the week.
    #[must_use]
    pub fn has_periods(&self, session: Session) -> bool {
        self.get(session).iter().any(|w| !w.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DayConfig, GradeSession};
    use crate::model::{ActivitySlot, Semester, SubjectRule, TeachingAssignment, Term, Weekday};

    fn schedule() -> ScheduleConfig {
        ScheduleConfig::new(vec![
            DayConfig::new(Weekday::Monday, 4, 2),
            DayConfig::new(Weekday::Tuesday, 3, 3),
        ])
        .with_grade_session(10, GradeSession::Afternoon)
        .with_subject(SubjectRule::new("math", "Math", &[10], 3))
        .with_subject(SubjectRule::new("art", "Art", &[10], 1).in_session(Session::Extra))
        .with_subject(SubjectRule::new("latin", "Latin", &[11], 2))
        .with_activity(ActivitySlot::flexible("club", "Club", &[], 1))
        .with_activity(ActivitySlot::fixed("flag", "Flag", &[10], Weekday::Monday, 1))
    }

    #[test]
    fn test_items_skip_other_grades_and_report_unstaffed() {
        let term = Term::new(2024, Semester::First);
        let class = ClassInfo::new("10a", "10A", 10);
        let index = AssignmentIndex::for_term(
            &[TeachingAssignment::new("t1", "math", "10a", term)],
            term,
        );

        let (items, unstaffed) = items_for_class(&schedule(), &class, &index);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Math", "Club"]);
        assert_eq!(unstaffed.len(), 1);
        assert_eq!(unstaffed[0].name, "Art");
        assert_eq!(unstaffed[0].reason, ShortfallReason::Unstaffed);
    }

    #[test]
    fn test_session_windows_follow_grade_orientation() {
        let w = SessionWindows::for_grade(&schedule(), 10);
        assert_eq!(w.get(Session::Main), &[4..6, 3..6]);
        assert_eq!(w.get(Session::Extra), &[0..4, 0..3]);

        let both = SessionWindows::for_grade(&schedule(), 11);
        assert!(!both.has_periods(Session::Extra));
        assert!(both.has_periods(Session::Main));
    }
}
