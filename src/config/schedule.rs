//! Schedule configuration: the week's grid shape, session rules per grade and
//! the subjects and activities to place.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::model::{ActivityPlacement, ActivitySlot, Grade, Session, SubjectRule, Weekday};

/// Period counts of one school day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    /// Weekday.
    pub day: Weekday,
    /// Periods before the midday break.
    pub morning_periods: u8,
    /// Periods after the midday break.
    pub afternoon_periods: u8,
}

impl DayConfig {
    /// Create a day.
    #[must_use]
    pub const fn new(day: Weekday, morning_periods: u8, afternoon_periods: u8) -> Self {
        Self {
            day,
            morning_periods,
            afternoon_periods,
        }
    }

    /// Total periods in the day.
    #[must_use]
    pub fn total_periods(&self) -> usize {
        usize::from(self.morning_periods) + usize::from(self.afternoon_periods)
    }
}

/// Which part of the day is a grade's main session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradeSession {
    /// Morning is main, afternoon is extra.
    Morning,
    /// Afternoon is main, morning is extra.
    Afternoon,
    /// The whole day is main; there is no extra session.
    #[default]
    Both,
}

impl GradeSession {
    /// 0-based period range of `session` on `day`.
    #[must_use]
    pub fn window(self, day: &DayConfig, session: Session) -> Range<usize> {
        let morning = usize::from(day.morning_periods);
        let total = day.total_periods();
        match (self, session) {
            (Self::Morning, Session::Main) | (Self::Afternoon, Session::Extra) => 0..morning,
            (Self::Morning, Session::Extra) | (Self::Afternoon, Session::Main) => morning..total,
            (Self::Both, Session::Main) => 0..total,
            (Self::Both, Session::Extra) => 0..0,
        }
    }
}

/// A grade whose main-session demand exceeds its main-session capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityViolation {
    /// Grade concerned.
    pub grade: Grade,
    /// Periods per week declared for the main session.
    pub demand: usize,
    /// Main-session periods available per week.
    pub capacity: usize,
}

impl fmt::Display for CapacityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grade {}: main session needs {} periods but only {} exist",
            self.grade, self.demand, self.capacity
        )
    }
}

/// The full schedule configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// School days in timetable order.
    pub days: Vec<DayConfig>,
    /// Main-session orientation per grade; missing grades use [`GradeSession::Both`].
    #[serde(default)]
    pub grade_sessions: BTreeMap<Grade, GradeSession>,
    /// Subjects to place.
    #[serde(default)]
    pub subjects: Vec<SubjectRule>,
    /// Activities to place.
    #[serde(default)]
    pub activities: Vec<ActivitySlot>,
}

impl ScheduleConfig {
    /// A configuration with `days` and nothing to place yet.
    #[must_use]
    pub fn new(days: Vec<DayConfig>) -> Self {
        Self {
            days,
            grade_sessions: BTreeMap::new(),
            subjects: Vec::new(),
            activities: Vec::new(),
        }
    }

    /// Set the main-session orientation of `grade`.
    #[must_use]
    pub fn with_grade_session(mut self, grade: Grade, session: GradeSession) -> Self {
        self.grade_sessions.insert(grade, session);
        self
    }

    /// Add a subject rule.
    #[must_use]
    pub fn with_subject(mut self, subject: SubjectRule) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Add an activity.
    #[must_use]
    pub fn with_activity(mut self, activity: ActivitySlot) -> Self {
        self.activities.push(activity);
        self
    }

    /// Main-session orientation of `grade`.
    #[must_use]
    pub fn grade_session(&self, grade: Grade) -> GradeSession {
        self.grade_sessions.get(&grade).copied().unwrap_or_default()
    }

    /// `(day, periods)` for every configured day.
    #[must_use]
    pub fn shape(&self) -> Vec<(Weekday, usize)> {
        self.days.iter().map(|d| (d.day, d.total_periods())).collect()
    }

    /// Configured weekdays in order.
    #[must_use]
    pub fn weekdays(&self) -> Vec<Weekday> {
        self.days.iter().map(|d| d.day).collect()
    }

    /// Longest day in periods.
    #[must_use]
    pub fn width(&self) -> usize {
        self.days.iter().map(DayConfig::total_periods).max().unwrap_or(0)
    }

    /// Main-session periods per week for `grade`.
    #[must_use]
    pub fn main_capacity(&self, grade: Grade) -> usize {
        let orientation = self.grade_session(grade);
        self.days
            .iter()
            .map(|d| orientation.window(d, Session::Main).len())
            .sum()
    }

    /// Validate the grid shape and item definitions.
    pub fn validate(&self) -> Result<(), String> {
        if self.days.is_empty() {
            return Err("at least one school day must be defined".into());
        }
        let mut seen_days = HashSet::new();
        for day in &self.days {
            if !seen_days.insert(day.day) {
                return Err(format!("day `{}` is defined twice", day.day));
            }
            if day.total_periods() == 0 {
                return Err(format!("day `{}` has no periods", day.day));
            }
        }

        let mut subject_ids = HashSet::new();
        for subject in &self.subjects {
            if !subject_ids.insert(&subject.id) {
                return Err(format!("subject `{}` is defined twice", subject.id));
            }
            if subject.max_per_day == 0 {
                return Err(format!("subject `{}`: max_per_day must be greater than 0", subject.id));
            }
        }

        let mut activity_ids = HashSet::new();
        let mut fixed_slots = HashSet::new();
        for activity in &self.activities {
            if !activity_ids.insert(&activity.id) {
                return Err(format!("activity `{}` is defined twice", activity.id));
            }
            match activity.placement {
                ActivityPlacement::Fixed { day, period } => {
                    let Some(cfg) = self.days.iter().find(|d| d.day == day) else {
                        return Err(format!(
                            "activity `{}` is fixed on `{day}`, which is not a school day",
                            activity.id
                        ));
                    };
                    if period == 0 || usize::from(period) > cfg.total_periods() {
                        return Err(format!(
                            "activity `{}`: period {period} is outside `{day}` (1..={})",
                            activity.id,
                            cfg.total_periods()
                        ));
                    }
                    for grade in self.fixed_grades(activity) {
                        if !fixed_slots.insert((grade, day, period)) {
                            return Err(format!(
                                "activity `{}` collides with another fixed activity on `{day}` period {period}",
                                activity.id
                            ));
                        }
                    }
                }
                ActivityPlacement::Flexible { max_per_day, .. } => {
                    if max_per_day == 0 {
                        return Err(format!(
                            "activity `{}`: max_per_day must be greater than 0",
                            activity.id
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Grades whose main-session demand exceeds main-session capacity.
    #[must_use]
    pub fn capacity_report(&self) -> Vec<CapacityViolation> {
        self.known_grades()
            .into_iter()
            .filter_map(|grade| {
                let demand = self.main_demand(grade);
                let capacity = self.main_capacity(grade);
                (demand > capacity).then_some(CapacityViolation {
                    grade,
                    demand,
                    capacity,
                })
            })
            .collect()
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn main_demand(&self, grade: Grade) -> usize {
        let subjects: usize = self
            .subjects
            .iter()
            .filter(|s| s.session == Session::Main)
            .map(|s| usize::from(s.periods_for(grade)))
            .sum();
        let orientation = self.grade_session(grade);
        let activities: usize = self
            .activities
            .iter()
            .filter(|a| a.session == Session::Main && a.applies_to(grade))
            .map(|a| match a.placement {
                ActivityPlacement::Flexible {
                    periods_per_week, ..
                } => usize::from(periods_per_week),
                ActivityPlacement::Fixed { day, period } => self
                    .days
                    .iter()
                    .find(|d| d.day == day)
                    .map_or(0, |d| {
                        let main = orientation.window(d, Session::Main);
                        let inside = usize::from(period)
                            .checked_sub(1)
                            .is_some_and(|idx| main.contains(&idx));
                        usize::from(inside)
                    }),
            })
            .sum();
        subjects + activities
    }

    fn known_grades(&self) -> BTreeSet<Grade> {
        let mut grades: BTreeSet<Grade> = self.grade_sessions.keys().copied().collect();
        grades.extend(self.subjects.iter().flat_map(|s| s.grades.iter().copied()));
        grades.extend(self.activities.iter().flat_map(|a| a.grades.iter().copied()));
        grades
    }

    fn fixed_grades(&self, activity: &ActivitySlot) -> Vec<Option<Grade>> {
        if activity.grades.is_empty() {
            let mut all: Vec<Option<Grade>> = self.known_grades().into_iter().map(Some).collect();
            all.push(None);
            all
        } else {
            activity.grades.iter().copied().map(Some).collect()
        }
    }
}
