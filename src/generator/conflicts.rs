//! Post-generation teacher clash detection.

use std::collections::BTreeMap;

use super::report::TeacherClash;
use crate::model::{ClassId, ClassTimetable, TeacherId, Weekday};

/// Slots where one teacher appears in more than one timetable.
///
/// Classes in a clash are listed in batch order, so the first one is the
/// class that keeps its timetable on regeneration.
#[must_use]
pub fn find_clashes(timetables: &[ClassTimetable]) -> Vec<TeacherClash> {
    let mut seen: BTreeMap<(TeacherId, Weekday, u8), Vec<ClassId>> = BTreeMap::new();
    for timetable in timetables {
        for (day, period, cell) in timetable.occupied() {
            if let Some(teacher) = cell.teacher() {
                seen.entry((teacher.clone(), day, period))
                    .or_default()
                    .push(timetable.class.clone());
            }
        }
    }
    seen.into_iter()
        .filter(|(_, classes)| classes.len() > 1)
        .map(|((teacher, day, period), classes)| TeacherClash {
            teacher,
            day,
            period,
            classes,
        })
        .collect()
}
