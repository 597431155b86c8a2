//! Domain types shared by the planner, generator and slot service.

pub mod assignment;
pub mod availability;
pub mod class;
pub mod ids;
pub mod subject;
pub mod teacher;
pub mod timetable;

pub use assignment::{AssignmentIndex, TeachingAssignment};
pub use availability::{AvailabilityMatrix, AvailabilitySeed, BusySlot, TeacherAvailability};
pub use class::ClassInfo;
pub use ids::{ActivityId, ClassId, Grade, Semester, SubjectId, TeacherId, Term, Weekday};
pub use subject::{ActivityPlacement, ActivitySlot, Session, SubjectRule};
pub use teacher::{Qualification, TeacherProfile};
pub use timetable::{
    AdjacencyViolation, Cell, ClassTimetable, DaySchedule, ItemRef, Occupant, PairRole,
};
