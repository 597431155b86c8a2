//! Randomized bounded-retry timetable generation.
//!
//! Each class is built from an empty grid: locked activities first, then the
//! main-session items, the extra-session items and a second pass over
//! anything still short. Teacher availability is shared across the batch so
//! later classes see the slots earlier ones took. Remaining teacher clashes
//! trigger regeneration of the offending classes.

mod conflicts;
mod generate;
mod items;
mod placement;
mod report;

pub use conflicts::find_clashes;
pub use generate::{GenerationRequest, TimetableGenerator};
pub use items::{items_for_class, PlacementItem, SessionWindows};
pub use placement::ClassPlacer;
pub use report::{GenerationReport, Shortfall, ShortfallReason, TeacherClash};
