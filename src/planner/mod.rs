//! Teacher assignment planning.
//!
//! Decides which teacher owns each (class, subject) pair for a term, balancing
//! weekly load, spreading classes fairly across qualified teachers and keeping
//! semester-1 teachers in semester 2 where possible.

mod assign;
mod ledger;

pub use assign::{
    AssignmentPlanner, PlanContext, PlanOutcome, PlanRequest, UnassignedPair, UnassignedReason,
};
pub use ledger::{LoadLedger, TeacherLoad};
