//! Class (homeroom group) model.

use serde::{Deserialize, Serialize};

use super::{ClassId, Grade};

/// A class that receives a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Stable identifier.
    pub id: ClassId,
    /// Display name, e.g. "10A".
    pub name: String,
    /// Grade the class belongs to.
    pub grade: Grade,
}

impl ClassInfo {
    /// Create a class.
    pub fn new(id: impl Into<ClassId>, name: impl Into<String>, grade: Grade) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade,
        }
    }
}
