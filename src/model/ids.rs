//! Stable identifiers and calendar primitives.
//!
//! Every lookup in the engine is keyed by these identifiers. Display names are
//! carried for rendering only and never used to match records.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a teacher.
    TeacherId
);
string_id!(
    /// Identifier of a subject.
    SubjectId
);
string_id!(
    /// Identifier of a class (homeroom group).
    ClassId
);
string_id!(
    /// Identifier of a non-subject activity such as assembly or club time.
    ActivityId
);

/// School grade (year level).
pub type Grade = u8;

/// Half of a school year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semester {
    /// First semester.
    First,
    /// Second semester.
    Second,
}

impl Semester {
    /// 1 or 2.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

/// A (school year, semester) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Calendar year the school year starts in.
    pub school_year: u16,
    /// Semester within the school year.
    pub semester: Semester,
}

impl Term {
    /// Create a term.
    #[must_use]
    pub const fn new(school_year: u16, semester: Semester) -> Self {
        Self {
            school_year,
            semester,
        }
    }

    /// The first semester of the same school year.
    #[must_use]
    pub const fn first_semester(self) -> Self {
        Self::new(self.school_year, Semester::First)
    }

    /// Whether both terms belong to the same school year.
    #[must_use]
    pub const fn same_year(self, other: Self) -> bool {
        self.school_year == other.school_year
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} S{}", self.school_year, self.semester.number())
    }
}

/// Day of the school week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// Monday through Friday.
    pub const WORKWEEK: [Self; 5] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_transparently() {
        let id = TeacherId::new("t-01");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"t-01\"");
        let back: TeacherId = serde_json::from_str("\"t-01\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_term_helpers() {
        let spring = Term::new(2024, Semester::Second);
        assert_eq!(spring.first_semester(), Term::new(2024, Semester::First));
        assert!(spring.same_year(Term::new(2024, Semester::First)));
        assert!(!spring.same_year(Term::new(2025, Semester::Second)));
        assert_eq!(spring.to_string(), "2024 S2");
    }
}
