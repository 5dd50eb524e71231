//! Typed scheduling conflicts.
//!
//! Conflicts are kept structured inside the engine. `Display` renders the
//! fixed message templates that external consumers parse, and
//! [`Conflict::parse`] reads back the kinds the suggestion engine can act on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::CourseCode;

/// Why a (course, group) demand could not be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum Conflict {
    /// The group lists a course code the catalogue does not know.
    CourseDataMissing { course: CourseCode, group: String },
    /// No room of the required kind holds the group.
    NoSuitableRoom {
        course: CourseCode,
        group: String,
        size: u32,
    },
    /// Nobody lists the course as expertise.
    NoSuitableFaculty { course: CourseCode, group: String },
    /// Faculty, room and group never share a free slot.
    NoAvailableSlot { course: CourseCode, group: String },
}

const NO_ROOM_PREFIX: &str = "No suitable room found for ";
const NO_SLOT_PREFIX: &str = "Could not find any available slot for ";

impl Conflict {
    pub fn course(&self) -> &str {
        match self {
            Conflict::CourseDataMissing { course, .. }
            | Conflict::NoSuitableRoom { course, .. }
            | Conflict::NoSuitableFaculty { course, .. }
            | Conflict::NoAvailableSlot { course, .. } => course,
        }
    }

    pub fn group(&self) -> &str {
        match self {
            Conflict::CourseDataMissing { group, .. }
            | Conflict::NoSuitableRoom { group, .. }
            | Conflict::NoSuitableFaculty { group, .. }
            | Conflict::NoAvailableSlot { group, .. } => group,
        }
    }

    /// Parses a rendered `NoSuitableRoom` or `NoAvailableSlot` message.
    ///
    /// The other templates drop identifiers the suggestion engine would
    /// need, so they are not recognised and yield `None`, as does any
    /// free text.
    pub fn parse(message: &str) -> Option<Conflict> {
        if let Some(rest) = message.strip_prefix(NO_SLOT_PREFIX) {
            let (course, group) = rest.split_once(" for group ")?;
            return (!course.is_empty() && !group.is_empty()).then(|| Conflict::NoAvailableSlot {
                course: course.to_string(),
                group: group.to_string(),
            });
        }

        // "{course} (Group: {group}, Size: {size})"
        let rest = message.strip_prefix(NO_ROOM_PREFIX)?;
        let (course, rest) = rest.split_once(" (Group: ")?;
        let rest = rest.strip_suffix(')')?;
        let (group, size) = rest.rsplit_once(", Size: ")?;
        let size = size.parse().ok()?;
        Some(Conflict::NoSuitableRoom {
            course: course.to_string(),
            group: group.to_string(),
            size,
        })
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::CourseDataMissing { group, .. } => {
                write!(f, "Course data not found for a course in group {}", group)
            }
            Conflict::NoSuitableRoom {
                course,
                group,
                size,
            } => write!(
                f,
                "{}{} (Group: {}, Size: {})",
                NO_ROOM_PREFIX, course, group, size
            ),
            Conflict::NoSuitableFaculty { course, .. } => {
                write!(f, "No faculty with expertise for {}", course)
            }
            Conflict::NoAvailableSlot { course, group } => {
                write!(f, "{}{} for group {}", NO_SLOT_PREFIX, course, group)
            }
        }
    }
}

/// A conflict as it arrives from outside: structured, or a rendered message.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConflictInput {
    Structured(Conflict),
    Message(String),
}

impl ConflictInput {
    pub fn resolve(&self) -> Option<Conflict> {
        match self {
            ConflictInput::Structured(conflict) => Some(conflict.clone()),
            ConflictInput::Message(message) => Conflict::parse(message),
        }
    }
}
