//! Structural checks on a snapshot before it is scheduled.
//!
//! Detects:
//! - Duplicate course codes, faculty ids and names, room ids, group ids and names
//! - Leave requests ending before they start
//! - Leave requests for unknown faculty
//!
//! Dangling course codes in a group are not errors here; they surface as
//! `CourseDataMissing` conflicts.

use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;

use crate::data::Snapshot;
use crate::error::{Error, Result};

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    /// Two entities share an identifier the engine looks them up by.
    DuplicateId,
    /// A leave request ends before it starts.
    InvertedDateRange,
    /// A leave request names a faculty id that does not exist.
    UnknownFaculty,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn push_duplicates<'a>(
    what: &str,
    values: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    for value in values.duplicates() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DuplicateId,
            format!("Duplicate {}: {}", what, value),
        ));
    }
}

/// Returns every problem found, not just the first.
pub fn validate(snapshot: &Snapshot) -> std::result::Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    push_duplicates("course code", snapshot.courses.iter().map(|c| c.code.as_str()), &mut errors);
    push_duplicates("faculty id", snapshot.faculty.iter().map(|f| f.id.as_str()), &mut errors);
    // entries refer to faculty and groups by name
    push_duplicates("faculty name", snapshot.faculty.iter().map(|f| f.name.as_str()), &mut errors);
    push_duplicates("room id", snapshot.rooms.iter().map(|r| r.id.as_str()), &mut errors);
    push_duplicates("group id", snapshot.student_groups.iter().map(|g| g.id.as_str()), &mut errors);
    push_duplicates("group name", snapshot.student_groups.iter().map(|g| g.name.as_str()), &mut errors);

    let faculty_ids: HashSet<&str> = snapshot.faculty.iter().map(|f| f.id.as_str()).collect();
    for leave in &snapshot.leave_requests {
        if leave.end_date < leave.start_date {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedDateRange,
                format!(
                    "Leave request '{}' ends ({}) before it starts ({})",
                    leave.id, leave.end_date, leave.start_date
                ),
            ));
        }
        if !faculty_ids.contains(leave.faculty_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownFaculty,
                format!(
                    "Leave request '{}' references unknown faculty '{}'",
                    leave.id, leave.faculty_id
                ),
            ));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// [`validate`], folded into the crate error.
pub fn ensure_valid(snapshot: &Snapshot) -> Result<()> {
    validate(snapshot).map_err(Error::SnapshotInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LeaveRequest, LeaveStatus};
    use crate::solver::tests::{department, faculty, group, single_demand};
    use chrono::NaiveDate;

    #[test]
    fn fixtures_are_valid() {
        assert_eq!(validate(&single_demand()), Ok(()));
        assert_eq!(validate(&department()), Ok(()));
    }

    #[test]
    fn reports_every_duplicate() {
        let mut snapshot = single_demand();
        snapshot.faculty.push(faculty("F1", &[], &[]));
        snapshot.student_groups.push(group("G2", "CSE-1", 10, &[]));

        let errors = validate(&snapshot).unwrap_err();
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Duplicate faculty id: F1",
                "Duplicate faculty name: Dr. F1",
                "Duplicate group name: CSE-1",
            ]
        );
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn rejects_bad_leave() {
        let mut snapshot = single_demand();
        snapshot.leave_requests.push(LeaveRequest {
            id: "L1".into(),
            faculty_id: "F404".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
            status: LeaveStatus::Approved,
            reason: None,
        });

        let kinds: Vec<_> = validate(&snapshot).unwrap_err().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ValidationErrorKind::InvertedDateRange, ValidationErrorKind::UnknownFaculty]
        );
        assert!(matches!(ensure_valid(&snapshot), Err(Error::SnapshotInvalid(errors)) if errors.len() == 2));
    }

    #[test]
    fn dangling_course_codes_are_left_to_the_engine() {
        let mut snapshot = single_demand();
        snapshot.student_groups[0].courses.push("GHOST".into());
        assert!(validate(&snapshot).is_ok());
    }
}
