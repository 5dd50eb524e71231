use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::conflict::Conflict;

// identifiers as they appear in catalogue JSON
pub type CourseCode = String;
pub type FacultyId = String;
pub type RoomId = String;
pub type GroupId = String;
pub type TimeSlot = String;

/// A teaching day. Declaration order is the search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Days since Monday.
    pub fn offset(self) -> u64 {
        self as u64
    }

    pub fn from_weekday(weekday: chrono::Weekday) -> Option<Day> {
        match weekday {
            chrono::Weekday::Mon => Some(Day::Monday),
            chrono::Weekday::Tue => Some(Day::Tuesday),
            chrono::Weekday::Wed => Some(Day::Wednesday),
            chrono::Weekday::Thu => Some(Day::Thursday),
            chrono::Weekday::Fri => Some(Day::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CourseKind {
    Theory,
    Practical,
}

impl CourseKind {
    /// The only room kind a course of this kind may be taught in.
    pub fn required_room(self) -> RoomKind {
        match self {
            CourseKind::Theory => RoomKind::Classroom,
            CourseKind::Practical => RoomKind::Lab,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum RoomKind {
    Classroom,
    Lab,
    #[serde(alias = "Seminar Hall")]
    SeminarHall,
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoomKind::Classroom => "classroom",
            RoomKind::Lab => "lab",
            RoomKind::SeminarHall => "seminar hall",
        };
        f.write_str(name)
    }
}

/// A course from the catalogue.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: CourseCode,
    pub name: String,
    pub credits: u32,
    #[serde(rename = "type")]
    pub kind: CourseKind,
    #[serde(default)]
    pub department: String,
}

/// A faculty member with the slots they declared as available.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    #[serde(default)]
    pub expertise: Vec<CourseCode>,
    #[serde(default)]
    pub availability: BTreeMap<Day, Vec<TimeSlot>>,
}

impl Faculty {
    pub fn slots_on(&self, day: Day) -> &[TimeSlot] {
        self.availability.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn teaches(&self, course: &str) -> bool {
        self.expertise.iter().any(|code| code == course)
    }
}

/// A bookable room. Its kind decides which courses it can host and its
/// capacity which groups fit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RoomKind,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGroup {
    pub id: GroupId,
    pub name: String,
    pub size: u32,
    #[serde(default)]
    pub courses: Vec<CourseCode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// A faculty leave request. Dates are inclusive.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: String,
    pub faculty_id: FacultyId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LeaveRequest {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A single scheduled class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub day: Day,
    pub time_slot: TimeSlot,
    pub course_code: CourseCode,
    pub course_name: String,
    pub faculty_name: String,
    pub room_id: RoomId,
    pub student_group: String,
}

/// Everything one engine run reads. Never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub student_groups: Vec<StudentGroup>,
    #[serde(default)]
    pub leave_requests: Vec<LeaveRequest>,
    #[serde(default)]
    pub manual_bookings: Vec<ScheduleEntry>,
    /// Monday of the week being scheduled; maps each `Day` to a date for leave checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_commencing: Option<NaiveDate>,
}

/// The output of one assignment run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableResult {
    pub timetable: Vec<ScheduleEntry>,
    pub conflicts: Vec<Conflict>,
}

impl TimetableResult {
    /// A run without conflicts scheduled every demand.
    pub fn is_complete(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn conflict_messages(&self) -> Vec<String> {
        self.conflicts.iter().map(ToString::to_string).collect()
    }
}
