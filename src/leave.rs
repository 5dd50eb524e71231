//! Approved leave: which faculty days it blocks, and which classes it touches.

use chrono::{Days, NaiveDate};
use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::data::{Day, Faculty, LeaveRequest, LeaveStatus, ScheduleEntry, Snapshot};

/// Calendar date of `day` in the week starting on `week_commencing`.
pub fn date_of(week_commencing: NaiveDate, day: Day) -> Option<NaiveDate> {
    week_commencing.checked_add_days(Days::new(day.offset()))
}

/// Every (faculty, day) pair taken out by approved leave in the scheduled week.
///
/// Day-to-date mapping comes from `snapshot.week_commencing`; without it no
/// leave can be placed on a day and nothing is blocked.
pub fn blocked_days(snapshot: &Snapshot) -> Vec<(&Faculty, Day)> {
    let approved: Vec<&LeaveRequest> = snapshot
        .leave_requests
        .iter()
        .filter(|leave| leave.status == LeaveStatus::Approved)
        .collect();
    if approved.is_empty() {
        return Vec::new();
    }

    let Some(week) = snapshot.week_commencing else {
        warn!(
            "{} approved leave request(s) ignored: snapshot has no weekCommencing date",
            approved.len()
        );
        return Vec::new();
    };

    let mut blocked = Vec::new();
    for faculty in &snapshot.faculty {
        for day in Day::ALL {
            let Some(date) = date_of(week, day) else {
                continue;
            };
            let on_leave = approved
                .iter()
                .any(|leave| leave.faculty_id == faculty.id && leave.covers(date));
            if on_leave {
                debug!("{} on leave {} ({})", faculty.name, day, date);
                blocked.push((faculty, day));
            }
        }
    }
    blocked
}

/// Teaching days that fall inside a leave range.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> BTreeSet<Day> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .take(7)
        .filter_map(|date| Day::from_weekday(chrono::Datelike::weekday(&date)))
        .collect()
}

/// Classes a leave request would take out of the weekly timetable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveImpact {
    pub faculty_name: Option<String>,
    pub affected: Vec<ScheduleEntry>,
    pub by_course: BTreeMap<String, usize>,
}

pub fn leave_impact(
    request: &LeaveRequest,
    faculty: &[Faculty],
    timetable: &[ScheduleEntry],
) -> LeaveImpact {
    let Some(member) = faculty.iter().find(|f| f.id == request.faculty_id) else {
        return LeaveImpact {
            faculty_name: None,
            affected: Vec::new(),
            by_course: BTreeMap::new(),
        };
    };

    let days = days_in_range(request.start_date, request.end_date);
    let affected: Vec<ScheduleEntry> = timetable
        .iter()
        .filter(|entry| entry.faculty_name == member.name && days.contains(&entry.day))
        .cloned()
        .collect();
    let by_course = affected
        .iter()
        .map(|entry| entry.course_name.clone())
        .counts()
        .into_iter()
        .collect();

    LeaveImpact {
        faculty_name: Some(member.name.clone()),
        affected,
        by_course,
    }
}
