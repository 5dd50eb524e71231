//! Proposes fixes for conflicts left by a scheduling run.
//!
//! The search runs against the finished timetable: a scratch tracker is
//! filled from the timetable (plus the catalogue's manual bookings and
//! leave) and each resolvable conflict looks for spare joint capacity in
//! it. Inputs are only read.

use log::{debug, info};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::conflict::Conflict;
use crate::data::{Course, ScheduleEntry, Snapshot};
use crate::solver::{first_free_slot, occupy_entries, seed_tracker, select_faculty, select_room};
use crate::tracker::{SlotKey, SlotTracker};

/// One suggestion per (course, group) at most, in conflict order.
///
/// `catalogue` supplies the courses, rooms, faculty and groups the conflicts
/// refer to. Conflicts the engine cannot act on are skipped. Each proposed
/// slot is reserved in the scratch tracker, so the suggestions can be applied
/// together.
pub fn suggest_resolutions(
    catalogue: &Snapshot,
    conflicts: &[Conflict],
    timetable: &[ScheduleEntry],
) -> Vec<String> {
    let mut course_map: HashMap<&str, &Course> = HashMap::new();
    for course in &catalogue.courses {
        course_map.entry(course.code.as_str()).or_insert(course);
    }

    let mut tracker = seed_tracker(catalogue);
    occupy_entries(&mut tracker, timetable);

    let mut suggestions = Vec::new();
    let mut suggested_for: HashSet<(&str, &str)> = HashSet::new();

    for conflict in conflicts {
        let key = (conflict.course(), conflict.group());
        if suggested_for.contains(&key) {
            continue;
        }
        let Some(course) = course_map.get(conflict.course()) else {
            debug!("no catalogue entry for {}, skipping", conflict.course());
            continue;
        };

        let suggestion = match conflict {
            Conflict::NoSuitableRoom { group, size, .. } => {
                suggest_room(catalogue, course, group, *size)
            }
            Conflict::NoAvailableSlot { group, .. } => {
                suggest_slot(catalogue, &mut tracker, course, group)
            }
            Conflict::CourseDataMissing { .. } | Conflict::NoSuitableFaculty { .. } => None,
        };

        if let Some(text) = suggestion {
            debug!("{} -> {}", conflict, text);
            suggested_for.insert(key);
            suggestions.push(text);
        }
    }

    info!(
        "Produced {} suggestions for {} conflicts",
        suggestions.len(),
        conflicts.len()
    );
    suggestions
}

fn suggest_room(catalogue: &Snapshot, course: &Course, group: &str, size: u32) -> Option<String> {
    let kind = course.kind.required_room();
    // first listed among the largest
    let largest = catalogue
        .rooms
        .iter()
        .filter(|room| room.kind == kind)
        .min_by_key(|room| Reverse(room.capacity));

    let Some(room) = largest else {
        return Some(format!(
            "No {} exists for '{}'. Add a {} seating at least {} students for '{}'.",
            kind, course.code, kind, size, group
        ));
    };
    if size <= room.capacity {
        return None;
    }
    if room.capacity == 0 {
        return Some(format!(
            "Increase the capacity of {} from 0 to at least {} to host '{}' for '{}'.",
            room.id, size, course.code, group
        ));
    }

    let sections = size.div_ceil(room.capacity);
    Some(format!(
        "Increase the capacity of {} from {} to at least {}, or split '{}' ({} students) into {} sections of at most {} for '{}'.",
        room.id, room.capacity, size, group, size, sections, room.capacity, course.code
    ))
}

fn suggest_slot(
    catalogue: &Snapshot,
    tracker: &mut SlotTracker,
    course: &Course,
    group_name: &str,
) -> Option<String> {
    let group = catalogue
        .student_groups
        .iter()
        .find(|g| g.name == group_name)?;
    let room = select_room(&catalogue.rooms, course, group)?;
    let faculty = select_faculty(&catalogue.faculty, course)?;
    let (day, slot) = first_free_slot(tracker, faculty, room, group)?;

    tracker.occupy(&SlotKey::triple(&faculty.name, &room.id, &group.name, day, slot));
    Some(format!(
        "Move '{}' for '{}' to {} at {} in {}.",
        course.name, group.name, day, slot, room.id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CourseKind, Day, RoomKind};
    use crate::solver::generate_timetable;
    use crate::solver::tests::{department, group, room, single_demand};

    #[test]
    fn faculty_without_slots_gets_no_suggestion() {
        let mut snapshot = single_demand();
        snapshot.faculty[0].availability.clear();
        let result = generate_timetable(&snapshot);

        assert_eq!(result.conflicts.len(), 1);
        assert!(suggest_resolutions(&snapshot, &result.conflicts, &result.timetable).is_empty());
    }

    #[test]
    fn oversized_group_gets_capacity_or_split_advice() {
        let mut snapshot = single_demand();
        snapshot.student_groups[0].size = 80;
        let result = generate_timetable(&snapshot);

        let suggestions = suggest_resolutions(&snapshot, &result.conflicts, &result.timetable);
        assert_eq!(
            suggestions,
            vec![
                "Increase the capacity of R1 from 70 to at least 80, or split 'CSE-1' (80 students) into 2 sections of at most 70 for 'CSE101'."
            ]
        );
    }

    #[test]
    fn missing_room_kind_is_reported() {
        let mut snapshot = single_demand();
        snapshot.courses[0].kind = CourseKind::Practical;
        let result = generate_timetable(&snapshot);

        let suggestions = suggest_resolutions(&snapshot, &result.conflicts, &result.timetable);
        assert_eq!(
            suggestions,
            vec!["No lab exists for 'CSE101'. Add a lab seating at least 60 students for 'CSE-1'."]
        );
    }

    #[test]
    fn finds_slot_left_by_the_timetable() {
        // the engine ran against an older catalogue; Tuesday has opened up since
        let mut snapshot = single_demand();
        snapshot.student_groups.push(group("G2", "CSE-2", 50, &["CSE101"]));
        let result = generate_timetable(&snapshot);
        assert_eq!(result.conflicts.len(), 1);

        snapshot.faculty[0]
            .availability
            .insert(Day::Tuesday, vec!["10:00-11:00".into()]);
        let suggestions = suggest_resolutions(&snapshot, &result.conflicts, &result.timetable);
        assert_eq!(
            suggestions,
            vec!["Move 'CSE101 Lecture' for 'CSE-2' to Tuesday at 10:00-11:00 in R1."]
        );
    }

    #[test]
    fn suggestions_never_double_book() {
        let mut snapshot = single_demand();
        for (id, name) in [("G2", "CSE-2"), ("G3", "CSE-3")] {
            snapshot.student_groups.push(group(id, name, 50, &["CSE101"]));
        }
        let result = generate_timetable(&snapshot);
        assert_eq!(result.conflicts.len(), 2);

        // one extra slot for two stranded groups
        snapshot.faculty[0]
            .availability
            .insert(Day::Friday, vec!["09:00-10:00".into()]);
        let suggestions = suggest_resolutions(&snapshot, &result.conflicts, &result.timetable);
        assert_eq!(
            suggestions,
            vec!["Move 'CSE101 Lecture' for 'CSE-2' to Friday at 09:00-10:00 in R1."]
        );
    }

    #[test]
    fn proposed_slots_keep_the_timetable_valid() {
        let mut snapshot = department();
        let result = generate_timetable(&snapshot);
        for member in &mut snapshot.faculty {
            for day in Day::ALL {
                member
                    .availability
                    .entry(day)
                    .or_default()
                    .push("16:00-17:00".into());
            }
        }

        let suggestions = suggest_resolutions(&snapshot, &result.conflicts, &result.timetable);
        let mut taken: HashSet<(&str, String, String)> = result
            .timetable
            .iter()
            .flat_map(|e| {
                let at = format!("{} {}", e.day, e.time_slot);
                [
                    ("room", at.clone(), e.room_id.clone()),
                    ("faculty", at.clone(), e.faculty_name.clone()),
                    ("group", at, e.student_group.clone()),
                ]
            })
            .collect();

        let moves: Vec<&String> = suggestions.iter().filter(|s| s.starts_with("Move '")).collect();
        assert!(!moves.is_empty());
        for text in moves {
            // "Move '{course}' for '{group}' to {day} at {slot} in {room}."
            let rest = text.strip_prefix("Move '").unwrap();
            let (course_name, rest) = rest.split_once("' for '").unwrap();
            let (group_name, rest) = rest.split_once("' to ").unwrap();
            let (day, rest) = rest.split_once(" at ").unwrap();
            let (slot, room_id) = rest.trim_end_matches('.').split_once(" in ").unwrap();

            let course = snapshot.courses.iter().find(|c| c.name == course_name).unwrap();
            let group = snapshot.student_groups.iter().find(|g| g.name == group_name).unwrap();
            let room = snapshot.rooms.iter().find(|r| r.id == room_id).unwrap();
            let faculty = select_faculty(&snapshot.faculty, course).unwrap();
            let day = Day::ALL.into_iter().find(|d| d.to_string() == day).unwrap();

            let at = format!("{} {}", day, slot);
            assert!(taken.insert(("room", at.clone(), room.id.clone())), "room reused: {}", text);
            assert!(taken.insert(("faculty", at.clone(), faculty.name.clone())), "faculty reused: {}", text);
            assert!(taken.insert(("group", at, group.name.clone())), "group reused: {}", text);

            assert!(faculty.slots_on(day).iter().any(|s| s == slot), "outside availability: {}", text);
            assert_eq!(room.kind, course.kind.required_room());
            assert!(room.capacity >= group.size);
        }
    }

    #[test]
    fn deduplicates_and_passes_over_unresolvable_kinds() {
        let mut snapshot = single_demand();
        snapshot.rooms.push(room("R2", RoomKind::Classroom, 70));
        let conflict = Conflict::NoAvailableSlot {
            course: "CSE101".into(),
            group: "CSE-1".into(),
        };
        let conflicts = vec![
            conflict.clone(),
            conflict,
            Conflict::NoSuitableFaculty {
                course: "CSE101".into(),
                group: "CSE-1".into(),
            },
            Conflict::CourseDataMissing {
                course: "GHOST".into(),
                group: "CSE-1".into(),
            },
            Conflict::NoAvailableSlot {
                course: "CSE101".into(),
                group: "Nobody".into(),
            },
        ];

        let suggestions = suggest_resolutions(&snapshot, &conflicts, &[]);
        assert_eq!(
            suggestions,
            vec!["Move 'CSE101 Lecture' for 'CSE-1' to Monday at 09:00-10:00 in R1."]
        );
    }

    #[test]
    fn inputs_are_left_untouched() {
        let snapshot = department();
        let result = generate_timetable(&snapshot);
        let before = result.clone();
        let _ = suggest_resolutions(&snapshot, &result.conflicts, &result.timetable);
        assert_eq!(result, before);
    }

    #[test]
    fn no_conflicts_no_suggestions() {
        let snapshot = single_demand();
        let result = generate_timetable(&snapshot);
        assert!(suggest_resolutions(&snapshot, &result.conflicts, &result.timetable).is_empty());
    }
}
