use crate::conflict::Conflict;
use crate::data::{
    Course, Day, Faculty, Room, ScheduleEntry, Snapshot, StudentGroup, TimeSlot, TimetableResult,
};
use crate::error::Result;
use crate::leave;
use crate::repository::Repository;
use crate::tracker::{SlotKey, SlotTracker};
use crate::validation::ensure_valid;
use log::{debug, info, trace};
use std::collections::HashMap;
use std::time::Instant;

/// Builds a timetable from one snapshot with a greedy first-fit pass.
///
/// Demands are taken group by group, course by course, in listing order.
/// Each demand gets the first matching room, the first faculty member with
/// the expertise, and the first (day, slot) of that faculty's availability
/// where faculty, room and group are all free. A slot once taken is never
/// revisited, so a later demand can fail where a different earlier choice
/// would have left room for it.
///
/// Domain failures end up in `conflicts`; every produced entry is valid.
pub fn generate_timetable(snapshot: &Snapshot) -> TimetableResult {
    let start_time = Instant::now();
    // lookups, first listing wins
    let mut course_map: HashMap<&str, &Course> = HashMap::new();
    for course in &snapshot.courses {
        course_map.entry(course.code.as_str()).or_insert(course);
    }

    let mut tracker = seed_tracker(snapshot);
    info!(
        "Scheduling {} demands over {} rooms and {} faculty ({} slots pre-occupied)...",
        snapshot.student_groups.iter().map(|g| g.courses.len()).sum::<usize>(),
        snapshot.rooms.len(),
        snapshot.faculty.len(),
        tracker.len()
    );

    let mut timetable = Vec::new();
    let mut conflicts = Vec::new();

    for (group, course_code) in demands(snapshot) {
        match assign(group, course_code, &course_map, snapshot, &mut tracker) {
            Ok(entry) => {
                trace!(
                    "{} for {} -> {} {} in {}",
                    entry.course_code, entry.student_group, entry.day, entry.time_slot, entry.room_id
                );
                timetable.push(entry);
            }
            Err(conflict) => {
                debug!("conflict: {}", conflict);
                conflicts.push(conflict);
            }
        }
    }

    info!(
        "Scheduled {} classes with {} conflicts in {:.2?}",
        timetable.len(),
        conflicts.len(),
        start_time.elapsed()
    );
    TimetableResult {
        timetable,
        conflicts,
    }
}

/// Loads a snapshot, validates it and schedules it. Only repository and
/// snapshot failures are errors.
pub fn generate_from<R: Repository + ?Sized>(repository: &R) -> Result<TimetableResult> {
    let snapshot = repository.load_snapshot()?;
    ensure_valid(&snapshot)?;
    Ok(generate_timetable(&snapshot))
}

fn assign(
    group: &StudentGroup,
    course_code: &str,
    course_map: &HashMap<&str, &Course>,
    snapshot: &Snapshot,
    tracker: &mut SlotTracker,
) -> std::result::Result<ScheduleEntry, Conflict> {
    let Some(course) = course_map.get(course_code) else {
        return Err(Conflict::CourseDataMissing {
            course: course_code.to_string(),
            group: group.name.clone(),
        });
    };

    let Some(room) = select_room(&snapshot.rooms, course, group) else {
        return Err(Conflict::NoSuitableRoom {
            course: course.code.clone(),
            group: group.name.clone(),
            size: group.size,
        });
    };

    let Some(faculty) = select_faculty(&snapshot.faculty, course) else {
        return Err(Conflict::NoSuitableFaculty {
            course: course.code.clone(),
            group: group.name.clone(),
        });
    };

    let Some((day, slot)) = first_free_slot(tracker, faculty, room, group) else {
        return Err(Conflict::NoAvailableSlot {
            course: course.code.clone(),
            group: group.name.clone(),
        });
    };

    tracker.occupy(&SlotKey::triple(&faculty.name, &room.id, &group.name, day, slot));
    Ok(ScheduleEntry {
        day,
        time_slot: slot.clone(),
        course_code: course.code.clone(),
        course_name: course.name.clone(),
        faculty_name: faculty.name.clone(),
        room_id: room.id.clone(),
        student_group: group.name.clone(),
    })
}

/// (group, course code) pairs in group order, then course order.
pub fn demands(snapshot: &Snapshot) -> impl Iterator<Item = (&StudentGroup, &str)> {
    snapshot
        .student_groups
        .iter()
        .flat_map(|group| group.courses.iter().map(move |code| (group, code.as_str())))
}

/// First room of the course's kind that seats the whole group.
pub fn select_room<'a>(rooms: &'a [Room], course: &Course, group: &StudentGroup) -> Option<&'a Room> {
    let kind = course.kind.required_room();
    rooms
        .iter()
        .find(|room| room.kind == kind && room.capacity >= group.size)
}

/// First faculty member with the course in their expertise.
pub fn select_faculty<'a>(faculty: &'a [Faculty], course: &Course) -> Option<&'a Faculty> {
    faculty.iter().find(|f| f.teaches(&course.code))
}

/// First (day, slot) of the faculty's availability free for all three resources.
pub fn first_free_slot<'a>(
    tracker: &SlotTracker,
    faculty: &'a Faculty,
    room: &Room,
    group: &StudentGroup,
) -> Option<(Day, &'a TimeSlot)> {
    Day::ALL.into_iter().find_map(|day| {
        faculty
            .slots_on(day)
            .iter()
            .find(|slot| tracker.is_free(&SlotKey::triple(&faculty.name, &room.id, &group.name, day, slot)))
            .map(|slot| (day, slot))
    })
}

/// Tracker pre-occupied with manual bookings and approved leave.
pub fn seed_tracker(snapshot: &Snapshot) -> SlotTracker {
    let mut tracker = SlotTracker::new();
    occupy_entries(&mut tracker, &snapshot.manual_bookings);

    for (faculty, day) in leave::blocked_days(snapshot) {
        let keys: Vec<SlotKey> = faculty
            .slots_on(day)
            .iter()
            .map(|slot| SlotKey::Faculty(faculty.name.clone(), day, slot.clone()))
            .collect();
        tracker.occupy(&keys);
    }
    tracker
}

/// Occupies the room, faculty and group keys of existing entries.
pub fn occupy_entries(tracker: &mut SlotTracker, entries: &[ScheduleEntry]) {
    for entry in entries {
        tracker.occupy(&SlotKey::triple(
            &entry.faculty_name,
            &entry.room_id,
            &entry.student_group,
            entry.day,
            &entry.time_slot,
        ));
    }
}
