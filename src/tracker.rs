use std::collections::HashSet;

use crate::data::{Day, RoomId, TimeSlot};

/// One occupied (resource, day, slot) triple.
///
/// Faculty and groups are keyed by name, the identity timetable entries carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Faculty(String, Day, TimeSlot),
    Room(RoomId, Day, TimeSlot),
    Group(String, Day, TimeSlot),
}

impl SlotKey {
    /// The three keys a class occupies.
    pub fn triple(faculty: &str, room: &str, group: &str, day: Day, slot: &str) -> [SlotKey; 3] {
        [
            SlotKey::Faculty(faculty.to_string(), day, slot.to_string()),
            SlotKey::Room(room.to_string(), day, slot.to_string()),
            SlotKey::Group(group.to_string(), day, slot.to_string()),
        ]
    }
}

/// Index of occupied slots for a single run.
#[derive(Debug, Clone, Default)]
pub struct SlotTracker {
    occupied: HashSet<SlotKey>,
}

impl SlotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff none of `keys` is occupied.
    pub fn is_free(&self, keys: &[SlotKey]) -> bool {
        keys.iter().all(|key| !self.occupied.contains(key))
    }

    /// Marks every key occupied. Callers check `is_free` first.
    pub fn occupy(&mut self, keys: &[SlotKey]) {
        self.occupied.extend(keys.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupied_keys_are_not_free() {
        let mut tracker = SlotTracker::new();
        let keys = SlotKey::triple("Dr. F1", "R1", "CSE-1", Day::Monday, "09:00-10:00");
        assert!(tracker.is_free(&keys));

        tracker.occupy(&keys);
        assert!(!tracker.is_free(&keys));
        assert_eq!(tracker.len(), 3);

        // sharing only the room is enough to block
        let other = SlotKey::triple("Dr. F2", "R1", "CSE-2", Day::Monday, "09:00-10:00");
        assert!(!tracker.is_free(&other));

        let next_hour = SlotKey::triple("Dr. F1", "R1", "CSE-1", Day::Monday, "10:00-11:00");
        assert!(tracker.is_free(&next_hour));
    }

    #[test]
    fn families_do_not_collide() {
        let mut tracker = SlotTracker::new();
        tracker.occupy(&[SlotKey::Faculty("X".into(), Day::Monday, "09:00-10:00".into())]);
        assert!(tracker.is_free(&[SlotKey::Room("X".into(), Day::Monday, "09:00-10:00".into())]));
        assert!(tracker.is_free(&[SlotKey::Group("X".into(), Day::Monday, "09:00-10:00".into())]));
    }

    #[test]
    fn empty_key_set_is_free() {
        assert!(SlotTracker::new().is_free(&[]));
        assert!(SlotTracker::new().is_empty());
    }
}
