//! Clearance checks on exits. Reads the map, never changes its topology.

use crate::world::{Direction, Exit, GameMap};

/// The exit leaving `room_id` toward `direction`, if there is one.
pub fn exit_details<'a>(map: &'a GameMap, room_id: &str, direction: Direction) -> Option<&'a Exit> {
    map.room(room_id)?.exit(direction)
}

/// Clearance needed to pass the door, `None` when there is no exit at all.
pub fn door_level(map: &GameMap, room_id: &str, direction: Direction) -> Option<u8> {
    exit_details(map, room_id, direction).map(|e| e.door_level)
}

pub fn destination<'a>(map: &'a GameMap, room_id: &str, direction: Direction) -> Option<&'a str> {
    exit_details(map, room_id, direction).map(|e| e.destination.as_str())
}

/// True when an entity with `clearance` may pass. A missing exit is never passable.
pub fn check_access(map: &GameMap, clearance: u8, room_id: &str, direction: Direction) -> bool {
    door_level(map, room_id, direction).is_some_and(|level| clearance >= level)
}
