use std::collections::{HashSet, VecDeque};

use thiserror::Error;

use super::model::{GameMap, TemplateCatalog};
use crate::mapgen::Coord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

/// Check a template catalog before it is handed to the generator.
pub fn validate_catalog(catalog: &TemplateCatalog) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    if catalog.is_empty() {
        errors.push(ValidationError::new("catalog has no templates"));
        return errors;
    }

    if catalog.start_templates().is_empty() {
        errors.push(ValidationError::new(
            "catalog has no template tagged 'start'",
        ));
    }

    for template in catalog.templates() {
        for dir in template.door_levels.keys() {
            if !template.exits.contains(dir) {
                errors.push(ValidationError::new(format!(
                    "template '{}' sets a door level on '{}' but has no such exit",
                    template.id, dir
                )));
            }
        }
    }

    errors
}

/// Check the structural guarantees of an emitted map.
pub fn validate_map(map: &GameMap) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    if !map.rooms.contains_key(&map.start_room) {
        errors.push(ValidationError::new(format!(
            "start_room '{}' not found among rooms",
            map.start_room
        )));
    }

    for (room_id, room) in &map.rooms {
        if room.id != *room_id {
            errors.push(ValidationError::new(format!(
                "room keyed '{}' carries id '{}'",
                room_id, room.id
            )));
        }

        for (dir, exit) in &room.exits {
            let Some(target) = map.rooms.get(&exit.destination) else {
                errors.push(ValidationError::new(format!(
                    "room '{}' exit '{}' targets missing room '{}'",
                    room_id, dir, exit.destination
                )));
                continue;
            };

            let back = target
                .exits
                .get(&dir.opposite())
                .is_some_and(|e| e.destination == *room_id);
            if !back {
                errors.push(ValidationError::new(format!(
                    "room '{}' exit '{}' to '{}' has no matching '{}' exit back",
                    room_id,
                    dir,
                    exit.destination,
                    dir.opposite()
                )));
            }

            // Grid ids must agree with the direction travelled.
            if let (Some(from), Some(to)) = (
                Coord::from_room_id(room_id),
                Coord::from_room_id(&exit.destination),
            ) {
                if from.step(*dir) != to {
                    errors.push(ValidationError::new(format!(
                        "room '{}' exit '{}' leads to non-adjacent room '{}'",
                        room_id, dir, exit.destination
                    )));
                }
            }
        }
    }

    if map.rooms.contains_key(&map.start_room) {
        let reached = reachable_from(map, &map.start_room);
        for room_id in map.rooms.keys() {
            if !reached.contains(room_id.as_str()) {
                errors.push(ValidationError::new(format!(
                    "room '{}' is not reachable from '{}'",
                    room_id, map.start_room
                )));
            }
        }
    }

    errors
}

/// Breadth-first walk over exits.
pub fn reachable_from<'a>(map: &'a GameMap, start: &'a str) -> HashSet<&'a str> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);

    while let Some(id) = queue.pop_front() {
        let Some(room) = map.rooms.get(id) else {
            continue;
        };
        for exit in room.exits.values() {
            if seen.insert(exit.destination.as_str()) {
                queue.push_back(exit.destination.as_str());
            }
        }
    }

    seen
}
