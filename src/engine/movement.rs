use log::debug;

use crate::engine::access::{check_access, destination, door_level};
use crate::engine::output::Output;
use crate::world::{Direction, GameMap};

/// Words that may precede a direction without changing its meaning.
const MOVE_VERBS: [&str; 3] = ["go", "move", "walk"];

/// Interpret `cmd` as a movement command. Returns `false` when it does not name
/// a direction at all, so the caller can try other handlers.
pub fn try_handle_movement(
    out: &mut Output,
    current_room_id: &mut String,
    map: &GameMap,
    clearance: u8,
    cmd: &str,
) -> bool {
    let tokens: Vec<String> = cmd
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .filter(|t| !MOVE_VERBS.contains(&t.as_str()))
        .collect();

    if tokens.is_empty() {
        return false;
    }

    // 1) Whole-word direction names anywhere in the command
    let mut named: Vec<Direction> = Vec::new();
    for tok in &tokens {
        if let Ok(dir) = tok.parse::<Direction>() {
            if !named.contains(&dir) {
                named.push(dir);
            }
        }
    }

    // 2) One-letter abbreviations, only when no full name was given
    if named.is_empty() {
        for tok in &tokens {
            let dir = match tok.as_str() {
                "n" => Direction::North,
                "s" => Direction::South,
                "e" => Direction::East,
                "w" => Direction::West,
                _ => continue,
            };
            if !named.contains(&dir) {
                named.push(dir);
            }
        }
    }

    match named.as_slice() {
        [] => false,
        [dir] => {
            do_move(out, current_room_id, map, clearance, *dir);
            true
        }
        _ => {
            let dirs_list = named
                .iter()
                .map(|d| d.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            out.say(format!(
                "That movement is ambiguous. Did you mean: {}?",
                dirs_list
            ));
            true
        }
    }
}

fn do_move(
    out: &mut Output,
    current_room_id: &mut String,
    map: &GameMap,
    clearance: u8,
    direction: Direction,
) {
    let Some(target) = destination(map, current_room_id, direction) else {
        out.say("You can't go that way.");
        return;
    };

    if !check_access(map, clearance, current_room_id, direction) {
        let required = door_level(map, current_room_id, direction).unwrap_or_default();
        debug!(
            "Door {} of '{}' needs level {}, have {}",
            direction, current_room_id, required, clearance
        );
        out.event(format!(
            "Access Denied: Door requires Clearance Level {}.",
            required
        ));
        return;
    }

    if map.room(target).is_none() {
        out.say(format!(
            "You try to go {}, but something feels wrong (room not found).",
            direction
        ));
        return;
    }

    out.say(format!("You go {}.", direction));
    *current_room_id = target.to_string();
}
