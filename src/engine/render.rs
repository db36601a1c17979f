use std::collections::{HashMap, HashSet, VecDeque};

use crate::engine::output::Output;
use crate::mapgen::Coord;
use crate::world::{Direction, GameMap, Room};

pub fn render_room(out: &mut Output, room: &Room) {
    out.title(room.name.clone());
    out.say(room.desc.trim());

    if !room.items.is_empty() {
        out.say(format!("You see: {}.", room.items.join(", ")));
    }
    if !room.entities.is_empty() {
        out.say(format!("Present: {}.", room.entities.join(", ")));
    }
    if !room.details.is_empty() {
        // BTreeMap keys are already sorted
        let names: Vec<&str> = room.details.keys().map(|k| k.as_str()).collect();
        out.say(format!("You notice: {}.", names.join(", ")));
    }

    if room.exits.is_empty() {
        out.set_exits("Exits: (none)");
    } else {
        let mut dirs: Vec<String> = room
            .exits
            .iter()
            .map(|(dir, exit)| {
                if exit.door_level > 0 {
                    format!("{} (L{})", dir, exit.door_level)
                } else {
                    dir.to_string()
                }
            })
            .collect();
        dirs.sort();
        out.set_exits(format!("Exits: {}", dirs.join(", ")));
    }
}

//////////////////////////
/// ASCII MAP          ///
//////////////////////////

const ROOM_WIDTH: usize = 18;
const ROOM_HEIGHT: usize = 3;
const H_SPACING: usize = 5;
const V_SPACING: usize = 2;

/// Grid position of every room reachable on the map.
///
/// Identifiers following the `room_{x}_{y}` scheme are decoded directly. If any
/// room uses another naming, positions are rebuilt by walking the exits from
/// the start room instead.
pub fn room_positions(map: &GameMap) -> HashMap<String, Coord> {
    let decoded: Option<HashMap<String, Coord>> = map
        .rooms
        .keys()
        .map(|id| Coord::from_room_id(id).map(|c| (id.clone(), c)))
        .collect();
    if let Some(positions) = decoded {
        return positions;
    }

    let mut positions: HashMap<String, Coord> = HashMap::new();
    if !map.rooms.contains_key(&map.start_room) {
        return positions;
    }

    let mut queue: VecDeque<(String, Coord)> = VecDeque::new();
    positions.insert(map.start_room.clone(), Coord::ORIGIN);
    queue.push_back((map.start_room.clone(), Coord::ORIGIN));

    while let Some((id, at)) = queue.pop_front() {
        let Some(room) = map.rooms.get(&id) else {
            continue;
        };
        for (dir, exit) in &room.exits {
            if positions.contains_key(&exit.destination) {
                continue;
            }
            let next = at.step(*dir);
            positions.insert(exit.destination.clone(), next);
            queue.push_back((exit.destination.clone(), next));
        }
    }

    positions
}

struct Canvas {
    cells: Vec<Vec<char>>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Canvas {
            cells: vec![vec![' '; width]; height],
        }
    }

    fn draw_text(&mut self, x: usize, y: usize, text: &str) {
        let Some(row) = self.cells.get_mut(y) else {
            return;
        };
        for (i, c) in text.chars().enumerate() {
            if let Some(cell) = row.get_mut(x + i) {
                *cell = c;
            }
        }
    }

    fn into_string(self) -> String {
        let lines: Vec<String> = self
            .cells
            .into_iter()
            .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
            .collect();
        lines.join("\n").trim_end_matches('\n').to_string()
    }
}

/// Draw the map as boxes joined by `-` and `|`, north up. Gated doors carry an
/// `L{n}` label. `markers` maps room ids to short tags drawn next to the name,
/// and `current` (usually the player's room) gets an `@`.
pub fn render_ascii_map(
    map: &GameMap,
    markers: &HashMap<String, Vec<String>>,
    current: Option<&str>,
) -> String {
    let positions = room_positions(map);
    if positions.is_empty() {
        return "Map data is empty.".to_string();
    }

    let min_x = positions.values().map(|c| c.x).min().unwrap_or(0);
    let max_x = positions.values().map(|c| c.x).max().unwrap_or(0);
    let min_y = positions.values().map(|c| c.y).min().unwrap_or(0);
    let max_y = positions.values().map(|c| c.y).max().unwrap_or(0);

    let cols = (max_x - min_x + 1) as usize;
    let rows = (max_y - min_y + 1) as usize;
    let mut canvas = Canvas::new(
        cols * (ROOM_WIDTH + H_SPACING),
        rows * (ROOM_HEIGHT + V_SPACING),
    );

    let origin = |c: Coord| -> (usize, usize) {
        (
            (c.x - min_x) as usize * (ROOM_WIDTH + H_SPACING),
            (max_y - c.y) as usize * (ROOM_HEIGHT + V_SPACING),
        )
    };

    // Connections first, boxes are drawn over them.
    let mut drawn: HashSet<(String, String)> = HashSet::new();
    let mut room_ids: Vec<&String> = positions.keys().collect();
    room_ids.sort();

    for id in &room_ids {
        let Some(room) = map.rooms.get(id.as_str()) else {
            continue;
        };
        let from = positions[id.as_str()];

        for (dir, exit) in &room.exits {
            let Some(&to) = positions.get(&exit.destination) else {
                continue;
            };
            let key = if id.as_str() < exit.destination.as_str() {
                (id.to_string(), exit.destination.clone())
            } else {
                (exit.destination.clone(), id.to_string())
            };
            if !drawn.insert(key) {
                continue;
            }

            let back_level = map
                .rooms
                .get(&exit.destination)
                .and_then(|r| r.exit(dir.opposite()))
                .map(|e| e.door_level)
                .unwrap_or(0);
            let level = exit.door_level.max(back_level);
            let label = (level > 0).then(|| format!("L{}", level));

            match dir {
                Direction::East | Direction::West => {
                    let (left, right) = if from.x < to.x { (from, to) } else { (to, from) };
                    let (lx, ly) = origin(left);
                    let (rx, _) = origin(right);
                    let (start_x, end_x) = (lx + ROOM_WIDTH, rx);
                    let y = ly + ROOM_HEIGHT / 2;
                    for x in start_x..end_x {
                        canvas.draw_text(x, y, "-");
                    }
                    if let Some(label) = label {
                        let mid = (start_x + end_x) / 2;
                        canvas.draw_text(mid.saturating_sub(label.len() / 2), y, &label);
                    }
                }
                Direction::North | Direction::South => {
                    let (top, bottom) = if from.y > to.y { (from, to) } else { (to, from) };
                    let (tx, ty) = origin(top);
                    let (_, by) = origin(bottom);
                    let (start_y, end_y) = (ty + ROOM_HEIGHT, by);
                    let x = tx + ROOM_WIDTH / 2;
                    for y in start_y..end_y {
                        canvas.draw_text(x, y, "|");
                    }
                    if let Some(label) = label {
                        canvas.draw_text(x, (start_y + end_y) / 2, &label);
                    }
                }
            }
        }
    }

    for id in &room_ids {
        let Some(room) = map.rooms.get(id.as_str()) else {
            continue;
        };
        let (cx, cy) = origin(positions[id.as_str()]);

        let border = format!("+{}+", "-".repeat(ROOM_WIDTH - 2));
        canvas.draw_text(cx, cy, &border);
        canvas.draw_text(cx, cy + 1, &format!("|{}|", " ".repeat(ROOM_WIDTH - 2)));
        canvas.draw_text(cx, cy + 2, &border);

        let mut tags: String = markers
            .get(id.as_str())
            .map(|m| m.iter().map(|t| format!("[{}]", t)).collect())
            .unwrap_or_default();
        if current == Some(id.as_str()) {
            tags.insert(0, '@');
        }

        let text = fit_label(&room.name, &tags, ROOM_WIDTH - 2);
        let len = text.chars().count();
        let x = cx + 1 + (ROOM_WIDTH - 2 - len) / 2;
        canvas.draw_text(x, cy + 1, &text);
    }

    canvas.into_string()
}

/// Name plus markers squeezed into `width` characters; markers win over the name.
fn fit_label(name: &str, tags: &str, width: usize) -> String {
    let name_len = name.chars().count();
    let tags_len = tags.chars().count();

    if tags_len == 0 {
        return name.chars().take(width).collect();
    }
    if name_len + 1 + tags_len <= width {
        return format!("{} {}", name, tags);
    }
    if tags_len + 2 <= width {
        let room_for_name = width - tags_len - 1;
        let short: String = name.chars().take(room_for_name).collect();
        return format!("{} {}", short.trim_end(), tags);
    }
    tags.chars().take(width).collect()
}
