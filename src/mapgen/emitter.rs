use std::collections::{BTreeMap, HashSet};

use super::coord::Coord;
use super::grid::Grid;
use crate::world::{Exit, GameMap, Room};

/// Turn the grid into the externally visible map.
///
/// Each room keeps only the declared exits whose neighbor cell was actually
/// filled, so the result never references a room that does not exist.
pub fn finalize(grid: Grid) -> GameMap {
    let occupied: HashSet<Coord> = grid.rooms().map(|r| r.coord).collect();
    let mut rooms: BTreeMap<String, Room> = BTreeMap::new();

    for placed in grid.into_rooms() {
        let coord = placed.coord;
        let template = placed.template;

        let exits = template
            .exits
            .iter()
            .filter_map(|&dir| {
                let target = coord.step(dir);
                occupied.contains(&target).then(|| {
                    (
                        dir,
                        Exit {
                            destination: target.room_id(),
                            door_level: template.door_level(dir),
                        },
                    )
                })
            })
            .collect();

        let id = coord.room_id();
        rooms.insert(
            id.clone(),
            Room {
                id,
                template_id: template.id,
                name: template.name,
                desc: template.desc,
                exits,
                items: template.items,
                entities: template.entities,
                details: template.details,
                tags: template.tags,
            },
        );
    }

    GameMap {
        start_room: Coord::ORIGIN.room_id(),
        rooms,
    }
}
