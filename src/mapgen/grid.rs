use std::collections::HashMap;

use super::coord::Coord;
use crate::world::{Direction, RoomTemplate};

/// A template copy bound to a grid cell. Owns its data, so later changes never
/// reach the catalog or other rooms built from the same template.
#[derive(Debug, Clone)]
pub struct PlacedRoom {
    pub coord: Coord,
    pub template: RoomTemplate,
}

/// Occupied cells during one generation run. At most one room per coordinate.
#[derive(Debug, Default)]
pub struct Grid {
    cells: HashMap<Coord, PlacedRoom>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn get(&self, coord: Coord) -> Option<&PlacedRoom> {
        self.cells.get(&coord)
    }

    /// Place a copy of `template` at `coord`. Returns `false` and leaves the
    /// grid untouched when the cell is already taken.
    pub fn place(&mut self, coord: Coord, template: &RoomTemplate) -> bool {
        if self.is_occupied(coord) {
            return false;
        }
        self.cells.insert(
            coord,
            PlacedRoom {
                coord,
                template: template.clone(),
            },
        );
        true
    }

    pub fn rooms(&self) -> impl Iterator<Item = &PlacedRoom> {
        self.cells.values()
    }

    pub(super) fn into_rooms(self) -> impl Iterator<Item = PlacedRoom> {
        self.cells.into_values()
    }

    /// Split the occupied neighbors of `coord` into directions that must be open
    /// (the neighbor has a door facing us) and directions that must stay walled.
    pub fn neighbor_constraints(&self, coord: Coord) -> (Vec<Direction>, Vec<Direction>) {
        let mut open = Vec::new();
        let mut walled = Vec::new();

        for dir in Direction::ALL {
            let Some(neighbor) = self.get(coord.step(dir)) else {
                continue;
            };
            if neighbor.template.exits.contains(&dir.opposite()) {
                open.push(dir);
            } else {
                walled.push(dir);
            }
        }

        (open, walled)
    }
}
