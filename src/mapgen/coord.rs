use std::fmt;

use crate::world::Direction;

/// Cell on the unbounded generation grid. `(0, 0)` holds the start room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    pub fn step(self, direction: Direction) -> Coord {
        let (dx, dy) = direction.offset();
        Coord {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Stable room identifier for this cell.
    pub fn room_id(self) -> String {
        format!("room_{}_{}", self.x, self.y)
    }

    /// Inverse of [`Coord::room_id`]; `None` for identifiers outside the scheme.
    pub fn from_room_id(id: &str) -> Option<Coord> {
        let rest = id.strip_prefix("room_")?;
        let (x, y) = rest.split_once('_')?;
        Some(Coord {
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_ids_round_trip_negative_coordinates() {
        for c in [Coord::ORIGIN, Coord::new(3, -2), Coord::new(-10, 7)] {
            assert_eq!(Coord::from_room_id(&c.room_id()), Some(c));
        }
        assert_eq!(Coord::new(-1, -2).room_id(), "room_-1_-2");
    }

    #[test]
    fn opaque_ids_do_not_parse() {
        assert_eq!(Coord::from_room_id("cell"), None);
        assert_eq!(Coord::from_room_id("room_a_1"), None);
        assert_eq!(Coord::from_room_id("room_1"), None);
        assert_eq!(Coord::from_room_id("room_1_2_3"), None);
    }

    #[test]
    fn step_follows_direction_offsets() {
        assert_eq!(Coord::ORIGIN.step(Direction::North), Coord::new(0, 1));
        assert_eq!(Coord::ORIGIN.step(Direction::West), Coord::new(-1, 0));
    }
}
