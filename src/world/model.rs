use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

//////////////////////////////
/// GRID DIRECTIONS        ///
//////////////////////////////

/// Cardinal direction a room can connect through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Grid offset of the neighbor in this direction. North is +y.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Only full names are accepted; abbreviations are a movement concern.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" => Ok(Direction::North),
            "south" => Ok(Direction::South),
            "east" => Ok(Direction::East),
            "west" => Ok(Direction::West),
            other => Err(format!(
                "unknown direction '{}': expected north, south, east or west",
                other
            )),
        }
    }
}

//////////////////////////////
/// TEMPLATE CATALOG       ///
//////////////////////////////

pub const START_TAG: &str = "start";
pub const END_TAG: &str = "end";

/// Reusable room prototype. Never mutated after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTemplate {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub exits: BTreeSet<Direction>,
    pub tags: BTreeSet<String>,
    pub items: Vec<String>,
    pub entities: Vec<String>,
    pub details: BTreeMap<String, String>,
    pub door_levels: BTreeMap<Direction, u8>,
}

impl RoomTemplate {
    /// Bare template with only an id and exits; mostly useful for building catalogs in code.
    pub fn new(id: impl Into<String>, exits: impl IntoIterator<Item = Direction>) -> Self {
        let id = id.into();
        RoomTemplate {
            name: id.clone(),
            id,
            desc: String::new(),
            exits: exits.into_iter().collect(),
            tags: BTreeSet::new(),
            items: Vec::new(),
            entities: Vec::new(),
            details: BTreeMap::new(),
            door_levels: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_door_level(mut self, direction: Direction, level: u8) -> Self {
        self.door_levels.insert(direction, level);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_start(&self) -> bool {
        self.has_tag(START_TAG)
    }

    pub fn is_end(&self) -> bool {
        self.has_tag(END_TAG)
    }

    pub fn door_level(&self, direction: Direction) -> u8 {
        self.door_levels.get(&direction).copied().unwrap_or(0)
    }
}

/// Immutable set of templates the generator draws from.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    pub name: String,
    templates: Vec<RoomTemplate>,
}

impl TemplateCatalog {
    pub fn new(name: impl Into<String>, templates: Vec<RoomTemplate>) -> Self {
        TemplateCatalog {
            name: name.into(),
            templates,
        }
    }

    pub fn templates(&self) -> &[RoomTemplate] {
        &self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn get(&self, id: &str) -> Option<&RoomTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn start_templates(&self) -> Vec<&RoomTemplate> {
        self.templates.iter().filter(|t| t.is_start()).collect()
    }
}

//////////////////////////////
/// GENERATED MAP          ///
//////////////////////////////

/// One passage out of a room, as seen by the access layer.
///
/// Written as `{ destination, door_level }`. A bare room id is also accepted
/// when reading and means an ungated door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExitRecord")]
pub struct Exit {
    pub destination: String,
    pub door_level: u8,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExitRecord {
    Destination(String),
    Door {
        destination: String,
        #[serde(default)]
        door_level: u8,
    },
}

impl From<ExitRecord> for Exit {
    fn from(record: ExitRecord) -> Self {
        match record {
            ExitRecord::Destination(destination) => Exit {
                destination,
                door_level: 0,
            },
            ExitRecord::Door {
                destination,
                door_level,
            } => Exit {
                destination,
                door_level,
            },
        }
    }
}

/// A placed, finalized room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub template_id: String,
    pub name: String,
    #[serde(rename = "description", default)]
    pub desc: String,
    #[serde(default)]
    pub exits: BTreeMap<Direction, Exit>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Room {
    pub fn exit(&self, direction: Direction) -> Option<&Exit> {
        self.exits.get(&direction)
    }
}

/// The emitted map: rooms keyed by stable identifier plus the start room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    pub start_room: String,
    pub rooms: BTreeMap<String, Room>,
}

impl GameMap {
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn start(&self) -> Option<&Room> {
        self.rooms.get(&self.start_room)
    }
}
