//! Procedural map generation.
//!
//! A map is grown from a [`crate::world::TemplateCatalog`]:
//!
//! * [`find_matching_templates`] filters templates against the exits a
//!   cell must have and must not have.
//! * [`MapGenerator`] places a `start` room at the origin and keeps
//!   filling random frontier cells until the target size is reached or the
//!   frontier runs dry.
//! * [`finalize`] turns the grid into a [`crate::world::GameMap`] keyed
//!   by `room_{x}_{y}` identifiers, dropping exits that lead nowhere.

mod coord;
mod emitter;
mod generator;
mod grid;
mod matcher;

pub use coord::Coord;
pub use emitter::finalize;
pub use generator::{FrontierEntry, GenerateError, GenerationStats, MapGenerator, generate};
pub use grid::{Grid, PlacedRoom};
pub use matcher::find_matching_templates;
