//! Frontier-driven room placement.

use log::{debug, info};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::BTreeSet;
use thiserror::Error;

use super::coord::Coord;
use super::emitter::finalize;
use super::grid::Grid;
use super::matcher::find_matching_templates;
use crate::world::{Direction, GameMap, RoomTemplate, TemplateCatalog};

/// Configuration problems that stop generation before anything is placed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("template catalog is empty")]
    EmptyCatalog,

    #[error("no template is tagged 'start'")]
    NoStartTemplate,

    #[error("target room count must be at least 1")]
    ZeroTarget,
}

/// Empty cell waiting for a room that opens toward `required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierEntry {
    pub coord: Coord,
    pub required: Direction,
}

/// Counters for the last run, mostly for logging.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationStats {
    /// Rooms on the map, start room included.
    pub placed: usize,

    /// Frontier entries for which no template fit.
    pub abandoned: usize,

    /// Frontier entries whose cell had been filled in the meantime.
    pub skipped_occupied: usize,

    /// Entries still pending when the target was reached.
    pub frontier_left: usize,
}

/// [`MapGenerator`] object.
pub struct MapGenerator<'a> {
    catalog: &'a TemplateCatalog,

    /// Upper bound on the number of rooms. Not a guarantee: branches that no
    /// template can close are dropped and the map may come out smaller.
    pub target_room_count: usize,

    /// Statistics of the last [`MapGenerator::generate`] call.
    pub stats: GenerationStats,
}

impl<'a> MapGenerator<'a> {
    /// Create the object.
    pub fn new(catalog: &'a TemplateCatalog, target_room_count: usize) -> Self {
        Self {
            catalog,
            target_room_count,
            stats: GenerationStats::default(),
        }
    }

    /// Generate and return a map.
    ///
    /// Every random choice (start template, frontier cell, candidate template)
    /// is drawn from `rng`, so a seeded generator reproduces the same map.
    ///
    /// # Errors
    ///
    /// The method returns an error if the catalog is empty, has no `start`
    /// template, or if the target room count is zero.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GameMap, GenerateError> {
        let catalog = self.catalog;
        self.stats = GenerationStats::default();

        if catalog.is_empty() {
            return Err(GenerateError::EmptyCatalog);
        }
        if self.target_room_count == 0 {
            return Err(GenerateError::ZeroTarget);
        }

        let starts = catalog.start_templates();
        let start = starts
            .choose(rng)
            .copied()
            .ok_or(GenerateError::NoStartTemplate)?;

        let mut grid = Grid::new();
        let mut frontier: Vec<FrontierEntry> = Vec::new();

        grid.place(Coord::ORIGIN, start);
        self.stats.placed = 1;
        debug!("Start room '{}' placed at {}", start.id, Coord::ORIGIN);
        extend_frontier(&grid, &mut frontier, Coord::ORIGIN, start);

        while !frontier.is_empty() && grid.len() < self.target_room_count {
            // Random pick, not FIFO/LIFO, so the map does not grow as a snake or a star.
            let entry = frontier.swap_remove(rng.random_range(0..frontier.len()));

            if grid.is_occupied(entry.coord) {
                self.stats.skipped_occupied += 1;
                continue;
            }

            let mut required: BTreeSet<Direction> = BTreeSet::from([entry.required]);
            let mut forbidden: BTreeSet<Direction> = BTreeSet::new();
            let (open, walled) = grid.neighbor_constraints(entry.coord);
            required.extend(open);
            forbidden.extend(walled);

            let candidates = find_matching_templates(catalog.templates(), &required, &forbidden);
            let Some(&chosen) = candidates.choose(rng) else {
                self.stats.abandoned += 1;
                debug!(
                    "No template fits {} (required {:?}, forbidden {:?}), branch dropped",
                    entry.coord, required, forbidden
                );
                continue;
            };

            grid.place(entry.coord, chosen);
            self.stats.placed += 1;
            debug!(
                "Placed '{}' at {} ({} candidates)",
                chosen.id,
                entry.coord,
                candidates.len()
            );
            extend_frontier(&grid, &mut frontier, entry.coord, chosen);
        }

        self.stats.frontier_left = frontier.len();
        info!(
            "Generated {} of {} rooms ({} branches dropped, {} stale entries, {} left pending)",
            self.stats.placed,
            self.target_room_count,
            self.stats.abandoned,
            self.stats.skipped_occupied,
            self.stats.frontier_left
        );

        Ok(finalize(grid))
    }
}

/// Generate a map with at most `target_room_count` rooms.
pub fn generate<R: Rng + ?Sized>(
    catalog: &TemplateCatalog,
    target_room_count: usize,
    rng: &mut R,
) -> Result<GameMap, GenerateError> {
    MapGenerator::new(catalog, target_room_count).generate(rng)
}

/// Queue the empty neighbors `template` opens onto.
fn extend_frontier(
    grid: &Grid,
    frontier: &mut Vec<FrontierEntry>,
    coord: Coord,
    template: &RoomTemplate,
) {
    for &dir in &template.exits {
        let target = coord.step(dir);
        if !grid.is_occupied(target) {
            frontier.push(FrontierEntry {
                coord: target,
                required: dir.opposite(),
            });
        }
    }
}
