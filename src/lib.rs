pub mod engine;
pub mod mapgen;
pub mod world;

use std::collections::HashMap;

use engine::{Output, render_ascii_map, render_room, try_handle_movement};
use world::GameMap;

pub use mapgen::{GenerateError, MapGenerator, generate};
pub use world::{LoadError, TemplateCatalog, load_catalog_from_file, load_catalog_from_str};

/// Walks a generated map: the player's position, clearance and turn counter.
pub struct Explorer {
    pub map: GameMap,
    pub current_room_id: String,
    pub clearance_level: u8,
    pub turn_index: u64,
}

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde::Serialize;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    #[derive(Serialize)]
    struct WasmStepResult {
        blocks: Vec<engine::OutputBlock>,
        quit: bool,
    }

    #[wasm_bindgen]
    pub struct WasmExplorer {
        explorer: Explorer,
    }

    #[wasm_bindgen]
    impl WasmExplorer {
        /// Generate a map from a TOML catalog string. Call `init()` to get the initial render.
        #[wasm_bindgen(constructor)]
        pub fn new(
            catalog_toml: &str,
            rooms: usize,
            seed: u64,
            clearance: u8,
        ) -> Result<WasmExplorer, JsValue> {
            let catalog = load_catalog_from_str(catalog_toml)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            let mut rng = StdRng::seed_from_u64(seed);
            let map = generate(&catalog, rooms, &mut rng)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(WasmExplorer {
                explorer: Explorer::new(map, clearance),
            })
        }

        /// Return the render of the start room.
        #[wasm_bindgen]
        pub fn init(&mut self) -> JsValue {
            match self.explorer.initialize() {
                Some(out) => to_value(&WasmStepResult {
                    blocks: out.blocks,
                    quit: false,
                })
                .unwrap_or(JsValue::NULL),
                None => JsValue::NULL,
            }
        }

        /// Process a player command and return the resulting output blocks and quit flag.
        #[wasm_bindgen]
        pub fn step(&mut self, input: &str) -> JsValue {
            let (out, quit) = self.explorer.step(input);
            to_value(&WasmStepResult {
                blocks: out.blocks,
                quit,
            })
            .unwrap_or(JsValue::NULL)
        }
    }
}

impl Explorer {
    pub fn new(map: GameMap, clearance_level: u8) -> Self {
        Explorer {
            current_room_id: map.start_room.clone(),
            map,
            clearance_level,
            turn_index: 0,
        }
    }

    /// Put the player back in the start room and render it.
    pub fn initialize(&mut self) -> Option<Output> {
        self.current_room_id = self.map.start_room.clone();
        let room = self.map.room(&self.current_room_id)?;
        let mut out = Output::new();
        render_room(&mut out, room);
        Some(out)
    }

    /// One-letter markers for the entities of each room, as drawn on the map.
    pub fn entity_markers(&self) -> HashMap<String, Vec<String>> {
        let mut markers: HashMap<String, Vec<String>> = HashMap::new();
        for (id, room) in &self.map.rooms {
            let tags: Vec<String> = room
                .entities
                .iter()
                .filter_map(|e| e.chars().next())
                .map(|c| c.to_uppercase().to_string())
                .collect();
            if !tags.is_empty() {
                markers.insert(id.clone(), tags);
            }
        }
        markers
    }

    /// Process a single player input; returns (output, quit?)
    pub fn step(&mut self, input: &str) -> (Output, bool) {
        let mut out = Output::new();
        let input = input.trim();
        let lower = input.to_lowercase();

        if lower == "quit" || lower == "exit" {
            out.say("Goodbye.");
            return (out, true);
        }

        let Some(current_room) = self.map.room(&self.current_room_id) else {
            out.say(format!(
                "Error: you are in an unknown room '{}'",
                self.current_room_id
            ));
            return (out, true);
        };

        if lower == "look" || lower == "l" {
            render_room(&mut out, current_room);
        } else if lower == "map" || lower == "m" {
            let markers = self.entity_markers();
            out.map(render_ascii_map(
                &self.map,
                &markers,
                Some(self.current_room_id.as_str()),
            ));
        } else if let Some(target) = lower
            .strip_prefix("examine ")
            .or_else(|| lower.strip_prefix("x "))
        {
            let target = target.trim();
            match current_room
                .details
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(target))
            {
                Some((_, text)) => out.say(text.clone()),
                None => out.say("You see no such thing."),
            }
        } else {
            let prev_room_id = self.current_room_id.clone();
            let map = &self.map;

            if try_handle_movement(
                &mut out,
                &mut self.current_room_id,
                map,
                self.clearance_level,
                &lower,
            ) {
                if self.current_room_id != prev_room_id {
                    self.turn_index += 1;
                    if let Some(room) = map.room(&self.current_room_id) {
                        render_room(&mut out, room);
                    }
                }
            } else {
                out.say("I don't understand that command.");
            }
        }

        (out, false)
    }
}
