mod loader;
mod model;
mod validator;

pub use loader::{
    LoadError, load_catalog_from_file, load_catalog_from_json_str, load_catalog_from_str,
    load_map_from_file,
};

// Re-export only what the generator and the engine use.
pub use model::{
    Direction, END_TAG, Exit, GameMap, Room, RoomTemplate, START_TAG, TemplateCatalog,
};
pub use validator::{ValidationError, reachable_from, validate_catalog, validate_map};
