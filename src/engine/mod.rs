pub mod access;
mod movement;
mod output;
mod render;

pub use access::{check_access, destination, door_level, exit_details};
pub use movement::try_handle_movement;
pub use output::{Output, OutputBlock};
pub use render::{render_ascii_map, render_room, room_positions};
