//! Text input feature.

mod render;
mod state;
mod update;

pub use render::{FieldStyle, render_field, visible_window};
pub use state::LineInput;
pub use update::handle_edit_key;
