//! Chat feature: sessions sidebar, transcript, study modes and composer input.

mod render;
mod state;
pub mod transcript;
mod update;

pub use render::{ChatLayout, chat_layout, render_chat};
pub use state::ChatViewState;
pub use update::{handle_chat_key, handle_reply_ready};
