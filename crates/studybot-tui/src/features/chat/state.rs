//! Chat screen view state.

use crate::input::LineInput;

#[derive(Debug, Clone, Default)]
pub struct ChatViewState {
    pub input: LineInput,
    /// Session id of the in-flight reply, if any.
    pub pending: Option<String>,
    /// Lines scrolled up from the bottom of the transcript (0 follows latest).
    pub scroll: usize,
}

impl ChatViewState {
    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn follow_latest(&mut self) {
        self.scroll = 0;
    }
}
