//! UI event types consumed by the reducer.

use crossterm::event::Event;
use studybot_core::composer::PendingTurn;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick; the only event that triggers a redraw.
    Tick,
    /// Current terminal size, emitted at the start of each loop iteration.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(Event),
    /// The responder finished the turn (success or fallback text).
    ReplyReady { turn: PendingTurn, reply: String },
}
