//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never performs
//! either directly.

use studybot_core::composer::PendingTurn;

#[derive(Debug, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Ask the responder for the reply to `turn`. The result comes back as
    /// `UiEvent::ReplyReady`.
    RequestReply { turn: PendingTurn },
}
