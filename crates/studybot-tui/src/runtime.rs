//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! All side effects happen here. The reducer stays pure and produces
//! effects; this module executes them.
//!
//! Async results are sent as `UiEvent`s to `inbox_tx` and drained from
//! `inbox_rx` each loop iteration.

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use studybot_core::composer::PendingTurn;
use studybot_core::providers::Generate;
use studybot_core::responder::Responder;
use studybot_core::storage::Storage;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Frame cadence while a reply is pending or the user is typing.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Terminal state is restored on drop and on panic.
pub struct TuiRuntime<G> {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    responder: Arc<Responder<G>>,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl<G: Generate + 'static> TuiRuntime<G> {
    /// Enters the alternate screen and hydrates state from `storage`.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(storage: Arc<dyn Storage>, responder: Responder<G>) -> Result<Self> {
        // Panic hook goes in before the alternate screen.
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::hydrate(storage);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            responder: Arc::new(responder),
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal input fails.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            // Layout updates happen before input is handled.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Only Tick triggers a redraw; other events batch until then.
                let marks_dirty = matches!(&event, UiEvent::Tick);

                let effects = update::update(&mut self.state, event);
                if marks_dirty {
                    dirty = true;
                }
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if self.state.chat.is_waiting() || recent_terminal_activity {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Block until the next tick only when nothing is queued.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async handler and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::RequestReply { turn } => {
                let responder = Arc::clone(&self.responder);
                self.spawn_effect(move || request_reply(responder, turn));
            }
        }
    }
}

impl<G> Drop for TuiRuntime<G> {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

/// Asks the responder for the reply to `turn`.
///
/// Always resolves to `ReplyReady`; provider failures arrive as fallback text.
pub async fn request_reply<G: Generate>(
    responder: Arc<Responder<G>>,
    turn: PendingTurn,
) -> UiEvent {
    tracing::debug!(session = %turn.session_id, mode = %turn.mode, "Requesting reply");
    let reply = responder
        .respond(&turn.prompt, &turn.history, turn.mode)
        .await;
    UiEvent::ReplyReady { turn, reply }
}

#[cfg(test)]
mod tests {
    use studybot_core::model::{Message, StudyMode};
    use studybot_core::providers::{ProviderError, ProviderErrorKind, ProviderResult, Turn};
    use studybot_core::responder::API_KEY_FALLBACK;

    use super::*;

    struct Echo;

    impl Generate for Echo {
        async fn generate(&self, turns: &[Turn], _system: &str) -> ProviderResult<String> {
            Ok(format!("{} turns", turns.len()))
        }
    }

    struct NoKey;

    impl Generate for NoKey {
        async fn generate(&self, _turns: &[Turn], _system: &str) -> ProviderResult<String> {
            Err(ProviderError::new(ProviderErrorKind::Auth, "missing key"))
        }
    }

    fn turn() -> PendingTurn {
        PendingTurn {
            session_id: "s1".to_string(),
            prompt: "hi".to_string(),
            history: vec![Message::user("hi")],
            mode: StudyMode::Study,
        }
    }

    #[tokio::test]
    async fn test_request_reply_tags_session() {
        let event = request_reply(Arc::new(Responder::new(Echo)), turn()).await;

        match event {
            UiEvent::ReplyReady { turn, reply } => {
                assert_eq!(turn.session_id, "s1");
                assert_eq!(reply, "1 turns");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_reply_falls_back_on_error() {
        let event = request_reply(Arc::new(Responder::new(NoKey)), turn()).await;

        assert!(matches!(event, UiEvent::ReplyReady { reply, .. } if reply == API_KEY_FALLBACK));
    }
}
