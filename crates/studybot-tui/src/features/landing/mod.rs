//! Landing screen: entry menu before sign-in.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use studybot_core::auth::AuthMode;

use crate::common::centered_rect;
use crate::effects::UiEffect;
use crate::state::AppState;

const FEATURES: &[(&str, &str)] = &[
    ("Smart Notes", "Organize and summarize what you learn."),
    ("Assignment Help", "Step-by-step guidance, never just answers."),
    ("Project Guide", "Plan and build your student projects."),
    ("Deep Research", "Dig into any topic with a patient tutor."),
];

pub fn handle_landing_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Char('l') => {
            app.shell.open_auth(AuthMode::Login);
        }
        KeyCode::Char('s') => {
            app.shell.open_auth(AuthMode::Signup);
        }
        KeyCode::Char('g') => {
            if app.shell.try_for_free() {
                app.store.clear_active();
            }
        }
        KeyCode::Char('q') | KeyCode::Esc => return vec![UiEffect::Quit],
        _ => {}
    }
    vec![]
}

pub fn render_landing(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Student Chatbot",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Your personal AI tutor. Learn faster, understand deeper.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];
    for (title, blurb) in FEATURES {
        lines.push(Line::from(vec![
            Span::styled(format!("{title}: "), Style::default().fg(Color::Green)),
            Span::raw(*blurb),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        key_hint("g"),
        Span::raw(" Try for free   "),
        key_hint("l"),
        Span::raw(" Log in   "),
        key_hint("s"),
        Span::raw(" Sign up   "),
        key_hint("q"),
        Span::raw(" Quit"),
    ]));

    let height = lines.len() as u16;
    let area = centered_rect(area, 64, height);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn key_hint(key: &'static str) -> Span<'static> {
    Span::styled(
        format!("[{key}]"),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}
