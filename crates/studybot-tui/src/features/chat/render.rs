//! Chat screen rendering: session sidebar, transcript and input line.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use studybot_core::model::{StudyMode, User, UserRole};

use super::transcript;
use crate::common::truncate_with_ellipsis;
use crate::input::{self, FieldStyle};
use crate::state::AppState;

const SIDEBAR_WIDTH: u16 = 30;
const HEADER_HEIGHT: u16 = 2;
const STATUS_HEIGHT: u16 = 1;
const INPUT_HEIGHT: u16 = 3;
const HELP_HEIGHT: u16 = 1;

/// Spinner frames for the loading indicator.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Screen regions of the chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    pub sidebar: Rect,
    pub header: Rect,
    pub transcript: Rect,
    pub status: Rect,
    pub input: Rect,
    pub help: Rect,
}

pub fn chat_layout(area: Rect) -> ChatLayout {
    let sidebar_width = if area.width > SIDEBAR_WIDTH * 2 {
        SIDEBAR_WIDTH
    } else {
        0
    };
    let [sidebar, main] =
        Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(1)]).areas(area);
    let [header, transcript, status, input, help] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(1),
        Constraint::Length(STATUS_HEIGHT),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(HELP_HEIGHT),
    ])
    .areas(main);

    ChatLayout {
        sidebar,
        header,
        transcript: Rect {
            x: transcript.x + 1,
            width: transcript.width.saturating_sub(2),
            ..transcript
        },
        status,
        input,
        help,
    }
}

pub fn render_chat(app: &AppState, user: &User, frame: &mut Frame) {
    let layout = chat_layout(frame.area());

    if layout.sidebar.width > 0 {
        render_sidebar(app, user, frame, layout.sidebar);
    }
    render_header(app, frame, layout.header);

    match app.store.active().filter(|s| !s.is_empty()) {
        Some(session) => {
            let width = usize::from(layout.transcript.width);
            let height = usize::from(layout.transcript.height);
            let lines = transcript::build_lines(&session.messages, width);
            let start = transcript::visible_start(lines.len(), height, app.chat.scroll);
            let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
            frame.render_widget(Paragraph::new(visible), layout.transcript);
        }
        None => render_mode_picker(frame, layout.transcript),
    }

    if app.is_active_loading() {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {spinner} Tutor is thinking..."),
                Style::default().fg(Color::Yellow),
            )),
            layout.status,
        );
    }

    input::render_field(
        frame,
        layout.input,
        &app.chat.input,
        FieldStyle {
            title: "Message",
            placeholder: "Ask anything about your studies...",
            focused: true,
            secret: false,
            disabled: app.chat.is_waiting(),
        },
    );

    frame.render_widget(
        Paragraph::new(
            "Enter send · F1-F5 study modes · Ctrl-N new chat · Alt-↑/↓ sessions · PgUp/PgDn scroll · Ctrl-L log out · Ctrl-C quit",
        )
        .style(Style::default().fg(Color::DarkGray)),
        layout.help,
    );
}

fn render_sidebar(app: &AppState, user: &User, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [new_chat, history, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            " + New Chat (Ctrl-N)",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        new_chat,
    );

    let title_width = usize::from(history.width.saturating_sub(2));
    let mut lines = vec![Line::from(Span::styled(
        " HISTORY",
        Style::default().fg(Color::DarkGray),
    ))];
    if app.store.sessions().is_empty() {
        lines.push(Line::from(Span::styled(
            " No previous sessions",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    let active = app.store.active_id();
    let max_rows = usize::from(history.height.saturating_sub(1));
    for session in app.store.sessions().iter().take(max_rows) {
        let title = truncate_with_ellipsis(&session.title, title_width);
        let is_active = active == Some(session.id.as_str());
        let waiting = app.chat.pending.as_deref() == Some(session.id.as_str());
        let marker = if is_active { "▸" } else { " " };
        let style = if is_active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut spans = vec![Span::styled(format!("{marker}{title}"), style)];
        if waiting {
            spans.push(Span::styled(" …", Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), history);

    let role = match user.role {
        UserRole::Student => "Student",
        UserRole::Guest => "Guest",
    };
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                format!(" {}", truncate_with_ellipsis(&user.name, title_width)),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {role} · Ctrl-L log out"),
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        footer,
    );
}

fn render_header(app: &AppState, frame: &mut Frame, area: Rect) {
    let title = app
        .store
        .active()
        .map_or("Student Chatbot", |s| s.title.as_str());
    let mut spans = vec![Span::styled(
        format!(" {title}"),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(mode) = app.store.mode() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {mode} Mode "),
            Style::default().fg(Color::Black).bg(Color::Green),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn render_mode_picker(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "What's our study goal today?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Select a category to start a guided learning session tailored to your needs.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];
    let buttons: Vec<Span<'static>> = StudyMode::starters()
        .iter()
        .enumerate()
        .flat_map(|(i, mode)| {
            [
                Span::styled(
                    format!("[F{}]", i + 1),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}   ", mode.label())),
            ]
        })
        .collect();
    lines.push(Line::from(buttons));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "...or just type a question below.",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
