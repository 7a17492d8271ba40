//! Auth screen rendering.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use studybot_core::auth::{AuthMode, Field};

use super::{AuthFormState, NoticeKind};
use crate::common::centered_rect;
use crate::input::{self, FieldStyle};

const FORM_WIDTH: u16 = 56;
const FIELD_HEIGHT: u16 = 3;

pub fn render_auth(frame: &mut Frame, area: Rect, form: &AuthFormState, mode: AuthMode) {
    let fields = mode.fields();
    let form_height = 4 + FIELD_HEIGHT * fields.len() as u16 + 4;
    let area = centered_rect(area, FORM_WIDTH, form_height);

    let mut constraints = vec![Constraint::Length(1), Constraint::Length(3)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(FIELD_HEIGHT)));
    constraints.push(Constraint::Length(2));
    constraints.push(Constraint::Min(1));
    let chunks = Layout::vertical(constraints).split(area);

    frame.render_widget(
        Paragraph::new(Span::styled("← Esc back", Style::default().fg(Color::DarkGray))),
        chunks[0],
    );

    let header = vec![
        Line::from(Span::styled(
            mode.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            mode.subtitle(),
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(header).wrap(Wrap { trim: true }), chunks[1]);

    let focused = form.focused_field(mode);
    for (i, field) in fields.iter().enumerate() {
        input::render_field(
            frame,
            chunks[2 + i],
            form.input(*field),
            FieldStyle {
                title: field.label(),
                placeholder: placeholder(*field),
                focused: *field == focused,
                secret: field.is_secret(),
                disabled: false,
            },
        );
    }

    let notice_area = chunks[2 + fields.len()];
    if let Some(notice) = &form.notice {
        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(notice.text.as_str(), Style::default().fg(color)))
                .wrap(Wrap { trim: true }),
            notice_area,
        );
    }

    frame.render_widget(
        Paragraph::new(help_lines(mode))
            .alignment(Alignment::Left)
            .style(Style::default().fg(Color::DarkGray)),
        chunks[3 + fields.len()],
    );
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::Name => "Student Name",
        Field::Email => "name@gmail.com",
        Field::Password | Field::ConfirmPassword => "••••••••",
        Field::Code => "000000",
    }
}

fn help_lines(mode: AuthMode) -> Vec<Line<'static>> {
    let submit = match mode {
        AuthMode::Login => "Enter sign in",
        AuthMode::Signup => "Enter create account",
        AuthMode::Forgot => "Enter send code",
        AuthMode::Verify => "Enter verify",
    };
    let mut lines = vec![Line::from(format!("{submit} · Tab next field"))];
    match mode {
        AuthMode::Login => lines.push(Line::from(
            "Ctrl-T no account? sign up · Ctrl-F forgot password",
        )),
        AuthMode::Signup => lines.push(Line::from("Ctrl-T already have an account? log in")),
        AuthMode::Forgot | AuthMode::Verify => {
            lines.push(Line::from("Ctrl-T back to login"));
        }
    }
    lines
}
