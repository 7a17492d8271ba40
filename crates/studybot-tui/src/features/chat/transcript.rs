//! Transcript line building.

use chrono::{Local, TimeZone};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use studybot_core::model::{Message, Role};

use crate::common::wrap_text;

/// Left indent for message bodies.
const BODY_INDENT: &str = "  ";

/// Renders `messages` into styled lines wrapped to `width` columns.
pub fn build_lines(messages: &[Message], width: usize) -> Vec<Line<'static>> {
    let body_width = width.saturating_sub(BODY_INDENT.len()).max(1);
    let mut lines = Vec::new();

    for message in messages {
        let (label, color) = match message.role {
            Role::User => ("You", Color::Cyan),
            Role::Model => ("Tutor", Color::Green),
        };
        let mut header = vec![Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if let Some(time) = format_time(message.timestamp) {
            header.push(Span::styled(
                format!("  {time}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));

        for text in wrap_text(&message.content, body_width) {
            lines.push(Line::from(format!("{BODY_INDENT}{text}")));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn format_time(timestamp_ms: i64) -> Option<String> {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|t| t.format("%H:%M").to_string())
}

/// Returns the slice start for a bottom-anchored view of `total` lines.
pub fn visible_start(total: usize, height: usize, scroll: usize) -> usize {
    let max_start = total.saturating_sub(height);
    max_start.saturating_sub(scroll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_message_has_header_body_and_gap() {
        let messages = vec![Message::user("hi"), Message::model("hello there")];

        let lines = build_lines(&messages, 40);

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].spans[0].content, "You");
        assert_eq!(lines[1].to_string(), "  hi");
        assert_eq!(lines[3].spans[0].content, "Tutor");
    }

    #[test]
    fn test_visible_start_follows_bottom_and_clamps() {
        assert_eq!(visible_start(100, 20, 0), 80);
        assert_eq!(visible_start(100, 20, 5), 75);
        assert_eq!(visible_start(100, 20, 500), 0);
        assert_eq!(visible_start(10, 20, 0), 0);
    }
}
