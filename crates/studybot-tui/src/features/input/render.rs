//! Text field rendering.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use super::LineInput;

/// Mask character for secret fields.
const MASK: char = '•';

/// Options for drawing a [`LineInput`].
#[derive(Debug, Clone, Copy)]
pub struct FieldStyle<'a> {
    pub title: &'a str,
    pub placeholder: &'a str,
    pub focused: bool,
    pub secret: bool,
    pub disabled: bool,
}

/// Draws a bordered one-line field and places the terminal cursor when focused.
pub fn render_field(frame: &mut Frame, area: Rect, input: &LineInput, style: FieldStyle<'_>) {
    let border_color = if style.disabled {
        Color::DarkGray
    } else if style.focused {
        Color::Cyan
    } else {
        Color::Gray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            format!(" {} ", style.title),
            Style::default().fg(border_color),
        ));
    let inner = block.inner(area);

    let shown: Vec<char> = if style.secret {
        std::iter::repeat_n(MASK, input.char_count()).collect()
    } else {
        input.text().chars().collect()
    };

    let width = usize::from(inner.width.max(1));
    let (start, cursor_col) = visible_window(&shown, input.cursor(), width);

    let line = if shown.is_empty() {
        Line::from(Span::styled(
            style.placeholder.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        let visible: String = shown[start..].iter().collect();
        Line::from(visible)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);

    if style.focused && !style.disabled && inner.width > 0 {
        let x = inner.x + (cursor_col as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

/// Returns the first visible char index and the cursor column so the cursor
/// always stays inside `width` columns.
pub fn visible_window(chars: &[char], cursor: usize, width: usize) -> (usize, usize) {
    let col_of = |from: usize, to: usize| -> usize {
        chars[from..to]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum()
    };

    let cursor = cursor.min(chars.len());
    let mut start = 0;
    while start < cursor && col_of(start, cursor) >= width {
        start += 1;
    }
    (start, col_of(start, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_scrolls_to_keep_cursor_visible() {
        let chars: Vec<char> = "abcdefghij".chars().collect();

        assert_eq!(visible_window(&chars, 3, 5), (0, 3));
        let (start, col) = visible_window(&chars, 10, 5);
        assert_eq!(start, 6);
        assert_eq!(col, 4);
    }
}
