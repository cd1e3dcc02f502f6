// Transcript widget: the conversation, newest at the bottom.
//
// Empty transcript shows a welcome text with the suggested questions.
// Otherwise each message gets a header line (sender, time, processing time)
// followed by its wrapped text.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::chat::{ChatMessage, Sender};
use crate::tui::{ViewState, SUGGESTIONS};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = if state.messages.is_empty() {
        welcome_lines()
    } else {
        state.messages.iter().flat_map(message_lines).collect()
    };

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2) as usize;

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    // Rows as the paragraph wraps them, measured before the border is added.
    let total = paragraph.line_count(inner_width);
    let scroll = bottom_scroll(total, inner_height, state.scroll_offset);

    let title = if state.scroll_offset > 0 {
        " Conversation (scrolled) "
    } else {
        " Conversation "
    };

    let paragraph = paragraph
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn welcome_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome to the Portfolio AI Assistant",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Ask about investors, portfolios, risk and transactions."),
        Line::from(""),
        Line::from(Span::styled(
            "Try one of these (Tab to fill):",
            Style::default().fg(Color::Gray),
        )),
    ];
    lines.extend(
        SUGGESTIONS
            .iter()
            .map(|s| Line::from(format!("  • {}", s))),
    );
    lines
}

/// Header plus body lines for one message, followed by a blank spacer.
pub fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let (label, color) = match message.sender {
        Sender::User => ("You", Color::Green),
        Sender::Bot => ("Assistant", Color::Cyan),
    };

    let mut header = vec![
        Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", message.time_label()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(ref took) = message.processing_time {
        header.push(Span::styled(
            format!("  ({})", took),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(header)];
    lines.extend(message.text.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));
    lines
}

/// Scroll position that pins the bottom of the content to the bottom of the
/// view, moved up by `offset` lines.
fn bottom_scroll(total: usize, height: usize, offset: usize) -> u16 {
    let max = total.saturating_sub(height);
    max.saturating_sub(offset).min(u16::MAX as usize) as u16
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
