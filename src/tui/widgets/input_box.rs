// Input box widget: the question being typed, with a placeholder when empty.

use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::protocol::RequestStatus;
use crate::tui::ViewState;

const PLACEHOLDER: &str = "Ask about portfolios, clients, risk or transactions...";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let busy = state.request_status != RequestStatus::Idle;
    let title = if busy { " Ask (waiting for answer) " } else { " Ask " };
    let border = if busy {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Green)
    };

    let content = if state.input.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(visible_tail(&state.input, area.width.saturating_sub(3) as usize))
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    );
    frame.render_widget(paragraph, area);

    if !state.confirm_quit && area.width > 2 && area.height > 2 {
        let typed = visible_tail(&state.input, area.width.saturating_sub(3) as usize);
        let x = area.x + 1 + typed.width().min(u16::MAX as usize) as u16;
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

/// Longest suffix of `input` that fits in `width` terminal columns, so the
/// cursor end stays visible. Wide characters count as two columns.
pub fn visible_tail(input: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = input.len();
    for (idx, c) in input.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = idx;
    }
    &input[start..]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
