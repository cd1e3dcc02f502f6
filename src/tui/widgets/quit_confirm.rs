// Quit confirmation overlay.
//
// Drawn last, over the chat screen, while `ViewState::confirm_quit` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_WIDTH: u16 = 32;
const DIALOG_HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, area: Rect) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let lines = vec![
        Line::from(" Leave the assistant?"),
        Line::from(vec![
            Span::raw(" "),
            key("y", Color::Green),
            Span::raw(" quit   "),
            key("n", Color::Red),
            Span::raw(" keep chatting"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Quit "),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// Rectangle of at most `width` x `height` centered in `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [dialog] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    dialog
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let dialog = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        assert_eq!(dialog.width, DIALOG_WIDTH);
        assert_eq!(dialog.height, DIALOG_HEIGHT);
        assert_eq!(dialog.x, 24);
        assert!(dialog.y.abs_diff(9) <= 1);
    }

    #[test]
    fn dialog_clamps_to_small_area() {
        let area = Rect::new(0, 0, 10, 3);
        let dialog = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        assert!(dialog.width <= area.width);
        assert!(dialog.height <= area.height);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area()))
            .unwrap();
    }
}
