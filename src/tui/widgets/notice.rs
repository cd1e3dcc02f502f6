// Notice line: current error on the left, newest toast on the right.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{Notification, NotificationLevel};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let toast = state.current_toast();
    let toast_width = toast
        .map(|t| t.text.chars().count() as u16 + 4)
        .unwrap_or(0)
        .min(area.width / 2);

    let [error_area, toast_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(toast_width)]).areas(area);

    if let Some(ref error) = state.error {
        let paragraph = Paragraph::new(Span::styled(
            format!(" {}", error),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(paragraph, error_area);
    }

    if let Some(toast) = toast {
        let paragraph = Paragraph::new(Span::styled(
            format!(" {} ", toast.text),
            toast_style(toast),
        ))
        .alignment(Alignment::Right);
        frame.render_widget(paragraph, toast_area);
    }
}

pub fn toast_style(toast: &Notification) -> Style {
    let bg = match toast.level {
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Error => Color::Red,
    };
    Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::UiUpdate;
    use crate::tui::apply_ui_update;

    fn row_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol())
            .collect()
    }

    #[test]
    fn toast_colors_follow_level() {
        assert_eq!(toast_style(&Notification::success("ok")).bg, Some(Color::Green));
        assert_eq!(toast_style(&Notification::error("no")).bg, Some(Color::Red));
    }

    #[test]
    fn shows_error_and_toast_together() {
        let backend = ratatui::backend::TestBackend::new(100, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Error("Error: quota".into()));
        apply_ui_update(
            &mut state,
            UiUpdate::Notify(Notification::error("Failed to get response")),
        );
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text = row_text(&terminal);
        assert!(text.contains("Error: quota"));
        assert!(text.contains("Failed to get response"));
    }

    #[test]
    fn empty_state_renders_blank() {
        let backend = ratatui::backend::TestBackend::new(40, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        assert!(row_text(&terminal).trim().is_empty());
    }
}
