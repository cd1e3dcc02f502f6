// Status bar widget: title, service health, request status, message count.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{RequestStatus, ServiceStatus};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title] [health dot + label] | [request status] | [message count]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (dot, dot_color, health) = health_indicator(state.service_status);
    let (request, request_color) = request_label(state.request_status);

    let spans = vec![
        Span::styled(
            " Portfolio AI Assistant ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", dot), Style::default().fg(dot_color)),
        Span::styled(health, Style::default().fg(Color::White)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(request, Style::default().fg(request_color)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} messages", state.messages.len()),
            Style::default().fg(Color::White),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Dot, dot color and label for the service health.
pub fn health_indicator(status: ServiceStatus) -> (&'static str, Color, &'static str) {
    match status {
        ServiceStatus::Healthy => ("●", Color::Green, "online"),
        ServiceStatus::Unreachable => ("●", Color::Red, "offline"),
        ServiceStatus::Unknown => ("●", Color::DarkGray, "checking"),
    }
}

pub fn request_label(status: RequestStatus) -> (String, Color) {
    match status {
        RequestStatus::Idle => ("idle".to_string(), Color::DarkGray),
        RequestStatus::Pending => ("thinking...".to_string(), Color::Yellow),
        RequestStatus::Retrying { attempt, max } => {
            (format!("retrying {}/{}", attempt, max), Color::Red)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
