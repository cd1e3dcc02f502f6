// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-----------------------------+--------------------+
// | Transcript (fill)            | Visualization (40%)|
// |                              | (only when shown)  |
// +-----------------------------+--------------------+
// | Notice line (1 row)                               |
// +--------------------------------------------------+
// | Input box (3 rows)                                |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Title, service health, request status.
    pub status_bar: Rect,
    pub transcript: Rect,
    /// Sample chart panel, present only while a visualization is shown.
    pub visualization: Option<Rect>,
    /// Error message on the left, toast on the right.
    pub notice: Rect,
    pub input: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect, show_visualization: bool) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(3),    // body
            Constraint::Length(1), // notice
            Constraint::Length(3), // input
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let body = vertical[1];
    let (transcript, visualization) = if show_visualization {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(body);
        (horizontal[0], Some(horizontal[1]))
    } else {
        (body, None)
    };

    AppLayout {
        status_bar: vertical[0],
        transcript,
        visualization,
        notice: vertical[2],
        input: vertical[3],
        help_bar: vertical[4],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    #[test]
    fn fixed_rows_have_expected_heights() {
        let layout = build_layout(test_area(), false);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.notice.height, 1);
        assert_eq!(layout.input.height, 3);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.transcript.height, 40 - 6);
    }

    #[test]
    fn transcript_takes_full_width_without_visualization() {
        let layout = build_layout(test_area(), false);
        assert!(layout.visualization.is_none());
        assert_eq!(layout.transcript.width, 120);
    }

    #[test]
    fn visualization_panel_sits_right_of_transcript() {
        let layout = build_layout(test_area(), true);
        let viz = layout.visualization.expect("panel should be present");
        assert_eq!(viz.width, 48);
        assert_eq!(layout.transcript.width, 72);
        assert!(viz.x >= layout.transcript.x + layout.transcript.width);
        assert_eq!(viz.height, layout.transcript.height);
    }

    #[test]
    fn zones_stack_top_to_bottom() {
        let layout = build_layout(test_area(), false);
        assert!(layout.status_bar.y < layout.transcript.y);
        assert!(layout.transcript.y < layout.notice.y);
        assert!(layout.notice.y < layout.input.y);
        assert!(layout.input.y < layout.help_bar.y);
        assert_eq!(layout.help_bar.y + layout.help_bar.height, 40);
    }
}
