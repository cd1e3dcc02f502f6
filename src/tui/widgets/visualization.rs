// Visualization panel: sample chart or table for the classified question.
//
// Chart mode draws horizontal bars; table mode lists the same rows with their
// full formatted value. Insights mode shows the summary stat cards and the
// key insight list. F2 cycles through them.

use ratatui::layout::{Constraint, Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;
use crate::viz::{chart_for, ChartSpec, VizMode, KEY_INSIGHTS, SUMMARY_STATS};

const BAR_COLORS: [Color; 5] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(kind) = state.visualization else {
        let paragraph = Paragraph::new("No visualization")
            .block(Block::default().borders(Borders::ALL).title(" Insights "));
        frame.render_widget(paragraph, area);
        return;
    };

    let chart = chart_for(kind);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(build_title(&chart, state.viz_mode));

    match state.viz_mode {
        VizMode::Chart => render_bars(frame, area, &chart, block),
        VizMode::Table => render_table(frame, area, &chart, block),
        VizMode::Insights => render_insights(frame, area, block),
    }
}

fn build_title(chart: &ChartSpec, mode: VizMode) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {} ", chart.title),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("[{}] ", mode.label()), Style::default().fg(Color::DarkGray)),
    ])
}

/// One bar per row, labelled with the row name and the compact value.
pub fn build_bars(chart: &ChartSpec) -> Vec<Bar<'static>> {
    chart
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Bar::default()
                .value(row.value)
                .label(Line::from(row.label))
                .text_value(chart.short_value(row.value))
                .style(Style::default().fg(BAR_COLORS[i % BAR_COLORS.len()]))
        })
        .collect()
}

fn render_bars(frame: &mut Frame, area: Rect, chart: &ChartSpec, block: Block<'static>) {
    let bars = build_bars(chart);
    let barchart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .value_style(Style::default().fg(Color::Black).bg(Color::White))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(barchart, area);
}

fn render_table(frame: &mut Frame, area: Rect, chart: &ChartSpec, block: Block<'static>) {
    let has_detail = chart.rows.iter().any(|r| r.detail.is_some());

    let mut header_cells = vec![Cell::from("Name"), Cell::from("Value")];
    if has_detail {
        header_cells.push(Cell::from("Risk / Manager"));
    }
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = chart
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                Cell::from(row.label),
                Cell::from(chart.format_value(row.value)),
            ];
            if has_detail {
                cells.push(Cell::from(row.detail.unwrap_or("--")));
            }
            Row::new(cells)
        })
        .collect();

    let widths = if has_detail {
        vec![
            Constraint::Min(14),
            Constraint::Length(13),
            Constraint::Min(12),
        ]
    } else {
        vec![Constraint::Min(14), Constraint::Length(13)]
    };

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

pub fn insight_lines() -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = SUMMARY_STATS
        .iter()
        .map(|card| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<22}", card.label),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    card.value,
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", card.note),
                    Style::default().fg(Color::Green),
                ),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Key Insights",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    lines.extend(KEY_INSIGHTS.iter().map(|text| Line::from(format!("  • {}", text))));
    lines
}

fn render_insights(frame: &mut Frame, area: Rect, block: Block<'static>) {
    let paragraph = Paragraph::new(insight_lines())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
