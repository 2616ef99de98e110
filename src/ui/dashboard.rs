//! Dashboard view rendering.
//!
//! Displays request totals, the blocked share, request volume over time and
//! the top tables for the selected report window.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};

use pidash_types::DashboardData;

use crate::app::App;
use crate::ui::common::{format_count, render_placeholder};

/// Rows shown in each top table.
const TOP_ROWS: usize = 10;

/// Render the Dashboard view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let Some(data) = state.dashboard_data.as_ref() else {
        render_placeholder(frame, app, area, false);
        return;
    };
    if state.status.error_msg().is_some() && render_placeholder(frame, app, area, true) {
        return;
    }

    let rows = Layout::vertical([
        Constraint::Length(3), // Totals
        Constraint::Length(6), // Volume
        Constraint::Min(5),    // Tables
    ])
    .split(area);

    render_totals(frame, app, data, rows[0]);
    render_volume(frame, app, data, rows[1]);

    let columns = Layout::horizontal([
        Constraint::Percentage(24),
        Constraint::Percentage(38),
        Constraint::Percentage(38),
    ])
    .split(rows[2]);

    render_table(frame, app, " Request Types ", &data.ranked_types(), columns[0]);
    render_table(frame, app, " Top Approved ", &data.ranked_approved(), columns[1]);
    render_table(frame, app, " Top Blocked ", &data.ranked_rejected(), columns[2]);
}

fn render_totals(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    let blocked = data
        .blocked_percent()
        .map(|p| format!("{p:.1}%"))
        .unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::raw(" Requests "),
        Span::styled(
            format_count(data.total_count),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   Blocked "),
        Span::styled(
            format_count(data.reject_count),
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   Blocked share "),
        Span::styled(blocked, Style::default().fg(app.theme.critical)),
    ]);

    let block = Block::default()
        .title(format!(" {} ", app.state().days.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_volume(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    let volume: Vec<u64> = data
        .volume_by_time()
        .into_iter()
        .map(|(_, v)| v.max(0.0).round() as u64)
        .collect();

    // Keep the most recent buckets that fit inside the borders
    let width = area.width.saturating_sub(2) as usize;
    let visible = &volume[volume.len().saturating_sub(width)..];

    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .title(" Request Volume ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .data(visible)
        .style(Style::default().fg(app.theme.highlight));

    frame.render_widget(sparkline, area);
}

fn render_table(frame: &mut Frame, app: &App, title: &str, ranked: &[(&str, u64)], area: Rect) {
    let header = Row::new(vec![Cell::from("Name"), Cell::from("Count")])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = ranked
        .iter()
        .take(TOP_ROWS)
        .map(|(name, count)| Row::new(vec![Cell::from(*name), Cell::from(format_count(*count))]))
        .collect();

    let table = Table::new(rows, [Constraint::Min(8), Constraint::Length(7)])
        .header(header)
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );

    frame.render_widget(table, area);
}
