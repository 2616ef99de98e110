//! Query log view rendering.
//!
//! Displays the most recent DNS requests, newest first, with how the filter
//! handled each one. New queries from the push channel appear at the top.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use pidash_types::DnsQuery;

use crate::app::App;
use crate::ui::common::render_placeholder;

/// Render the Queries view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let Some(queries) = state.queries.as_ref() else {
        render_placeholder(frame, app, area, false);
        return;
    };
    if state.status.error_msg().is_some() && render_placeholder(frame, app, area, true) {
        return;
    }

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Type"),
        Cell::from("Name"),
        Cell::from("Result"),
        Cell::from("Reply"),
        Cell::from("ms"),
        Cell::from("Reason"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = queries
        .iter()
        .map(|q| {
            let verdict = q.verdict();
            Row::new(vec![
                Cell::from(format_time(q.req_time)),
                Cell::from(q.req_type.clone()),
                Cell::from(q.name.clone()),
                Cell::from(verdict.label()).style(app.theme.verdict_style(verdict)),
                Cell::from(q.reply.clone().unwrap_or_default()),
                Cell::from(q.resp_time.to_string()),
                Cell::from(reason(q)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(5),
        Constraint::Length(18),
    ];

    let title = format!(" Queries ({}/{}) ", queries.len(), state.query_size);
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected);

    let mut table_state = TableState::default();
    if !queries.is_empty() {
        table_state.select(Some(app.query_offset.min(queries.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Request time as local wall-clock time.
fn format_time(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn reason(query: &DnsQuery) -> String {
    match &query.reason {
        Some(reason) if !reason.is_empty() => reason.clone(),
        _ => "-".to_string(),
    }
}
