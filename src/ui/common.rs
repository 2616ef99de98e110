//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay
//! and the loading/error placeholder.

use std::time::SystemTime;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use pidash_types::ReportWindow;

use crate::app::{App, View};
use crate::duration::format_age;
use crate::state::Status;

/// Render the header bar.
///
/// Displays: push channel state, selected window, query log size and fetch
/// status.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let connection = app.connection_state();

    let status = match &state.status {
        Status::Loading => Span::styled("loading", Style::default().fg(app.theme.warning)),
        Status::Done => Span::styled("ok", Style::default().fg(app.theme.healthy)),
        Status::Error(_) => Span::styled(
            "error",
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ),
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.connection_style(connection)),
        Span::styled("PIDASH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(connection.to_string(), app.theme.connection_style(connection)),
        Span::raw(" │ window "),
        Span::styled(
            window_label(state.days, state.clicked_days),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ log "),
        Span::styled(
            state.query_size.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        status,
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn window_label(days: ReportWindow, clicked: ReportWindow) -> String {
    if days == clicked {
        days.label().to_string()
    } else {
        format!("{} → {}", days.label(), clicked.label())
    }
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!(" {}:{} ", i + 1, view.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the age of the dashboard data and the controls of the current
/// view, or a temporary status message.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let updated = app
        .state()
        .dash_last_updated
        .and_then(|at| SystemTime::now().duration_since(at).ok())
        .map(|age| format!("Dashboard {} old", format_age(age)))
        .unwrap_or_else(|| "Dashboard not loaded".to_string());

    let controls = match app.current_view {
        View::Dashboard => "d/D:window r:reload Tab:switch ?:help q:quit",
        View::Queries => "↑↓:scroll +/-:size r:reload ?:help q:quit",
        View::Health => "d/D:window r:reload Tab:switch ?:help q:quit",
        View::Config => "↑↓:select space:toggle s:save r:reload q:quit",
    };

    let status = format!(" {} | {} | {}", app.current_view.label(), updated, controls);
    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render a centered placeholder while data is loading or after a failed
/// fetch. Returns `true` if something was drawn.
pub fn render_placeholder(frame: &mut Frame, app: &App, area: Rect, has_data: bool) -> bool {
    let (text, style) = match &app.state().status {
        Status::Loading if !has_data => ("Loading...".to_string(), Style::default().fg(app.theme.warning)),
        Status::Error(msg) => (
            format!("Something went wrong!\n\n{msg}\n\nPress r to retry"),
            Style::default().fg(app.theme.critical),
        ),
        Status::Done if !has_data => ("No data".to_string(), Style::default().add_modifier(Modifier::DIM)),
        _ => return false,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
    true
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  1-4 Tab     Switch views"),
        Line::from("  ←/→ h/l     Previous/next view"),
        Line::from("  ↑/↓ j/k     Scroll or select"),
        Line::from(""),
        section(" Dashboard & Health"),
        Line::from("  d / D     Wider / narrower window"),
        Line::from(""),
        section(" Queries"),
        Line::from("  + / -     Longer / shorter log"),
        Line::from(""),
        section(" Config"),
        Line::from("  space     Enable/disable rule"),
        Line::from("  s         Save rules"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Reload view"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
