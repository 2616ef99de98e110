//! Config view rendering.
//!
//! Displays the approve and reject rules with the current selection, the
//! result of the last save and the block lists the server has loaded.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use pidash_types::FilterRule;

use crate::api::{PageStatus, RuleList};
use crate::app::App;
use crate::ui::common::format_count;

/// Render the Config view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let page = &app.config_page;
    match page.status {
        PageStatus::Loading => {
            frame.render_widget(
                Paragraph::new("Loading...").style(Style::default().fg(app.theme.warning)),
                area,
            );
            return;
        }
        PageStatus::Error => {
            frame.render_widget(
                Paragraph::new("Something went wrong! Press r to retry")
                    .style(Style::default().fg(app.theme.critical)),
                area,
            );
            return;
        }
        PageStatus::Done => {}
    }

    let rows = Layout::vertical([
        Constraint::Length(1), // Save result / hint
        Constraint::Min(6),    // Rules
        Constraint::Length(8), // Block lists
    ])
    .split(area);

    frame.render_widget(Paragraph::new(save_line(app)), rows[0]);

    let columns = Layout::horizontal([Constraint::Percentage(50); 2]).split(rows[1]);
    render_rules(frame, app, RuleList::Approve, &page.rules.approve_rules, columns[0]);
    render_rules(frame, app, RuleList::Reject, &page.rules.reject_rules, columns[1]);

    render_block_list(frame, app, rows[2]);
}

fn save_line(app: &App) -> Line<'static> {
    let page = &app.config_page;
    let result = match page.updated {
        _ if !page.update_enabled => Span::styled("Saving...", Style::default().fg(app.theme.warning)),
        Some(true) => Span::styled("Rules updated", Style::default().fg(app.theme.healthy)),
        Some(false) => Span::styled(
            "Rules were not updated",
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ),
        None => Span::raw(""),
    };
    Line::from(vec![
        Span::styled(
            " Prefix with * for regex, # to disable   ",
            Style::default().add_modifier(Modifier::DIM),
        ),
        result,
    ])
}

fn render_rules(frame: &mut Frame, app: &App, list: RuleList, lines: &[String], area: Rect) {
    let selected = app
        .config_page
        .selected()
        .and_then(|(l, idx)| (l == list).then_some(idx));

    let items: Vec<ListItem> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let style = match FilterRule::parse(line) {
                Some(rule) if !rule.enabled => Style::default().add_modifier(Modifier::DIM),
                Some(rule) if rule.is_regex => Style::default().fg(app.theme.highlight),
                _ => Style::default(),
            };
            let style = if selected == Some(i) {
                style.patch(app.theme.selected)
            } else {
                style
            };
            ListItem::new(line.as_str()).style(style)
        })
        .collect();

    let title = match list {
        RuleList::Approve => format!(" Approve ({}) ", lines.len()),
        RuleList::Reject => format!(" Reject ({}) ", lines.len()),
    };
    let border = if selected.is_some() {
        app.theme.highlight
    } else {
        app.theme.border
    };

    let widget = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(widget, area);
}

fn render_block_list(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![Cell::from("Source"), Cell::from("Entries")])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = app
        .config_page
        .rules
        .block_list
        .iter()
        .map(|(url, count)| Row::new(vec![Cell::from(url.as_str()), Cell::from(format_count(*count))]))
        .collect();

    let table = Table::new(rows, [Constraint::Min(20), Constraint::Length(8)])
        .header(header)
        .block(
            Block::default()
                .title(" Block Lists ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
    frame.render_widget(table, area);
}
