//! Health view rendering.
//!
//! Displays one line chart per health series (CPU average, memory, CPU
//! temperature). Live samples from the push channel extend the charts.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use pidash_types::{HealthMetric, Series};

use crate::app::App;
use crate::ui::common::render_placeholder;

/// Render the Health view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let Some(health) = state.health.as_ref() else {
        render_placeholder(frame, app, area, false);
        return;
    };
    if state.status.error_msg().is_some() && render_placeholder(frame, app, area, true) {
        return;
    }

    let rows = Layout::vertical([Constraint::Ratio(1, 3); 3]).split(area);
    for (i, series) in health.iter().take(HealthMetric::SERIES_COUNT).enumerate() {
        let color = app.theme.series[i];
        render_chart(frame, app, series, color, rows[i]);
    }
}

fn render_chart(frame: &mut Frame, app: &App, series: &Series, color: Color, area: Rect) {
    let points: Vec<(f64, f64)> = series.data.iter().map(|&(t, v)| (t as f64, v)).collect();
    let (x_bounds, y_bounds) = bounds(&points);

    let latest = series
        .last()
        .map(|(_, v)| format!("{v:.1}"))
        .unwrap_or_else(|| "-".to_string());
    let title = format!(" {} | now {} ", series.name, latest);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(Axis::default().bounds(x_bounds))
        .y_axis(
            Axis::default()
                .bounds(y_bounds)
                .labels([format!("{:.0}", y_bounds[0]), format!("{:.0}", y_bounds[1])])
                .style(Style::default().add_modifier(Modifier::DIM)),
        );

    frame.render_widget(chart, area);
}

/// Axis bounds covering all points, padded so a flat line stays visible.
fn bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    if points.is_empty() {
        return ([0.0, 1.0], [0.0, 1.0]);
    }
    let (mut x_min, mut x_max) = (f64::MAX, f64::MIN);
    let (mut y_min, mut y_max) = (f64::MAX, f64::MIN);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    let pad = ((y_max - y_min) * 0.1).max(1.0);
    ([x_min, x_max], [(y_min - pad).max(0.0), y_max + pad])
}
