//! Alerts tab rendering.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};

use coldwatch_types::Alert;

use crate::app::App;
use crate::data::{AlertsView, HealthStatus};
use crate::ui::common::{panel, render_placeholder};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.views().alerts.as_ref() else {
        render_placeholder(frame, app, area, "Alerts", "Waiting for alerts...");
        return;
    };

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(6)]).split(area);
    render_summary(frame, app, view, chunks[0]);

    let body = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);
    render_by_zone(frame, app, view, body[0]);
    render_recent(frame, app, view, body[1]);
}

fn render_summary(frame: &mut Frame, app: &App, view: &AlertsView, area: Rect) {
    let line = Line::from(vec![
        Span::raw(" Critical: "),
        Span::styled(
            view.counts.critical.to_string(),
            app.theme.status_style(HealthStatus::Critical),
        ),
        Span::raw("  │  Warning: "),
        Span::styled(
            view.counts.warning.to_string(),
            app.theme.status_style(HealthStatus::Warning),
        ),
        Span::raw("  │  Total: "),
        Span::styled(
            view.counts.total().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(panel(app, " Alert Summary [c:clear] ")),
        area,
    );
}

fn render_by_zone(frame: &mut Frame, app: &App, view: &AlertsView, area: Rect) {
    if view.by_zone.is_empty() {
        render_placeholder(frame, app, area, "Alerts by Zone", "No alerts");
        return;
    }

    let bars: Vec<Bar> = view
        .by_zone
        .iter()
        .enumerate()
        .map(|(i, (zone, count))| {
            Bar::default()
                .label(Line::from(short_zone_name(zone)))
                .value(*count as u64)
                .style(Style::default().fg(app.theme.zone_color(i)))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(app, " Alerts by Zone "))
        .direction(ratatui::layout::Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn render_recent(frame: &mut Frame, app: &App, view: &AlertsView, area: Rect) {
    if view.recent.is_empty() {
        render_placeholder(frame, app, area, "Recent Alerts", "No recent alerts");
        return;
    }

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Zone"),
        Cell::from("Reading"),
        Cell::from("Allowed"),
        Cell::from("Severity"),
    ])
    .style(app.theme.header);

    let rows: Vec<Row> = view.recent.iter().map(|alert| alert_row(app, alert)).collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths).header(header).block(panel(
        app,
        format!(" Recent Alerts ({} newest) ", view.recent.len()),
    ));

    frame.render_widget(table, area);
}

fn alert_row<'a>(app: &App, alert: &'a Alert) -> Row<'a> {
    let unit = alert.parameter.unit();
    let time = alert
        .timestamp
        .map(|ts| ts.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        Cell::from(time),
        Cell::from(alert.zone.as_str()),
        Cell::from(format!("{} {:.1}{}", alert.parameter, alert.value, unit)),
        Cell::from(format!(
            "{:.1}..{:.1}{}",
            alert.min_threshold, alert.max_threshold, unit
        )),
        Cell::from(alert.severity.to_string()).style(app.theme.severity_style(alert.severity)),
    ])
}

/// "Zone B - Dairy" → "B - Dairy" so bar labels fit.
fn short_zone_name(zone: &str) -> String {
    zone.strip_prefix("Zone ").unwrap_or(zone).to_string()
}
