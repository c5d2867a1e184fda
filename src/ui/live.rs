//! Live tab rendering.
//!
//! One row per zone with the current reading, its allowed range, per-field
//! compliance colouring and a sparkline of recent temperatures.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{HealthStatus, LiveView, ZoneCard};
use crate::ui::common::{panel, render_placeholder};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Number of sparkline cells shown per row.
const SPARKLINE_WIDTH: usize = 12;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.views().live.as_ref() else {
        render_placeholder(frame, app, area, "Live Readings", "Waiting for sensor data...");
        return;
    };

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).split(area);
    render_summary(frame, app, view, chunks[0]);
    render_table(frame, app, view, chunks[1]);
}

fn render_summary(frame: &mut Frame, app: &App, view: &LiveView, area: Rect) {
    let summary = view.summary;
    let line = Line::from(vec![
        Span::raw(" Zones: "),
        Span::styled(
            summary.total().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  Compliant: "),
        Span::styled(
            summary.compliant.to_string(),
            app.theme.status_style(HealthStatus::Healthy),
        ),
        Span::raw("  Non-compliant: "),
        Span::styled(
            summary.non_compliant.to_string(),
            app.theme.status_style(HealthStatus::Critical),
        ),
        Span::raw("  No threshold: "),
        Span::styled(
            summary.unknown.to_string(),
            app.theme.status_style(HealthStatus::Warning),
        ),
        Span::raw("  │  Active alerts: "),
        Span::styled(
            view.alert_count.to_string(),
            if view.alert_count > 0 {
                app.theme.status_style(HealthStatus::Warning)
            } else {
                Style::default()
            },
        ),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(panel(app, " Zone Status ")),
        area,
    );
}

fn render_table(frame: &mut Frame, app: &App, view: &LiveView, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Zone"),
        Cell::from("Temp"),
        Cell::from("Temp range"),
        Cell::from("Humidity"),
        Cell::from("Humidity range"),
        Cell::from("Trend"),
        Cell::from("°C/min"),
        Cell::from("Status"),
    ])
    .style(app.theme.header);

    let rows: Vec<Row> = view.cards.iter().map(|card| zone_row(app, card)).collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Min(SPARKLINE_WIDTH as u16),
        Constraint::Fill(1),
        Constraint::Min(6),
    ];

    let title = format!(" Live Readings ({} zones, snapshot #{}) ", view.cards.len(), view.seq);
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(app, title));

    frame.render_widget(table, area);
}

fn zone_row<'a>(app: &App, card: &'a ZoneCard) -> Row<'a> {
    let (temp_style, humidity_style) = match card.status {
        Some(status) => (
            app.theme.compliance_style(status.temperature_ok),
            app.theme.compliance_style(status.humidity_ok),
        ),
        None => (Style::default(), Style::default()),
    };

    let (temp_range, humidity_range) = match card.threshold {
        Some(t) => (
            format!("{:.1}..{:.1}", t.temp_min, t.temp_max),
            format!("{:.0}..{:.0}", t.humidity_min, t.humidity_max),
        ),
        None => ("-".to_string(), "-".to_string()),
    };

    let status_label = match card.status {
        Some(status) if status.is_compliant() => "Normal",
        Some(_) => "Alert",
        None => "No threshold",
    };

    Row::new(vec![
        Cell::from(card.zone.as_str()),
        Cell::from(format!("{:.1}°C", card.temperature)).style(temp_style),
        Cell::from(temp_range),
        Cell::from(format!("{:.1}%", card.humidity)).style(humidity_style),
        Cell::from(humidity_range),
        Cell::from(render_sparkline(&card.temperature_sparkline))
            .style(Style::default().fg(app.theme.highlight)),
        Cell::from(format_rate(card.temperature_rate)),
        Cell::from(status_label).style(app.theme.status_style(card.health())),
    ])
}

fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return " ".repeat(SPARKLINE_WIDTH);
    }

    let skip = data.len().saturating_sub(SPARKLINE_WIDTH);
    data[skip..]
        .iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r.abs() < 0.05 => "→ 0.0".to_string(),
        Some(r) if r > 0.0 => format!("↑ {:.1}", r),
        Some(r) => format!("↓ {:.1}", r.abs()),
        None => "-".to_string(),
    }
}
