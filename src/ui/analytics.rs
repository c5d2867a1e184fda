//! Analytics tab rendering.
//!
//! Headline compliance figures as gauges, followed by the backend's
//! per-zone metrics.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{AnalyticsView, HealthStatus, Kpi};
use crate::ui::common::{panel, render_placeholder};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = app.views().analytics.as_ref() else {
        render_placeholder(frame, app, area, "Analytics", "Waiting for analytics...");
        return;
    };

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).split(area);
    render_kpis(frame, app, view, chunks[0]);
    render_zone_metrics(frame, app, view, chunks[1]);
}

fn render_kpis(frame: &mut Frame, app: &App, view: &AnalyticsView, area: Rect) {
    let constraints = vec![Constraint::Ratio(1, view.kpis.len().max(1) as u32); view.kpis.len()];
    let cells = Layout::horizontal(constraints).split(area);

    for (kpi, cell) in view.kpis.iter().zip(cells.iter()) {
        render_kpi(frame, app, kpi, *cell);
    }
}

fn render_kpi(frame: &mut Frame, app: &App, kpi: &Kpi, area: Rect) {
    let style = app.theme.status_style(kpi.health());
    let block = panel(app, format!(" {} ", kpi.name));

    if kpi.is_percentage() {
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(style)
            .ratio((kpi.value / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.1}{}", kpi.value, kpi.unit));
        frame.render_widget(gauge, area);
    } else {
        let paragraph = Paragraph::new(format!("{:.0}", kpi.value))
            .style(style.add_modifier(Modifier::BOLD))
            .centered()
            .block(block);
        frame.render_widget(paragraph, area);
    }
}

fn render_zone_metrics(frame: &mut Frame, app: &App, view: &AnalyticsView, area: Rect) {
    if view.zones.is_empty() {
        render_placeholder(frame, app, area, "Zone Metrics", "No zone metrics reported");
        return;
    }

    let header = Row::new(vec![
        Cell::from("Zone"),
        Cell::from("Overall"),
        Cell::from("Temp"),
        Cell::from("Humidity"),
        Cell::from("Readings"),
        Cell::from("Avg temp"),
        Cell::from("Avg humidity"),
    ])
    .style(app.theme.header);

    let pct = |value: f64| {
        Cell::from(format!("{:.1}%", value))
            .style(app.theme.status_style(HealthStatus::from_compliance(value)))
    };

    let rows: Vec<Row> = view
        .zones
        .iter()
        .map(|(zone, m)| {
            Row::new(vec![
                Cell::from(zone.as_str()),
                pct(m.overall_compliance),
                pct(m.temp_compliance),
                pct(m.humidity_compliance),
                Cell::from(m.total.to_string()),
                Cell::from(format!("{:.1}°C", m.avg_temp)),
                Cell::from(format!("{:.1}%", m.avg_humidity)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(app, format!(" Zone Metrics ({} zones) ", view.zones.len())))
        .style(Style::default());

    frame.render_widget(table, area);
}
