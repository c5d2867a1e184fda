//! Trends tab rendering.
//!
//! Line charts of historical temperature and humidity per zone over the
//! selected range, and a table of min/avg/max statistics.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Cell, Chart, Dataset, GraphType, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::TrendsView;
use crate::ui::common::{panel, render_placeholder};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let loading = if app.history_loading() { " loading..." } else { "" };
    let title = format!("Trends [{}]{} [t:range]", app.time_range(), loading);

    let Some(view) = app.views().trends.as_ref() else {
        let message = if app.history_loading() {
            "Loading historical data..."
        } else {
            "No historical data loaded [r:reload]"
        };
        render_placeholder(frame, app, area, &title, message);
        return;
    };
    if view.is_empty() {
        render_placeholder(frame, app, area, &title, "No historical data for this range");
        return;
    }

    let stats_height = view.stats.len() as u16 + 3;
    let chunks =
        Layout::vertical([Constraint::Min(8), Constraint::Length(stats_height)]).split(area);
    let charts = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    render_chart(frame, app, view, charts[0], Series::Temperature);
    render_chart(frame, app, view, charts[1], Series::Humidity);
    render_stats(frame, app, view, chunks[1], &title);
}

#[derive(Clone, Copy)]
enum Series {
    Temperature,
    Humidity,
}

impl Series {
    fn title(self) -> &'static str {
        match self {
            Series::Temperature => " Temperature (°C) ",
            Series::Humidity => " Humidity (%) ",
        }
    }
}

fn render_chart(frame: &mut Frame, app: &App, view: &TrendsView, area: Rect, series: Series) {
    let points: Vec<(&str, &[(f64, f64)])> = view
        .series
        .iter()
        .map(|(zone, s)| {
            let data = match series {
                Series::Temperature => s.temperature.as_slice(),
                Series::Humidity => s.humidity.as_slice(),
            };
            (zone.as_str(), data)
        })
        .collect();

    let (x_bounds, y_bounds) = bounds(points.iter().flat_map(|(_, data)| data.iter()));

    let datasets: Vec<Dataset> = points
        .iter()
        .enumerate()
        .map(|(i, &(zone, data))| {
            Dataset::default()
                .name(zone.to_string())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.zone_color(i)))
                .data(data)
        })
        .collect();

    let dim = Style::default().add_modifier(Modifier::DIM);
    let chart = Chart::new(datasets)
        .block(panel(app, series.title()))
        .x_axis(
            Axis::default()
                .title(Span::styled("minutes", dim))
                .style(dim)
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds, 0)),
        )
        .y_axis(
            Axis::default()
                .style(dim)
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds, 1)),
        );

    frame.render_widget(chart, area);
}

fn render_stats(frame: &mut Frame, app: &App, view: &TrendsView, area: Rect, title: &str) {
    let header = Row::new(vec![
        Cell::from("Zone"),
        Cell::from("Readings"),
        Cell::from("Min °C"),
        Cell::from("Avg °C"),
        Cell::from("Max °C"),
        Cell::from("Min %"),
        Cell::from("Avg %"),
        Cell::from("Max %"),
    ])
    .style(app.theme.header);

    let rows: Vec<Row> = view
        .stats
        .iter()
        .enumerate()
        .map(|(i, (zone, s))| {
            Row::new(vec![
                Cell::from(zone.as_str()).style(Style::default().fg(app.theme.zone_color(i))),
                Cell::from(s.count.to_string()),
                Cell::from(format!("{:.1}", s.min_temp)),
                Cell::from(format!("{:.1}", s.avg_temp)),
                Cell::from(format!("{:.1}", s.max_temp)),
                Cell::from(format!("{:.1}", s.min_humidity)),
                Cell::from(format!("{:.1}", s.avg_humidity)),
                Cell::from(format!("{:.1}", s.max_humidity)),
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
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths).header(header).block(panel(
        app,
        format!(" {} │ {} readings ", title, view.reading_count),
    ));
    frame.render_widget(table, area);
}

/// X and Y axis bounds covering all points, padded so flat lines stay visible.
fn bounds<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> ([f64; 2], [f64; 2]) {
    let mut x = [f64::INFINITY, f64::NEG_INFINITY];
    let mut y = [f64::INFINITY, f64::NEG_INFINITY];
    for &(px, py) in points {
        x = [x[0].min(px), x[1].max(px)];
        y = [y[0].min(py), y[1].max(py)];
    }

    if !x[0].is_finite() {
        return ([0.0, 1.0], [0.0, 1.0]);
    }
    if x[1] - x[0] < f64::EPSILON {
        x[1] = x[0] + 1.0;
    }
    let pad = ((y[1] - y[0]) * 0.1).max(0.5);
    ([x[0], x[1]], [y[0] - pad, y[1] + pad])
}

fn axis_labels(bounds: [f64; 2], precision: usize) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| Span::raw(format!("{:.*}", precision, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldwatch_types::TimeRange;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::Tab;
    use crate::source::{ChannelSource, SourceEvent};

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| crate::ui::draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_failed_history_is_not_shown_as_loading() {
        let (handle, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), TimeRange::Day);
        app.switch_tab(Tab::Trends);
        assert!(screen_text(&app).contains("Loading historical data"));

        handle
            .events
            .send(SourceEvent::HistoryFailed {
                request_id: 1,
                message: "Error updating trends: timed out".into(),
            })
            .unwrap();
        app.poll_source();

        let text = screen_text(&app);
        assert!(text.contains("No historical data loaded"));
        assert!(!text.contains("Loading historical data"));
    }

    #[test]
    fn test_bounds_empty() {
        let empty: [(f64, f64); 0] = [];
        assert_eq!(bounds(empty.iter()), ([0.0, 1.0], [0.0, 1.0]));
    }

    #[test]
    fn test_bounds_pads_flat_series() {
        let points = [(0.0, 4.0), (0.0, 4.0)];
        let (x, y) = bounds(points.iter());
        assert_eq!(x, [0.0, 1.0]);
        assert_eq!(y, [3.5, 4.5]);
    }

    #[test]
    fn test_bounds_spans_points() {
        let points = [(0.0, -20.0), (30.0, -18.0)];
        let (x, y) = bounds(points.iter());
        assert_eq!(x, [0.0, 30.0]);
        assert!(y[0] < -20.0 && y[1] > -18.0);
    }

    #[test]
    fn test_axis_labels() {
        let labels = axis_labels([0.0, 10.0], 0);
        let text: Vec<String> = labels.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(text, vec!["0", "5", "10"]);
    }
}
