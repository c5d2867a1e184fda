//! Common UI components shared across tabs.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Tab};
use crate::data::stats::{alert_severity_counts, zone_status_summary};
use crate::data::HealthStatus;

/// Title shown for a tab in the tab bar.
pub fn tab_title(tab: Tab) -> String {
    format!("{}:{}", tab.index() + 1, tab.label())
}

/// Render the header bar with monitoring state and zone overview.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let monitoring = if app.monitoring_active() {
        Span::styled("● MONITORING", app.theme.status_style(HealthStatus::Healthy))
    } else {
        Span::styled("○ PAUSED", Style::default().add_modifier(Modifier::DIM))
    };

    let Some(view) = app.store().view() else {
        let line = Line::from(vec![
            Span::styled(" COLDWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("│ "),
            monitoring,
            Span::raw(" │ Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let zones = zone_status_summary(&view.snapshot.readings, view.thresholds);
    let alerts = alert_severity_counts(&view.snapshot.alerts);

    let count = |n: usize, style: Style| {
        if n > 0 {
            Span::styled(n.to_string(), style)
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let line = Line::from(vec![
        Span::styled(" COLDWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        monitoring,
        Span::raw(" │ "),
        count(zones.compliant, app.theme.status_style(HealthStatus::Healthy)),
        Span::raw(" ok "),
        count(zones.non_compliant, app.theme.status_style(HealthStatus::Critical)),
        Span::raw(" out of range "),
        count(zones.unknown, app.theme.status_style(HealthStatus::Warning)),
        Span::raw(" unchecked │ "),
        count(alerts.critical, app.theme.status_style(HealthStatus::Critical)),
        Span::raw(" crit "),
        count(alerts.warning, app.theme.status_style(HealthStatus::Warning)),
        Span::raw(" warn │ "),
        Span::styled(
            app.source_description().to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar, highlighting the active tab.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|tab| Line::from(tab_title(*tab))).collect();

    let tabs = Tabs::new(titles)
        .select(app.active_tab().index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Temporary status messages take priority, then the last error, then the
/// time since the last update with context-sensitive controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if app.threshold_input_active {
        let hint = app
            .status_message()
            .unwrap_or("zone=tmin:tmax:hmin:hmax | Enter:apply Esc:cancel");
        let paragraph = Paragraph::new(format!(" Threshold: {}_ | {}", app.threshold_input, hint))
            .style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(msg) = app.status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" Error: {} | r:retry q:quit", err))
            .style(app.theme.status_style(HealthStatus::Critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.active_tab() {
        Tab::Live | Tab::Analytics => "m:monitor r:refresh Tab:switch ?:help q:quit",
        Tab::Alerts => "c:clear alerts m:monitor Tab:switch ?:help q:quit",
        Tab::Trends => "t:range r:reload Tab:switch ?:help q:quit",
    };

    let status = match app.store().last_updated() {
        Some(updated) => format!(
            " Updated {:.1}s ago | {}",
            updated.elapsed().as_secs_f64(),
            controls
        ),
        None => format!(" Waiting for data | {}", controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current tab.
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
        Line::from("  ←/→ h/l Tab   Switch tabs"),
        Line::from("  1-4           Jump to tab"),
        Line::from("  click         Select tab"),
        Line::from(""),
        section(" Monitoring"),
        Line::from("  m / space     Start/stop monitoring"),
        Line::from("  r             Refresh now"),
        Line::from("  c             Clear alerts"),
        Line::from("  u             Edit zone threshold"),
        Line::from(""),
        section(" Trends"),
        Line::from("  t             Cycle time range"),
        Line::from("  ! @ # $       1h / 6h / 24h / 7d"),
        Line::from(""),
        section(" General"),
        Line::from("  e             Export to JSON"),
        Line::from("  q             Quit"),
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
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Block used around every content panel.
pub fn panel<'a>(app: &App, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.border_style())
}

/// Render a dimmed placeholder message inside a panel.
pub fn render_placeholder(frame: &mut Frame, app: &App, area: Rect, title: &str, msg: &str) {
    let paragraph = Paragraph::new(format!("\n  {}", msg))
        .style(Style::default().add_modifier(Modifier::DIM))
        .block(panel(app, format!(" {} ", title)));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldwatch_types::TimeRange;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::source::ChannelSource;

    #[test]
    fn test_tab_titles() {
        assert_eq!(tab_title(Tab::Live), "1:Live");
        assert_eq!(tab_title(Tab::Trends), "4:Trends");
    }

    #[test]
    fn test_draw_without_data() {
        let (_handle, source) = ChannelSource::create("http://localhost:5000");
        let mut app = App::new(Box::new(source), TimeRange::Day);
        app.show_help = true;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| crate::ui::draw(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let header: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol().to_string())
            .collect();
        assert!(header.contains("COLDWATCH"));
        assert!(header.contains("PAUSED"));
    }

    #[test]
    fn test_status_bar_shows_threshold_prompt() {
        let (_handle, source) = ChannelSource::create("http://localhost:5000");
        let mut app = App::new(Box::new(source), TimeRange::Day);
        app.start_threshold_input();
        for c in "Dairy=2:4".chars() {
            app.threshold_input_push(c);
        }

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| crate::ui::draw(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let last = buffer.area.height - 1;
        let status: String = (0..buffer.area.width)
            .map(|x| buffer[(x, last)].symbol().to_string())
            .collect();
        assert!(status.contains("Threshold: Dairy=2:4_"));
    }
}
