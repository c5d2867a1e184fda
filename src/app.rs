//! Application state and tab routing.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, warn};

use coldwatch_types::{Threshold, TimeRange};

use crate::config::parse_threshold_assignment;
use crate::data::export;
use crate::data::{AlertsView, AnalyticsView, LiveView, MetricsStore, TrendsView};
use crate::source::{Command, DataSource, SourceEvent};
use crate::ui::Theme;

const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The tabs of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Current reading per zone.
    Live,
    /// Backend compliance figures.
    Analytics,
    /// Alert tallies and the most recent alerts.
    Alerts,
    /// Historical statistics over a selectable range.
    Trends,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Live, Tab::Analytics, Tab::Alerts, Tab::Trends];

    /// Cycle to the next tab.
    pub fn next(self) -> Self {
        match self {
            Tab::Live => Tab::Analytics,
            Tab::Analytics => Tab::Alerts,
            Tab::Alerts => Tab::Trends,
            Tab::Trends => Tab::Live,
        }
    }

    /// Cycle to the previous tab.
    pub fn prev(self) -> Self {
        match self {
            Tab::Live => Tab::Trends,
            Tab::Analytics => Tab::Live,
            Tab::Alerts => Tab::Analytics,
            Tab::Trends => Tab::Alerts,
        }
    }

    /// Returns the display label for this tab.
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Live => "Live",
            Tab::Analytics => "Analytics",
            Tab::Alerts => "Alerts",
            Tab::Trends => "Trends",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Live => 0,
            Tab::Analytics => 1,
            Tab::Alerts => 2,
            Tab::Trends => 3,
        }
    }
}

/// User intents, produced by key and mouse handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SwitchTab(Tab),
    NextTab,
    PrevTab,
    ToggleMonitoring,
    ClearAlerts,
    SetTimeRange(TimeRange),
    CycleTimeRange,
    Refresh,
    /// Open the threshold prompt.
    EditThreshold,
    /// Replace a zone's threshold on the backend.
    UpdateThreshold { zone: String, threshold: Threshold },
    ToggleHelp,
    Export(PathBuf),
    Quit,
}

/// The last computed view-model of each tab.
///
/// A tab's entry is only replaced when that tab recomputes, so inactive
/// tabs keep showing what they showed when last active.
#[derive(Debug, Default)]
pub struct RenderCache {
    pub live: Option<LiveView>,
    pub analytics: Option<AnalyticsView>,
    pub alerts: Option<AlertsView>,
    pub trends: Option<TrendsView>,
    recomputes: [u64; 4],
}

impl RenderCache {
    /// How many times a tab has been recomputed.
    pub fn recompute_count(&self, tab: Tab) -> u64 {
        self.recomputes[tab.index()]
    }

    /// Snapshot sequence the tab's view was computed from.
    pub fn seq(&self, tab: Tab) -> Option<u64> {
        match tab {
            Tab::Live => self.live.as_ref().map(|v| v.seq),
            Tab::Analytics => self.analytics.as_ref().map(|v| v.seq),
            Tab::Alerts => self.alerts.as_ref().map(|v| v.seq),
            Tab::Trends => None,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    active_tab: Tab,
    time_range: TimeRange,
    /// Monitoring state as last confirmed by the backend.
    monitoring: bool,

    // Data source
    source: Box<dyn DataSource>,
    store: MetricsStore,
    views: RenderCache,
    pending_history: Option<u64>,
    pub load_error: Option<String>,

    // Threshold prompt
    pub threshold_input: String,
    pub threshold_input_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given source.
    pub fn new(source: Box<dyn DataSource>, time_range: TimeRange) -> Self {
        Self {
            running: true,
            show_help: false,
            active_tab: Tab::Live,
            time_range,
            monitoring: false,
            source,
            store: MetricsStore::new(),
            views: RenderCache::default(),
            pending_history: None,
            load_error: None,
            threshold_input: String::new(),
            threshold_input_active: false,
            theme: Theme::dark(),
            status_message: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn monitoring_active(&self) -> bool {
        self.monitoring
    }

    pub fn store(&self) -> &MetricsStore {
        &self.store
    }

    pub fn views(&self) -> &RenderCache {
        &self.views
    }

    /// Whether a history request is still outstanding.
    pub fn history_loading(&self) -> bool {
        self.pending_history.is_some()
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Apply a user action.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SwitchTab(tab) => self.switch_tab(tab),
            Action::NextTab => self.switch_tab(self.active_tab.next()),
            Action::PrevTab => self.switch_tab(self.active_tab.prev()),
            Action::ToggleMonitoring => self.send(Command::ToggleMonitoring),
            Action::ClearAlerts => self.send(Command::ClearAlerts),
            Action::SetTimeRange(range) => self.set_time_range(range),
            Action::CycleTimeRange => self.set_time_range(self.time_range.next()),
            Action::Refresh => {
                self.send(Command::Refresh);
                if self.active_tab == Tab::Trends {
                    self.request_history();
                }
                self.set_status_message("Refreshing...");
            }
            Action::EditThreshold => self.start_threshold_input(),
            Action::UpdateThreshold { zone, threshold } => {
                self.send(Command::UpdateThreshold { zone, threshold })
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Export(path) => match self.export_state(&path) {
                Ok(()) => self.set_status_message(format!("Exported to {}", path.display())),
                Err(e) => self.set_status_message(format!("Export failed: {}", e)),
            },
            Action::Quit => self.quit(),
        }
    }

    /// Activate a tab and recompute it once.
    ///
    /// The trends tab requests fresh history instead; it recomputes when the
    /// response arrives.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        if tab == Tab::Trends {
            self.request_history();
        } else {
            self.recompute(tab);
        }
    }

    fn set_time_range(&mut self, range: TimeRange) {
        if range == self.time_range {
            return;
        }
        self.time_range = range;
        if self.active_tab == Tab::Trends {
            self.request_history();
        }
    }

    /// Drain pending events from the source.
    ///
    /// Returns true if anything was applied.
    pub fn poll_source(&mut self) -> bool {
        let mut applied = false;
        while let Some(event) = self.source.poll() {
            applied |= self.apply_event(event);
        }

        if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
        }
        applied
    }

    /// Apply one event from the scheduler.
    pub fn apply_event(&mut self, event: SourceEvent) -> bool {
        match event {
            SourceEvent::Snapshot(snapshot) => {
                if !self.store.set_snapshot(snapshot) {
                    return false;
                }
                self.load_error = None;
                if self.active_tab != Tab::Trends {
                    self.recompute(self.active_tab);
                }
            }
            SourceEvent::Thresholds(thresholds) => {
                self.store.set_thresholds(thresholds);
                if self.active_tab == Tab::Live {
                    self.recompute(Tab::Live);
                }
            }
            SourceEvent::History {
                request_id,
                range,
                readings,
            } => {
                if !self.store.set_history(request_id, range, readings) {
                    return false;
                }
                self.pending_history = None;
                if self.active_tab == Tab::Trends {
                    self.recompute(Tab::Trends);
                }
            }
            SourceEvent::HistoryFailed {
                request_id,
                message,
            } => {
                // A failure for a superseded request leaves the newer one pending
                if self.pending_history == Some(request_id) {
                    self.pending_history = None;
                }
                self.load_error = Some(message);
            }
            SourceEvent::MonitoringChanged(active) => {
                self.monitoring = active;
                self.set_status_message(if active {
                    "Monitoring started"
                } else {
                    "Monitoring stopped"
                });
            }
            SourceEvent::AlertsCleared => {
                let cleared = self.store.clear_alerts();
                if self.active_tab == Tab::Alerts {
                    self.recompute(Tab::Alerts);
                }
                self.set_status_message(format!("Cleared {} alerts", cleared));
            }
            SourceEvent::ThresholdUpdated(zone) => {
                self.set_status_message(format!("Threshold updated for {}", zone));
            }
            SourceEvent::Error(message) => {
                self.load_error = Some(message);
            }
        }
        true
    }

    fn send(&mut self, command: Command) {
        if !self.source.send(command) {
            warn!("Command dropped, scheduler is not running");
            self.load_error = Some("Scheduler stopped".to_string());
        }
    }

    fn request_history(&mut self) {
        let request_id = self.store.issue_history_request();
        self.pending_history = Some(request_id);
        debug!("Requesting {} history (request {})", self.time_range, request_id);
        self.send(Command::LoadHistory {
            request_id,
            range: self.time_range,
        });
    }

    fn recompute(&mut self, tab: Tab) {
        self.views.recomputes[tab.index()] += 1;
        match tab {
            Tab::Live => {
                if let Some(view) = self.store.view() {
                    self.views.live = Some(LiveView::compute(view, self.store.live_history()));
                }
            }
            Tab::Analytics => {
                if let Some(snapshot) = self.store.snapshot() {
                    self.views.analytics = Some(AnalyticsView::compute(snapshot));
                }
            }
            Tab::Alerts => {
                if let Some(snapshot) = self.store.snapshot() {
                    self.views.alerts = Some(AlertsView::compute(snapshot));
                }
            }
            Tab::Trends => {
                if let Some(trends) = self.store.trends() {
                    self.views.trends = Some(TrendsView::compute(trends));
                }
            }
        }
    }

    /// Enter threshold input mode (keystrokes go to the prompt).
    pub fn start_threshold_input(&mut self) {
        self.threshold_input_active = true;
    }

    /// Leave threshold input mode and discard the text.
    pub fn cancel_threshold_input(&mut self) {
        self.threshold_input.clear();
        self.threshold_input_active = false;
    }

    pub fn threshold_input_push(&mut self, c: char) {
        self.threshold_input.push(c);
    }

    pub fn threshold_input_pop(&mut self) {
        self.threshold_input.pop();
    }

    /// Parse the prompt as `<zone>=<tmin>:<tmax>:<hmin>:<hmax>` and send it.
    ///
    /// Invalid input keeps the prompt open so it can be corrected.
    pub fn submit_threshold_input(&mut self) {
        match parse_threshold_assignment(&self.threshold_input) {
            Ok((zone, threshold)) => {
                self.cancel_threshold_input();
                self.set_status_message(format!("Updating threshold for {}...", zone));
                self.dispatch(Action::UpdateThreshold { zone, threshold });
            }
            Err(e) => self.set_status_message(format!("Invalid threshold: {}", e)),
        }
    }

    /// Write the current state to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        export::write_export(&self.store, path)
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }
}
