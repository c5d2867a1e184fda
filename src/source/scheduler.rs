//! Refresh scheduler: polls the backend while monitoring is active and
//! executes UI commands.
//!
//! ## State machine
//!
//! ```text
//!            toggle → {status: true}
//!   ┌──────┐ ─────────────────────▶ ┌─────────┐
//!   │ Idle │                        │ Polling │
//!   └──────┘ ◀───────────────────── └─────────┘
//!            toggle → {status: false}
//! ```
//!
//! The timer keeps running in both states; a tick only fetches while
//! `Polling`. Ticks and commands are handled one at a time by the same task,
//! so two snapshot fetches never overlap.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use coldwatch_client::DashboardApi;
use coldwatch_types::Snapshot;

use super::{ChannelSource, Command, SourceEvent, SourceHandle};

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Whether the scheduler fetches on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Polling,
}

/// Executes backend calls and turns their results into [`SourceEvent`]s.
pub struct RefreshScheduler {
    api: Arc<dyn DashboardApi>,
    state: SchedulerState,
    next_seq: u64,
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("state", &self.state)
            .field("next_seq", &self.next_seq)
            .finish_non_exhaustive()
    }
}

impl RefreshScheduler {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            state: SchedulerState::Idle,
            next_seq: 1,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Handle a timer tick. Returns `None` while idle.
    pub async fn on_tick(&mut self) -> Option<SourceEvent> {
        match self.state {
            SchedulerState::Idle => None,
            SchedulerState::Polling => Some(self.fetch_snapshot().await),
        }
    }

    /// Fetch readings, alerts and analytics concurrently.
    ///
    /// All three must succeed for a snapshot to be produced; otherwise an
    /// error event is returned and nothing is applied.
    pub async fn fetch_snapshot(&mut self) -> SourceEvent {
        let seq = self.next_seq;
        self.next_seq += 1;

        let api = &self.api;
        match tokio::try_join!(api.sensor_data(), api.alerts(), api.analytics()) {
            Ok((readings, alerts, analytics)) => {
                debug!(
                    "Fetched snapshot {} with {} zones and {} alerts",
                    seq,
                    readings.len(),
                    alerts.len()
                );
                SourceEvent::Snapshot(Snapshot::new(seq, readings, alerts, analytics))
            }
            Err(e) => {
                warn!("Snapshot fetch {} failed: {}", seq, e);
                SourceEvent::Error(format!("Error updating dashboard: {}", e))
            }
        }
    }

    /// Execute a command, returning the events it produced in order.
    pub async fn handle(&mut self, command: Command) -> Vec<SourceEvent> {
        match command {
            Command::Refresh => vec![self.fetch_snapshot().await],
            Command::ToggleMonitoring => vec![self.toggle_monitoring().await],
            Command::ClearAlerts => match self.api.clear_alerts().await {
                Ok(()) => {
                    info!("Backend cleared alerts");
                    vec![SourceEvent::AlertsCleared]
                }
                Err(e) => {
                    warn!("Failed to clear alerts: {}", e);
                    vec![SourceEvent::Error(format!("Error clearing alerts: {}", e))]
                }
            },
            Command::LoadThresholds => vec![self.load_thresholds().await],
            Command::LoadHistory { request_id, range } => {
                match self.api.historical_data(range).await {
                    Ok(readings) => {
                        debug!(
                            "Loaded {} historical readings for {} (request {})",
                            readings.len(),
                            range,
                            request_id
                        );
                        vec![SourceEvent::History {
                            request_id,
                            range,
                            readings,
                        }]
                    }
                    Err(e) => {
                        warn!("Failed to load historical data for {}: {}", range, e);
                        vec![SourceEvent::HistoryFailed {
                            request_id,
                            message: format!("Error updating trends: {}", e),
                        }]
                    }
                }
            }
            Command::UpdateThreshold { zone, threshold } => {
                match self.api.update_threshold(&zone, threshold).await {
                    Ok(()) => {
                        info!("Updated threshold for {}", zone);
                        vec![
                            SourceEvent::ThresholdUpdated(zone),
                            self.load_thresholds().await,
                        ]
                    }
                    Err(e) => {
                        warn!("Failed to update threshold for {}: {}", zone, e);
                        vec![SourceEvent::Error(format!(
                            "Error updating threshold for {}: {}",
                            zone, e
                        ))]
                    }
                }
            }
        }
    }

    async fn toggle_monitoring(&mut self) -> SourceEvent {
        match self.api.toggle_monitoring().await {
            Ok(active) => {
                self.state = if active {
                    SchedulerState::Polling
                } else {
                    SchedulerState::Idle
                };
                info!("Monitoring {}", if active { "started" } else { "stopped" });
                SourceEvent::MonitoringChanged(active)
            }
            Err(e) => {
                warn!("Failed to toggle monitoring: {}", e);
                SourceEvent::Error(format!("Error toggling monitoring: {}", e))
            }
        }
    }

    async fn load_thresholds(&mut self) -> SourceEvent {
        match self.api.thresholds().await {
            Ok(thresholds) => {
                debug!("Loaded thresholds for {} zones", thresholds.len());
                SourceEvent::Thresholds(thresholds)
            }
            Err(e) => {
                warn!("Failed to load thresholds: {}", e);
                SourceEvent::Error(format!("Error loading thresholds: {}", e))
            }
        }
    }
}

/// Spawn the scheduler task on the current tokio runtime.
///
/// Returns the UI's end of the channel pair. The task stops once the
/// returned source is dropped.
pub fn spawn(api: Arc<dyn DashboardApi>, interval: Duration, description: &str) -> ChannelSource {
    let (handle, source) = ChannelSource::create(description);
    tokio::spawn(run(RefreshScheduler::new(api), interval, handle));
    source
}

/// Drive a scheduler from a timer and a command channel.
///
/// On start the thresholds are loaded and one snapshot is fetched.
pub async fn run(mut scheduler: RefreshScheduler, interval: Duration, handle: SourceHandle) {
    let SourceHandle {
        events,
        mut commands,
    } = handle;

    for command in [Command::LoadThresholds, Command::Refresh] {
        for event in scheduler.handle(command).await {
            if events.send(event).is_err() {
                return;
            }
        }
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        let produced: Vec<SourceEvent> = tokio::select! {
            _ = ticker.tick() => scheduler.on_tick().await.into_iter().collect(),
            command = commands.recv() => match command {
                Some(command) => scheduler.handle(command).await,
                None => break,
            },
        };

        for event in produced {
            if events.send(event).is_err() {
                info!("UI receiver dropped, stopping scheduler");
                return;
            }
        }
    }

    info!("Command channel closed, stopping scheduler");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    use coldwatch_types::{Threshold, TimeRange};

    use crate::source::mock::MockApi;
    use crate::source::DataSource;

    fn scheduler() -> (Arc<MockApi>, RefreshScheduler) {
        let api = Arc::new(MockApi::default());
        let scheduler = RefreshScheduler::new(api.clone());
        (api, scheduler)
    }

    #[tokio::test]
    async fn test_idle_tick_does_not_fetch() {
        let (api, mut scheduler) = scheduler();
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        assert!(scheduler.on_tick().await.is_none());
        assert_eq!(api.fetches(), 0);
        assert_eq!(api.alert_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_polling_tick_fetches_all_three() {
        let (api, mut scheduler) = scheduler();
        let events = scheduler.handle(Command::ToggleMonitoring).await;
        assert_eq!(events, vec![SourceEvent::MonitoringChanged(true)]);
        assert_eq!(scheduler.state(), SchedulerState::Polling);

        let Some(SourceEvent::Snapshot(snapshot)) = scheduler.on_tick().await else {
            panic!("expected a snapshot");
        };
        assert_eq!(snapshot.seq, 1);
        assert_eq!(snapshot.zone_count(), 1);
        assert_eq!(snapshot.alerts.len(), 1);
        assert_eq!(snapshot.analytics.overall_compliance, 90.0);
        assert_eq!(api.fetches(), 1);
        assert_eq!(api.alert_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.analytics_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_snapshot_seq_increases() {
        let (_api, mut scheduler) = scheduler();
        let mut seqs = Vec::new();
        for _ in 0..3 {
            if let SourceEvent::Snapshot(s) = scheduler.fetch_snapshot().await {
                seqs.push(s.seq);
            }
        }
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_partial_failure_yields_error_only() {
        let (api, mut scheduler) = scheduler();
        api.fail_alerts.store(true, Ordering::SeqCst);

        let event = scheduler.fetch_snapshot().await;
        assert!(matches!(event, SourceEvent::Error(ref msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_failed_toggle_keeps_state() {
        let (api, mut scheduler) = scheduler();
        api.fail_toggle.store(true, Ordering::SeqCst);

        let events = scheduler.handle(Command::ToggleMonitoring).await;
        assert!(matches!(events[0], SourceEvent::Error(_)));
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.on_tick().await.is_none());
    }

    #[tokio::test]
    async fn test_toggle_twice_returns_to_idle() {
        let (_api, mut scheduler) = scheduler();
        scheduler.handle(Command::ToggleMonitoring).await;
        let events = scheduler.handle(Command::ToggleMonitoring).await;
        assert_eq!(events, vec![SourceEvent::MonitoringChanged(false)]);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_clear_alerts_ack_and_failure() {
        let (api, mut scheduler) = scheduler();
        assert_eq!(
            scheduler.handle(Command::ClearAlerts).await,
            vec![SourceEvent::AlertsCleared]
        );

        api.fail_clear.store(true, Ordering::SeqCst);
        let events = scheduler.handle(Command::ClearAlerts).await;
        assert!(matches!(events[0], SourceEvent::Error(_)));
        assert_eq!(api.clear_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_history_passes_range_and_id() {
        let (api, mut scheduler) = scheduler();
        let events = scheduler
            .handle(Command::LoadHistory {
                request_id: 9,
                range: TimeRange::Week,
            })
            .await;

        let [SourceEvent::History { request_id, range, readings }] = events.as_slice() else {
            panic!("expected one history event");
        };
        assert_eq!(*request_id, 9);
        assert_eq!(*range, TimeRange::Week);
        assert_eq!(readings.len(), 1);
        assert_eq!(*api.history_ranges.lock().unwrap(), vec![TimeRange::Week]);
    }

    #[tokio::test]
    async fn test_failed_history_reports_request_id() {
        let (api, mut scheduler) = scheduler();
        api.fail_history.store(true, Ordering::SeqCst);

        let events = scheduler
            .handle(Command::LoadHistory {
                request_id: 4,
                range: TimeRange::Hour,
            })
            .await;

        let [SourceEvent::HistoryFailed { request_id, message }] = events.as_slice() else {
            panic!("expected one history failure");
        };
        assert_eq!(*request_id, 4);
        assert!(message.starts_with("Error updating trends"));
    }

    #[tokio::test]
    async fn test_update_threshold_reloads_thresholds() {
        let (api, mut scheduler) = scheduler();
        let threshold = Threshold::new(1.0, 3.0, 70.0, 80.0);
        let events = scheduler
            .handle(Command::UpdateThreshold {
                zone: "A".into(),
                threshold,
            })
            .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], SourceEvent::ThresholdUpdated("A".into()));
        assert!(matches!(events[1], SourceEvent::Thresholds(_)));
        assert_eq!(api.updates.lock().unwrap()[0], ("A".to_string(), threshold));
        assert_eq!(api.threshold_calls.load(Ordering::SeqCst), 1);
    }

    async fn next_event(source: &mut ChannelSource) -> SourceEvent {
        loop {
            if let Some(event) = source.poll() {
                return event;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_loads_then_waits_while_idle() {
        let api = Arc::new(MockApi::default());
        let mut source = spawn(api.clone(), Duration::from_secs(3), "mock");

        assert!(matches!(next_event(&mut source).await, SourceEvent::Thresholds(_)));
        assert!(matches!(next_event(&mut source).await, SourceEvent::Snapshot(_)));
        assert_eq!(api.fetches(), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.fetches(), 1);
        assert!(source.poll().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_polls_after_toggle() {
        let api = Arc::new(MockApi::default());
        let mut source = spawn(api.clone(), Duration::from_secs(3), "mock");
        next_event(&mut source).await;
        next_event(&mut source).await;

        assert!(source.send(Command::ToggleMonitoring));
        assert_eq!(
            next_event(&mut source).await,
            SourceEvent::MonitoringChanged(true)
        );

        let SourceEvent::Snapshot(first) = next_event(&mut source).await else {
            panic!("expected a snapshot");
        };
        let SourceEvent::Snapshot(second) = next_event(&mut source).await else {
            panic!("expected a snapshot");
        };
        assert!(second.seq > first.seq);
        assert!(api.fetches() >= 3);
    }
}
