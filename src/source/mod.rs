//! Data source abstraction between the UI thread and the backend.
//!
//! The UI never talks to the backend directly. It sends [`Command`]s through
//! a [`DataSource`] and drains [`SourceEvent`]s from it on every frame.

mod channel;
#[cfg(test)]
pub(crate) mod mock;
pub mod scheduler;

pub use channel::{ChannelSource, SourceHandle};
pub use scheduler::{RefreshScheduler, SchedulerState};

use std::fmt::Debug;

use coldwatch_types::{SensorReading, Snapshot, Threshold, ThresholdMap, TimeRange};

/// Requests sent from the UI to the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch a snapshot now, regardless of monitoring state.
    Refresh,
    ToggleMonitoring,
    ClearAlerts,
    LoadThresholds,
    LoadHistory { request_id: u64, range: TimeRange },
    UpdateThreshold { zone: String, threshold: Threshold },
}

/// Results delivered from the scheduler to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Snapshot(Snapshot),
    Thresholds(ThresholdMap),
    History {
        request_id: u64,
        range: TimeRange,
        readings: Vec<SensorReading>,
    },
    /// A history request failed. Carries the id so the UI can tell whether
    /// it was still waiting on it.
    HistoryFailed { request_id: u64, message: String },
    /// Monitoring state confirmed by the backend.
    MonitoringChanged(bool),
    /// The backend acknowledged clearing its alerts.
    AlertsCleared,
    ThresholdUpdated(String),
    Error(String),
}

/// Trait for exchanging commands and events with a backend driver.
///
/// # Example
///
/// ```
/// use coldwatch::source::{ChannelSource, Command, DataSource, SourceEvent};
///
/// let (mut handle, mut source) = ChannelSource::create("http://localhost:5000");
/// assert!(source.send(Command::Refresh));
/// assert_eq!(handle.commands.try_recv().ok(), Some(Command::Refresh));
///
/// handle.events.send(SourceEvent::MonitoringChanged(true)).unwrap();
/// assert_eq!(source.poll(), Some(SourceEvent::MonitoringChanged(true)));
/// ```
pub trait DataSource: Send + Debug {
    /// Take the next pending event.
    ///
    /// Returns `None` when nothing is pending. This method must not block.
    fn poll(&mut self) -> Option<SourceEvent>;

    /// Queue a command. Returns false if the driver has gone away.
    fn send(&mut self, command: Command) -> bool;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;

    /// Returns the error message if the source itself has failed.
    fn error(&self) -> Option<&str>;
}
