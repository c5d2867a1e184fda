//! Snapshot - one poll cycle's worth of dashboard data.

use std::collections::BTreeMap;

use crate::{Alert, Analytics, SensorReading, ZoneReadings};

/// Readings, alerts and analytics fetched together in one poll cycle.
///
/// A snapshot is applied as a unit: consumers never combine fields from two
/// different snapshots. `seq` increases monotonically with each fetch so a
/// late response can be recognised and discarded.
///
/// # Example
///
/// ```rust
/// use coldwatch_types::{Alert, Parameter, Severity, Snapshot};
///
/// let snapshot = Snapshot::builder()
///     .seq(7)
///     .reading("Zone D - Meat", 0.4, 83.0)
///     .alert(Alert::new(
///         "Zone D - Meat",
///         Parameter::Temperature,
///         0.4,
///         (-2.0, 0.0),
///         Severity::Warning,
///     ))
///     .build();
///
/// assert_eq!(snapshot.seq, 7);
/// assert_eq!(snapshot.alerts.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Fetch sequence number assigned by the poller.
    pub seq: u64,

    /// Latest reading per zone.
    pub readings: ZoneReadings,

    /// Alerts currently held by the backend, oldest first.
    pub alerts: Vec<Alert>,

    /// Backend-computed compliance analytics.
    pub analytics: Analytics,
}

impl Snapshot {
    /// Assemble a snapshot from the three poll responses.
    pub fn new(seq: u64, readings: ZoneReadings, alerts: Vec<Alert>, analytics: Analytics) -> Self {
        Self {
            seq,
            readings,
            alerts,
            analytics,
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Reading for a zone, if one was reported.
    pub fn reading(&self, zone: &str) -> Option<&SensorReading> {
        self.readings.get(zone)
    }

    /// Number of zones with a reading.
    pub fn zone_count(&self) -> usize {
        self.readings.len()
    }

    /// Whether the snapshot carries no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Builder for `Snapshot`.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    seq: u64,
    readings: BTreeMap<String, SensorReading>,
    alerts: Vec<Alert>,
    analytics: Analytics,
}

impl SnapshotBuilder {
    /// Set the sequence number.
    pub fn seq(mut self, seq: u64) -> Self {
        self.seq = seq;
        self
    }

    /// Add a reading for a zone.
    pub fn reading(mut self, zone: impl Into<String>, temperature: f64, humidity: f64) -> Self {
        let zone = zone.into();
        self.readings
            .insert(zone.clone(), SensorReading::new(zone, temperature, humidity));
        self
    }

    /// Add a pre-built reading, keyed by its zone.
    pub fn sensor_reading(mut self, reading: SensorReading) -> Self {
        self.readings.insert(reading.zone.clone(), reading);
        self
    }

    /// Append an alert.
    pub fn alert(mut self, alert: Alert) -> Self {
        self.alerts.push(alert);
        self
    }

    /// Set the analytics block.
    pub fn analytics(mut self, analytics: Analytics) -> Self {
        self.analytics = analytics;
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> Snapshot {
        Snapshot {
            seq: self.seq,
            readings: self.readings,
            alerts: self.alerts,
            analytics: self.analytics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Parameter, Severity};

    #[test]
    fn test_snapshot_builder() {
        let snapshot = Snapshot::builder()
            .seq(3)
            .reading("A", 1.0, 60.0)
            .reading("B", 2.0, 65.0)
            .alert(Alert::new("A", Parameter::Humidity, 72.0, (50.0, 70.0), Severity::Warning))
            .build();

        assert_eq!(snapshot.seq, 3);
        assert_eq!(snapshot.zone_count(), 2);
        assert_eq!(snapshot.reading("A").unwrap().zone, "A");
        assert!(snapshot.reading("C").is_none());
    }

    #[test]
    fn test_default_is_empty() {
        let snapshot = Snapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.seq, 0);
    }
}
