//! Holds the most recently applied backend state.

use std::time::Instant;

use tracing::debug;

use coldwatch_types::{SensorReading, Snapshot, ThresholdMap, TimeRange};

use super::history::History;

/// A snapshot paired with the thresholds it should be judged against.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotView<'a> {
    pub snapshot: &'a Snapshot,
    pub thresholds: &'a ThresholdMap,
}

/// Historical readings for the trends view.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendsData {
    pub request_id: u64,
    pub range: TimeRange,
    pub readings: Vec<SensorReading>,
}

/// In-memory store for the latest snapshot, thresholds and trends data.
///
/// Snapshots are replaced whole. A snapshot whose sequence number is not
/// newer than the one already applied is discarded, so a slow response can
/// never overwrite fresher data.
#[derive(Debug, Default)]
pub struct MetricsStore {
    snapshot: Option<Snapshot>,
    thresholds: ThresholdMap,
    history: History,
    trends: Option<TrendsData>,
    latest_history_request: u64,
    last_updated: Option<Instant>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fetched snapshot. Returns false if it was stale.
    pub fn set_snapshot(&mut self, snapshot: Snapshot) -> bool {
        if let Some(current) = &self.snapshot {
            if snapshot.seq <= current.seq {
                debug!(
                    applied = current.seq,
                    received = snapshot.seq,
                    "Discarding stale snapshot"
                );
                return false;
            }
        }

        self.history.record(&snapshot);
        self.snapshot = Some(snapshot);
        self.last_updated = Some(Instant::now());
        true
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// The current snapshot together with the current thresholds.
    pub fn view(&self) -> Option<SnapshotView<'_>> {
        self.snapshot.as_ref().map(|snapshot| SnapshotView {
            snapshot,
            thresholds: &self.thresholds,
        })
    }

    /// Sequence number of the applied snapshot, if any.
    pub fn applied_seq(&self) -> Option<u64> {
        self.snapshot.as_ref().map(|s| s.seq)
    }

    /// Drop all alerts from the current snapshot after the backend confirmed
    /// the clear. Returns how many alerts were removed.
    pub fn clear_alerts(&mut self) -> usize {
        match &mut self.snapshot {
            Some(snapshot) => {
                let cleared = snapshot.alerts.len();
                snapshot.alerts.clear();
                cleared
            }
            None => 0,
        }
    }

    pub fn set_thresholds(&mut self, thresholds: ThresholdMap) {
        self.thresholds = thresholds;
    }

    pub fn thresholds(&self) -> &ThresholdMap {
        &self.thresholds
    }

    /// Reserve an id for a new historical-data request.
    ///
    /// Only the response carrying the latest id will be accepted.
    pub fn issue_history_request(&mut self) -> u64 {
        self.latest_history_request += 1;
        self.latest_history_request
    }

    /// Apply historical readings. Returns false if a newer request has been
    /// issued since this one.
    pub fn set_history(
        &mut self,
        request_id: u64,
        range: TimeRange,
        readings: Vec<SensorReading>,
    ) -> bool {
        if request_id != self.latest_history_request {
            debug!(
                latest = self.latest_history_request,
                received = request_id,
                "Discarding superseded history response"
            );
            return false;
        }

        self.trends = Some(TrendsData {
            request_id,
            range,
            readings,
        });
        true
    }

    pub fn trends(&self) -> Option<&TrendsData> {
        self.trends.as_ref()
    }

    /// Rolling history of applied snapshots.
    pub fn live_history(&self) -> &History {
        &self.history
    }

    pub fn last_updated(&self) -> Option<Instant> {
        self.last_updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldwatch_types::{Alert, Parameter, Severity, Threshold};

    fn snapshot(seq: u64, temp: f64) -> Snapshot {
        Snapshot::builder()
            .seq(seq)
            .reading("Zone A - Produce", temp, 90.0)
            .alert(Alert::new(
                "Zone A - Produce",
                Parameter::Temperature,
                temp,
                (0.0, 4.0),
                Severity::Warning,
            ))
            .build()
    }

    #[test]
    fn test_empty_store() {
        let store = MetricsStore::new();
        assert!(store.snapshot().is_none());
        assert!(store.view().is_none());
        assert!(store.thresholds().is_empty());
        assert!(store.trends().is_none());
        assert!(store.last_updated().is_none());
    }

    #[test]
    fn test_newer_snapshot_replaces_whole() {
        let mut store = MetricsStore::new();
        assert!(store.set_snapshot(snapshot(1, 2.0)));
        assert!(store.set_snapshot(Snapshot::builder().seq(2).build()));

        let current = store.snapshot().unwrap();
        assert_eq!(current.seq, 2);
        assert!(current.readings.is_empty());
        assert!(current.alerts.is_empty());
        assert!(store.last_updated().is_some());
    }

    #[test]
    fn test_stale_snapshot_is_discarded() {
        let mut store = MetricsStore::new();
        assert!(store.set_snapshot(snapshot(5, 2.0)));
        assert!(!store.set_snapshot(snapshot(4, 9.0)));
        assert!(!store.set_snapshot(snapshot(5, 9.0)));

        assert_eq!(store.applied_seq(), Some(5));
        assert_eq!(
            store.snapshot().unwrap().reading("Zone A - Produce").unwrap().temperature,
            2.0
        );
        assert_eq!(store.live_history().zone("Zone A - Produce").map(|z| z.len()), Some(1));
    }

    #[test]
    fn test_view_pairs_thresholds() {
        let mut store = MetricsStore::new();
        let mut thresholds = ThresholdMap::new();
        thresholds.insert("Zone A - Produce".into(), Threshold::new(0.0, 4.0, 85.0, 95.0));
        store.set_thresholds(thresholds);
        store.set_snapshot(snapshot(1, 2.0));

        let view = store.view().unwrap();
        assert_eq!(view.snapshot.seq, 1);
        assert_eq!(view.thresholds.len(), 1);
    }

    #[test]
    fn test_clear_alerts_keeps_readings() {
        let mut store = MetricsStore::new();
        assert_eq!(store.clear_alerts(), 0);

        store.set_snapshot(snapshot(1, 2.0));
        assert_eq!(store.clear_alerts(), 1);

        let current = store.snapshot().unwrap();
        assert!(current.alerts.is_empty());
        assert_eq!(current.zone_count(), 1);
    }

    #[test]
    fn test_superseded_history_is_discarded() {
        let mut store = MetricsStore::new();
        let first = store.issue_history_request();
        let second = store.issue_history_request();
        assert!(second > first);

        let readings = vec![SensorReading::new("A", 1.0, 60.0)];
        assert!(!store.set_history(first, TimeRange::Hour, readings.clone()));
        assert!(store.trends().is_none());

        assert!(store.set_history(second, TimeRange::Week, readings));
        let trends = store.trends().unwrap();
        assert_eq!(trends.range, TimeRange::Week);
        assert_eq!(trends.request_id, second);
    }
}
