//! Per-tab view-models computed from the store.
//!
//! Each view is a plain value built from borrowed store data, so rendering
//! never reaches back into the store and a stale view stays drawable until
//! its tab recomputes it.

use std::collections::BTreeMap;

use coldwatch_types::{Alert, Snapshot, Threshold, TimeRange, ZoneMetrics};

use super::history::History;
use super::stats::{
    aggregate_stats, alert_frequency_by_zone, alert_severity_counts, readings_in_window,
    reading_status, recent_alerts, series_by_zone, zone_status_summary, ReadingStatus,
    SeverityCounts, ZoneSeries, ZoneStats, ZoneStatusSummary,
};
use super::store::{SnapshotView, TrendsData};

/// Number of alerts listed on the alerts tab.
pub const RECENT_ALERT_LIMIT: usize = 10;

/// Health status for display colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Map a compliance percentage onto the gauge bands
    /// (below 50 critical, below 80 warning).
    pub fn from_compliance(percent: f64) -> Self {
        if percent >= 80.0 {
            HealthStatus::Healthy
        } else if percent >= 50.0 {
            HealthStatus::Warning
        } else {
            HealthStatus::Critical
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "OK",
            HealthStatus::Warning => "WARN",
            HealthStatus::Critical => "ALERT",
        }
    }
}

/// One zone on the live tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCard {
    pub zone: String,
    pub temperature: f64,
    pub humidity: f64,
    pub threshold: Option<Threshold>,
    /// `None` when the zone has no threshold.
    pub status: Option<ReadingStatus>,
    pub temperature_sparkline: Vec<u8>,
    pub humidity_sparkline: Vec<u8>,
    /// Temperature change in °C per minute.
    pub temperature_rate: Option<f64>,
}

impl ZoneCard {
    pub fn health(&self) -> HealthStatus {
        match self.status {
            Some(status) if status.is_compliant() => HealthStatus::Healthy,
            Some(_) => HealthStatus::Critical,
            None => HealthStatus::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveView {
    pub seq: u64,
    pub cards: Vec<ZoneCard>,
    pub summary: ZoneStatusSummary,
    pub alert_count: usize,
}

impl LiveView {
    pub fn compute(view: SnapshotView<'_>, history: &History) -> Self {
        let SnapshotView { snapshot, thresholds } = view;

        let cards = snapshot
            .readings
            .iter()
            .map(|(zone, reading)| {
                let threshold = thresholds.get(zone).copied();
                ZoneCard {
                    zone: zone.clone(),
                    temperature: reading.temperature,
                    humidity: reading.humidity,
                    threshold,
                    status: threshold.as_ref().map(|t| reading_status(reading, t)),
                    temperature_sparkline: history.temperature_sparkline(zone),
                    humidity_sparkline: history.humidity_sparkline(zone),
                    temperature_rate: history.temperature_rate(zone),
                }
            })
            .collect();

        LiveView {
            seq: snapshot.seq,
            cards,
            summary: zone_status_summary(&snapshot.readings, thresholds),
            alert_count: snapshot.alerts.len(),
        }
    }
}

/// A headline figure on the analytics tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub name: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl Kpi {
    pub fn is_percentage(&self) -> bool {
        self.unit == "%"
    }

    pub fn health(&self) -> HealthStatus {
        if self.is_percentage() {
            HealthStatus::from_compliance(self.value)
        } else if self.value == 0.0 {
            HealthStatus::Healthy
        } else {
            HealthStatus::Warning
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView {
    pub seq: u64,
    pub kpis: Vec<Kpi>,
    pub zones: Vec<(String, ZoneMetrics)>,
}

impl AnalyticsView {
    pub fn compute(snapshot: &Snapshot) -> Self {
        let analytics = &snapshot.analytics;
        let kpis = vec![
            Kpi { name: "Overall Compliance", value: analytics.overall_compliance, unit: "%" },
            Kpi { name: "Temperature Compliance", value: analytics.temp_compliance, unit: "%" },
            Kpi { name: "Humidity Compliance", value: analytics.humidity_compliance, unit: "%" },
            Kpi { name: "Active Alerts", value: analytics.total_alerts as f64, unit: "" },
        ];

        AnalyticsView {
            seq: snapshot.seq,
            kpis,
            zones: analytics
                .zone_metrics
                .iter()
                .map(|(zone, metrics)| (zone.clone(), *metrics))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertsView {
    pub seq: u64,
    pub counts: SeverityCounts,
    pub by_zone: BTreeMap<String, usize>,
    /// Newest first.
    pub recent: Vec<Alert>,
}

impl AlertsView {
    pub fn compute(snapshot: &Snapshot) -> Self {
        let alerts = &snapshot.alerts;
        AlertsView {
            seq: snapshot.seq,
            counts: alert_severity_counts(alerts),
            by_zone: alert_frequency_by_zone(alerts),
            recent: recent_alerts(alerts, RECENT_ALERT_LIMIT)
                .iter()
                .rev()
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendsView {
    pub request_id: u64,
    pub range: TimeRange,
    pub reading_count: usize,
    pub stats: BTreeMap<String, ZoneStats>,
    pub series: BTreeMap<String, ZoneSeries>,
}

impl TrendsView {
    pub fn compute(trends: &TrendsData) -> Self {
        let window = readings_in_window(&trends.readings, trends.range);
        TrendsView {
            request_id: trends.request_id,
            range: trends.range,
            reading_count: window.len(),
            stats: aggregate_stats(&window),
            series: series_by_zone(&window),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reading_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldwatch_types::{Analytics, Parameter, SensorReading, Severity, ThresholdMap};

    fn thresholds() -> ThresholdMap {
        let mut map = ThresholdMap::new();
        map.insert("A".into(), Threshold::new(0.0, 5.0, 50.0, 70.0));
        map.insert("B".into(), Threshold::new(-25.0, -18.0, 80.0, 90.0));
        map
    }

    #[test]
    fn test_health_from_compliance_bands() {
        assert_eq!(HealthStatus::from_compliance(100.0), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_compliance(80.0), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_compliance(79.9), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_compliance(50.0), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_compliance(10.0), HealthStatus::Critical);
    }

    #[test]
    fn test_live_view_cards() {
        let snapshot = Snapshot::builder()
            .seq(7)
            .reading("A", 5.0, 50.0)
            .reading("B", -10.0, 85.0)
            .reading("C", 1.0, 60.0)
            .build();
        let thresholds = thresholds();
        let view = SnapshotView { snapshot: &snapshot, thresholds: &thresholds };

        let live = LiveView::compute(view, &History::new());
        assert_eq!(live.seq, 7);
        assert_eq!(live.cards.len(), 3);

        let a = &live.cards[0];
        assert_eq!(a.zone, "A");
        assert_eq!(a.health(), HealthStatus::Healthy);

        let b = &live.cards[1];
        assert_eq!(b.health(), HealthStatus::Critical);
        assert_eq!(
            b.status,
            Some(ReadingStatus { temperature_ok: false, humidity_ok: true })
        );

        let c = &live.cards[2];
        assert!(c.status.is_none());
        assert_eq!(c.health(), HealthStatus::Warning);

        assert_eq!(live.summary.compliant, 1);
        assert_eq!(live.summary.non_compliant, 1);
        assert_eq!(live.summary.unknown, 1);
    }

    #[test]
    fn test_analytics_view_kpis() {
        let snapshot = Snapshot::builder()
            .seq(2)
            .analytics(Analytics {
                overall_compliance: 92.5,
                temp_compliance: 95.0,
                humidity_compliance: 40.0,
                total_alerts: 3,
                ..Default::default()
            })
            .build();

        let view = AnalyticsView::compute(&snapshot);
        assert_eq!(view.kpis.len(), 4);
        assert_eq!(view.kpis[0].health(), HealthStatus::Healthy);
        assert_eq!(view.kpis[2].health(), HealthStatus::Critical);
        assert_eq!(view.kpis[3].value, 3.0);
        assert_eq!(view.kpis[3].health(), HealthStatus::Warning);
        assert!(view.zones.is_empty());
    }

    #[test]
    fn test_alerts_view_newest_first() {
        let mut builder = Snapshot::builder().seq(3);
        for i in 0..12 {
            let severity = if i % 3 == 0 { Severity::Critical } else { Severity::Warning };
            builder = builder.alert(Alert::new(
                format!("Z{i}"),
                Parameter::Humidity,
                99.0,
                (80.0, 90.0),
                severity,
            ));
        }
        let snapshot = builder.build();

        let view = AlertsView::compute(&snapshot);
        assert_eq!(view.counts.total(), 12);
        assert_eq!(view.counts.critical, 4);
        assert_eq!(view.recent.len(), RECENT_ALERT_LIMIT);
        assert_eq!(view.recent[0].zone, "Z11");
        assert_eq!(view.recent[9].zone, "Z2");
        assert_eq!(view.by_zone.values().sum::<usize>(), 12);
    }

    #[test]
    fn test_trends_view_empty_history() {
        let trends = TrendsData { request_id: 1, range: TimeRange::Day, readings: Vec::new() };
        let view = TrendsView::compute(&trends);
        assert!(view.is_empty());
        assert!(view.stats.is_empty());
        assert!(view.series.is_empty());
    }

    #[test]
    fn test_trends_view_stats() {
        let trends = TrendsData {
            request_id: 4,
            range: TimeRange::Day,
            readings: vec![
                SensorReading::new("A", 1.0, 60.0),
                SensorReading::new("A", 3.0, 62.0),
            ],
        };
        let view = TrendsView::compute(&trends);
        assert_eq!(view.request_id, 4);
        assert_eq!(view.reading_count, 2);
        assert_eq!(view.stats["A"].max_temp, 3.0);
        assert_eq!(view.series["A"].temperature.len(), 2);
    }
}
