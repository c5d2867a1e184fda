//! Statistics derived from readings and alerts.
//!
//! Every function here is pure: identical input yields identical output
//! regardless of call order. Results keyed by zone use `BTreeMap` so their
//! iteration order never depends on input order.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use coldwatch_types::{
    Alert, SensorReading, Severity, Threshold, ThresholdMap, TimeRange, ZoneReadings,
};

/// Whether a reading lies within both of its zone's inclusive ranges.
pub fn is_compliant(reading: &SensorReading, threshold: &Threshold) -> bool {
    reading_status(reading, threshold).is_compliant()
}

/// Per-parameter compliance of a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingStatus {
    pub temperature_ok: bool,
    pub humidity_ok: bool,
}

impl ReadingStatus {
    pub fn is_compliant(&self) -> bool {
        self.temperature_ok && self.humidity_ok
    }
}

/// Check temperature and humidity separately against a threshold.
pub fn reading_status(reading: &SensorReading, threshold: &Threshold) -> ReadingStatus {
    ReadingStatus {
        temperature_ok: threshold.temperature_in_range(reading.temperature),
        humidity_ok: threshold.humidity_in_range(reading.humidity),
    }
}

/// Compliance flag per zone.
///
/// Zones without a threshold are left out of the result rather than being
/// reported as non-compliant.
pub fn zone_compliance(readings: &ZoneReadings, thresholds: &ThresholdMap) -> BTreeMap<String, bool> {
    readings
        .iter()
        .filter_map(|(zone, reading)| {
            thresholds
                .get(zone)
                .map(|threshold| (zone.clone(), is_compliant(reading, threshold)))
        })
        .collect()
}

/// Zone counts by compliance outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ZoneStatusSummary {
    pub compliant: usize,
    pub non_compliant: usize,
    /// Zones reporting readings but lacking a threshold.
    pub unknown: usize,
}

impl ZoneStatusSummary {
    pub fn total(&self) -> usize {
        self.compliant + self.non_compliant + self.unknown
    }
}

/// Summarise how many zones are in and out of range.
pub fn zone_status_summary(readings: &ZoneReadings, thresholds: &ThresholdMap) -> ZoneStatusSummary {
    let compliance = zone_compliance(readings, thresholds);
    let compliant = compliance.values().filter(|ok| **ok).count();
    ZoneStatusSummary {
        compliant,
        non_compliant: compliance.len() - compliant,
        unknown: readings.len() - compliance.len(),
    }
}

/// Min/avg/max statistics for one zone over a window of readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneStats {
    pub count: usize,
    pub avg_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_humidity: f64,
    pub min_humidity: f64,
    pub max_humidity: f64,
}

impl ZoneStats {
    /// Aggregate the given readings.
    ///
    /// Returns `None` when there are no readings, so an empty window is
    /// reported as "no data" instead of a division by zero.
    pub fn from_readings<'a, I>(readings: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a SensorReading>,
    {
        let mut iter = readings.into_iter();
        let first = iter.next()?;

        let mut count = 1usize;
        let mut temp_sum = first.temperature;
        let mut humidity_sum = first.humidity;
        let mut stats = ZoneStats {
            count,
            avg_temp: first.temperature,
            min_temp: first.temperature,
            max_temp: first.temperature,
            avg_humidity: first.humidity,
            min_humidity: first.humidity,
            max_humidity: first.humidity,
        };

        for reading in iter {
            count += 1;
            temp_sum += reading.temperature;
            humidity_sum += reading.humidity;
            stats.min_temp = stats.min_temp.min(reading.temperature);
            stats.max_temp = stats.max_temp.max(reading.temperature);
            stats.min_humidity = stats.min_humidity.min(reading.humidity);
            stats.max_humidity = stats.max_humidity.max(reading.humidity);
        }

        stats.count = count;
        stats.avg_temp = temp_sum / count as f64;
        stats.avg_humidity = humidity_sum / count as f64;
        Some(stats)
    }
}

/// Per-zone statistics over historical readings.
///
/// Zones with no readings do not appear in the result.
pub fn aggregate_stats(readings: &[SensorReading]) -> BTreeMap<String, ZoneStats> {
    group_by_zone(readings)
        .into_iter()
        .filter_map(|(zone, group)| {
            ZoneStats::from_readings(group).map(|stats| (zone.to_string(), stats))
        })
        .collect()
}

/// Alert counts by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub warning: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.critical + self.warning
    }
}

pub fn alert_severity_counts(alerts: &[Alert]) -> SeverityCounts {
    alerts
        .iter()
        .fold(SeverityCounts::default(), |mut counts, alert| {
            match alert.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
            }
            counts
        })
}

pub fn alert_frequency_by_zone(alerts: &[Alert]) -> BTreeMap<String, usize> {
    let mut frequency = BTreeMap::new();
    for alert in alerts {
        *frequency.entry(alert.zone.clone()).or_insert(0) += 1;
    }
    frequency
}

/// The last `n` alerts, oldest first.
pub fn recent_alerts(alerts: &[Alert], n: usize) -> &[Alert] {
    &alerts[alerts.len().saturating_sub(n)..]
}

/// Readings that fall within `range` of the newest timestamp in the set.
///
/// The window is anchored on the data rather than the local clock, so a
/// backend clock offset does not empty the view. When no reading carries a
/// timestamp the input is returned unchanged.
pub fn readings_in_window(readings: &[SensorReading], range: TimeRange) -> Vec<SensorReading> {
    let Some(latest) = readings.iter().filter_map(|r| r.timestamp).max() else {
        return readings.to_vec();
    };
    let cutoff = latest - range.duration();

    readings
        .iter()
        .filter(|r| r.timestamp.is_some_and(|ts| ts >= cutoff))
        .cloned()
        .collect()
}

/// Chart points for one zone. X values are minutes since the earliest
/// reading in the set (or sample index when timestamps are missing).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoneSeries {
    pub temperature: Vec<(f64, f64)>,
    pub humidity: Vec<(f64, f64)>,
}

pub fn series_by_zone(readings: &[SensorReading]) -> BTreeMap<String, ZoneSeries> {
    let origin: Option<NaiveDateTime> = readings.iter().filter_map(|r| r.timestamp).min();

    let mut series: BTreeMap<String, ZoneSeries> = BTreeMap::new();
    for (zone, group) in group_by_zone(readings) {
        let entry = series.entry(zone.to_string()).or_default();
        for (index, reading) in group.into_iter().enumerate() {
            let x = match (origin, reading.timestamp) {
                (Some(origin), Some(ts)) => (ts - origin).num_seconds() as f64 / 60.0,
                _ => index as f64,
            };
            entry.temperature.push((x, reading.temperature));
            entry.humidity.push((x, reading.humidity));
        }
    }
    series
}

fn group_by_zone(readings: &[SensorReading]) -> BTreeMap<&str, Vec<&SensorReading>> {
    let mut groups: BTreeMap<&str, Vec<&SensorReading>> = BTreeMap::new();
    for reading in readings {
        groups.entry(reading.zone.as_str()).or_default().push(reading);
    }
    groups
}
