//! Rolling per-zone history for live sparklines and trend rates.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use coldwatch_types::Snapshot;

/// Maximum number of snapshots to keep per zone.
const MAX_HISTORY_SIZE: usize = 60;

/// Recent samples for one zone, oldest first.
///
/// Each zone keeps its own timestamps so a zone that drops out of some
/// snapshots still measures rates over its own samples.
#[derive(Debug, Clone, Default)]
pub struct ZoneHistory {
    pub temperatures: VecDeque<f64>,
    pub humidity: VecDeque<f64>,
    pub timestamps: VecDeque<Instant>,
}

impl ZoneHistory {
    fn push(&mut self, temperature: f64, humidity: f64, at: Instant) {
        push_bounded(&mut self.temperatures, temperature);
        push_bounded(&mut self.humidity, humidity);
        self.timestamps.push_back(at);
        if self.timestamps.len() > MAX_HISTORY_SIZE {
            self.timestamps.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Tracks recent readings so the live view can show short-term movement.
#[derive(Debug, Clone, Default)]
pub struct History {
    zones: HashMap<String, ZoneHistory>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied snapshot.
    pub fn record(&mut self, snapshot: &Snapshot) {
        self.record_at(snapshot, Instant::now());
    }

    /// Record an applied snapshot at a specific time.
    pub fn record_at(&mut self, snapshot: &Snapshot, at: Instant) {
        for (zone, reading) in &snapshot.readings {
            self.zones
                .entry(zone.clone())
                .or_default()
                .push(reading.temperature, reading.humidity, at);
        }
    }

    /// Samples recorded for a zone, if it has appeared in any snapshot.
    pub fn zone(&self, zone: &str) -> Option<&ZoneHistory> {
        self.zones.get(zone)
    }

    /// Sparkline levels (0-7) for a zone's temperature.
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn temperature_sparkline(&self, zone: &str) -> Vec<u8> {
        normalize_sparkline(self.zones.get(zone).map(|z| &z.temperatures))
    }

    /// Sparkline levels (0-7) for a zone's humidity.
    pub fn humidity_sparkline(&self, zone: &str) -> Vec<u8> {
        normalize_sparkline(self.zones.get(zone).map(|z| &z.humidity))
    }

    /// Temperature change in °C per minute between the zone's last two samples.
    ///
    /// Returns None if there's not enough history to calculate a rate.
    pub fn temperature_rate(&self, zone: &str) -> Option<f64> {
        let history = self.zones.get(zone)?;
        let values = &history.temperatures;
        let times = &history.timestamps;
        if values.len() < 2 || times.len() < 2 {
            return None;
        }

        let current = *values.back()?;
        let previous = *values.get(values.len() - 2)?;

        let current_time = times.back()?;
        let previous_time = times.get(times.len() - 2)?;
        let elapsed = current_time.duration_since(*previous_time).as_secs_f64();

        if elapsed > 0.0 {
            Some((current - previous) / elapsed * 60.0)
        } else {
            None
        }
    }
}

fn push_bounded(values: &mut VecDeque<f64>, value: f64) {
    values.push_back(value);
    if values.len() > MAX_HISTORY_SIZE {
        values.pop_front();
    }
}

/// Scale values into 0-7 for the eight sparkline bar heights.
fn normalize_sparkline(data: Option<&VecDeque<f64>>) -> Vec<u8> {
    let Some(values) = data else {
        return Vec::new();
    };

    if values.len() < 2 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|&v| {
            if range <= f64::EPSILON {
                3
            } else {
                (((v - min) / range) * 7.0).round().clamp(0.0, 7.0) as u8
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn snapshot(temp: f64, humidity: f64) -> Snapshot {
        Snapshot::builder().reading("A", temp, humidity).build()
    }

    #[test]
    fn test_sparkline_needs_two_points() {
        let mut history = History::new();
        assert!(history.temperature_sparkline("A").is_empty());

        history.record(&snapshot(1.0, 60.0));
        assert!(history.temperature_sparkline("A").is_empty());

        history.record(&snapshot(2.0, 62.0));
        assert_eq!(history.temperature_sparkline("A"), vec![0, 7]);
        assert_eq!(history.humidity_sparkline("A"), vec![0, 7]);
    }

    #[test]
    fn test_flat_series_sits_mid_height() {
        let mut history = History::new();
        for _ in 0..3 {
            history.record(&snapshot(4.0, 90.0));
        }
        assert_eq!(history.temperature_sparkline("A"), vec![3, 3, 3]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new();
        for i in 0..(MAX_HISTORY_SIZE + 10) {
            history.record(&snapshot(i as f64, 60.0));
        }
        let zone = history.zone("A").unwrap();
        assert_eq!(zone.temperatures.len(), MAX_HISTORY_SIZE);
        assert_eq!(zone.len(), MAX_HISTORY_SIZE);
        assert_eq!(zone.temperatures.front(), Some(&10.0));
    }

    #[test]
    fn test_temperature_rate_per_minute() {
        let mut history = History::new();
        let start = Instant::now();
        history.record_at(&snapshot(2.0, 60.0), start);
        history.record_at(&snapshot(2.5, 60.0), start + Duration::from_secs(30));

        let rate = history.temperature_rate("A").unwrap();
        assert!((rate - 1.0).abs() < 1e-9);
        assert!(history.temperature_rate("missing").is_none());
    }

    #[test]
    fn test_rate_uses_zone_own_samples() {
        let mut history = History::new();
        let start = Instant::now();
        let both = |a: f64, b: f64| {
            Snapshot::builder()
                .reading("A", a, 60.0)
                .reading("B", b, 80.0)
                .build()
        };

        history.record_at(&both(2.0, 4.0), start);
        // B missing from the middle snapshot
        history.record_at(&snapshot(2.0, 60.0), start + Duration::from_secs(30));
        history.record_at(&both(2.0, 5.0), start + Duration::from_secs(60));

        // B rose 1.0 over its own 60 s gap, not the last 30 s
        let rate = history.temperature_rate("B").unwrap();
        assert!((rate - 1.0).abs() < 1e-9);
        assert_eq!(history.zone("B").unwrap().len(), 2);
        assert_eq!(history.zone("A").unwrap().len(), 3);
    }
}
