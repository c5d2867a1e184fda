//! Sensor readings reported per storage zone.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// Latest readings keyed by zone name, as returned by `/api/sensor-data`.
pub type ZoneReadings = BTreeMap<String, SensorReading>;

/// A single temperature/humidity measurement for one zone.
///
/// The backend reports timestamps as naive local ISO-8601 strings
/// (e.g. `2024-05-01T12:00:00.123456`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorReading {
    /// Zone the sensor belongs to.
    ///
    /// Absent from keyed payloads, where the map key names the zone.
    #[cfg_attr(feature = "serde", serde(default))]
    pub zone: String,

    /// Temperature in degrees Celsius.
    pub temperature: f64,

    /// Relative humidity in percent.
    pub humidity: f64,

    /// When the reading was taken.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub timestamp: Option<NaiveDateTime>,
}

impl SensorReading {
    /// Create a reading without a timestamp.
    pub fn new(zone: impl Into<String>, temperature: f64, humidity: f64) -> Self {
        Self {
            zone: zone.into(),
            temperature,
            humidity,
            timestamp: None,
        }
    }

    /// Attach a timestamp.
    pub fn at(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
