//! Safe operating ranges configured per zone.

use std::collections::BTreeMap;

/// Thresholds keyed by zone name, as returned by `/api/thresholds`.
pub type ThresholdMap = BTreeMap<String, Threshold>;

/// Inclusive temperature and humidity bounds for one zone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Threshold {
    /// Lowest acceptable temperature (°C).
    pub temp_min: f64,
    /// Highest acceptable temperature (°C).
    pub temp_max: f64,
    /// Lowest acceptable relative humidity (%).
    pub humidity_min: f64,
    /// Highest acceptable relative humidity (%).
    pub humidity_max: f64,
}

impl Threshold {
    /// Create a threshold from its four bounds.
    pub const fn new(temp_min: f64, temp_max: f64, humidity_min: f64, humidity_max: f64) -> Self {
        Self {
            temp_min,
            temp_max,
            humidity_min,
            humidity_max,
        }
    }

    /// Whether `temperature` lies within `[temp_min, temp_max]`.
    pub fn temperature_in_range(&self, temperature: f64) -> bool {
        self.temp_min <= temperature && temperature <= self.temp_max
    }

    /// Whether `humidity` lies within `[humidity_min, humidity_max]`.
    pub fn humidity_in_range(&self, humidity: f64) -> bool {
        self.humidity_min <= humidity && humidity <= self.humidity_max
    }

    /// Both ranges are non-empty.
    pub fn is_valid(&self) -> bool {
        self.temp_min <= self.temp_max && self.humidity_min <= self.humidity_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let t = Threshold::new(0.0, 5.0, 50.0, 70.0);
        assert!(t.temperature_in_range(0.0));
        assert!(t.temperature_in_range(5.0));
        assert!(!t.temperature_in_range(5.01));
        assert!(t.humidity_in_range(50.0));
        assert!(t.humidity_in_range(70.0));
        assert!(!t.humidity_in_range(49.9));
    }

    #[test]
    fn test_is_valid() {
        assert!(Threshold::new(-20.0, -18.0, 80.0, 90.0).is_valid());
        assert!(!Threshold::new(4.0, 2.0, 85.0, 95.0).is_valid());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_threshold_map() {
        let json = r#"{
            "Zone A - Frozen Foods": {"temp_min": -20, "temp_max": -18, "humidity_min": 80, "humidity_max": 90}
        }"#;
        let map: ThresholdMap = serde_json::from_str(json).unwrap();
        assert_eq!(
            map["Zone A - Frozen Foods"],
            Threshold::new(-20.0, -18.0, 80.0, 90.0)
        );
    }
}
