//! Backend-computed compliance analytics.

use std::collections::BTreeMap;

/// Compliance percentages for a single zone.
///
/// All percentages are in `[0, 100]`. Fields missing from the payload
/// default to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZoneMetrics {
    pub overall_compliance: f64,
    pub temp_compliance: f64,
    pub humidity_compliance: f64,
    /// Number of readings the percentages were computed from.
    pub total: u64,
    pub avg_temp: f64,
    pub avg_humidity: f64,
}

/// Facility-wide analytics, as returned by `/api/analytics`.
///
/// The backend omits `total_alerts` when it has no readings yet, so every
/// field defaults.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Analytics {
    pub overall_compliance: f64,
    pub temp_compliance: f64,
    pub humidity_compliance: f64,
    pub total_alerts: u64,
    pub zone_metrics: BTreeMap<String, ZoneMetrics>,
}
