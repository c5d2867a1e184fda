//! Alerts raised by the backend when a reading leaves its safe range.

use std::fmt;

use chrono::NaiveDateTime;

/// The measured quantity an alert refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Parameter {
    Temperature,
    Humidity,
}

impl Parameter {
    /// Display unit for values of this parameter.
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Humidity => "%",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Temperature => f.write_str("temperature"),
            Parameter::Humidity => f.write_str("humidity"),
        }
    }
}

/// Alert classification. Ordered so that `Critical > Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Critical => f.write_str("critical"),
        }
    }
}

/// An out-of-range event for one zone and parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alert {
    /// Backend-assigned identifier, when provided.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<String>,

    /// Zone the offending reading came from.
    pub zone: String,

    /// Which quantity was out of range.
    pub parameter: Parameter,

    /// The offending value.
    pub value: f64,

    /// Lower bound in force when the alert was raised.
    pub min_threshold: f64,

    /// Upper bound in force when the alert was raised.
    pub max_threshold: f64,

    pub severity: Severity,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub timestamp: Option<NaiveDateTime>,
}

impl Alert {
    /// Create an alert without id or timestamp.
    pub fn new(
        zone: impl Into<String>,
        parameter: Parameter,
        value: f64,
        range: (f64, f64),
        severity: Severity,
    ) -> Self {
        Self {
            id: None,
            zone: zone.into(),
            parameter,
            value,
            min_threshold: range.0,
            max_threshold: range.1,
            severity,
            timestamp: None,
        }
    }
}
