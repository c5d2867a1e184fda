//! # coldwatch-client
//!
//! Client for the cold-storage monitoring backend.
//!
//! The [`DashboardApi`] trait describes every backend call the dashboard
//! makes; [`HttpClient`] implements it over the REST API. Code that needs a
//! backend should depend on the trait so it can be exercised against an
//! in-memory implementation in tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coldwatch_client::{DashboardApi, HttpClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::builder()
//!         .endpoint("http://localhost:5000")
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let thresholds = client.thresholds().await?;
//!     let readings = client.sensor_data().await?;
//!
//!     for (zone, reading) in &readings {
//!         let ok = thresholds
//!             .get(zone)
//!             .map(|t| t.temperature_in_range(reading.temperature));
//!         println!("{zone}: {:.1}°C in range: {ok:?}", reading.temperature);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;

use async_trait::async_trait;

pub use error::ClientError;
pub use http::{HttpClient, HttpClientBuilder};

// Re-export types for convenience
pub use coldwatch_types::{
    Alert, Analytics, SensorReading, Threshold, ThresholdMap, TimeRange, ZoneReadings,
};

/// The backend operations the dashboard depends on.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Flip the backend's monitoring flag, returning the new state.
    async fn toggle_monitoring(&self) -> Result<bool, ClientError>;

    /// Drop every alert held by the backend.
    async fn clear_alerts(&self) -> Result<(), ClientError>;

    /// Configured thresholds for all zones.
    async fn thresholds(&self) -> Result<ThresholdMap, ClientError>;

    /// Replace the thresholds of one zone.
    async fn update_threshold(&self, zone: &str, threshold: Threshold) -> Result<(), ClientError>;

    /// Latest reading per zone.
    async fn sensor_data(&self) -> Result<ZoneReadings, ClientError>;

    /// Alerts currently held by the backend, oldest first.
    async fn alerts(&self) -> Result<Vec<Alert>, ClientError>;

    /// Backend-computed compliance analytics.
    async fn analytics(&self) -> Result<Analytics, ClientError>;

    /// Historical readings for the trends view, oldest first.
    async fn historical_data(&self, range: TimeRange) -> Result<Vec<SensorReading>, ClientError>;
}
