//! REST client for the monitoring backend.
//!
//! ## Endpoints
//!
//! | Call | Method | Path |
//! |---|---|---|
//! | toggle monitoring | POST | `/api/toggle-monitoring` |
//! | clear alerts | POST | `/api/clear-alerts` |
//! | thresholds | GET | `/api/thresholds` |
//! | update threshold | POST | `/api/update-thresholds` |
//! | sensor data | GET | `/api/sensor-data` |
//! | alerts | GET | `/api/alerts` |
//! | analytics | GET | `/api/analytics` |
//! | historical data | GET | `/api/historical-data?range=24h` |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use coldwatch_types::{
    Alert, Analytics, SensorReading, Threshold, ThresholdMap, TimeRange, ZoneReadings,
};

use crate::{ClientError, DashboardApi};

const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP implementation of [`DashboardApi`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: String,
}

impl HttpClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn post(&self, path: &str) -> Result<Response, ClientError> {
        let response = self.client.post(self.url(path)).send().await?;
        check_status(response)
    }
}

#[async_trait]
impl DashboardApi for HttpClient {
    async fn toggle_monitoring(&self) -> Result<bool, ClientError> {
        let response = self.post("/api/toggle-monitoring").await?;
        let body: ToggleResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(body.status)
    }

    async fn clear_alerts(&self) -> Result<(), ClientError> {
        // Acknowledgement body is ignored
        self.post("/api/clear-alerts").await?;
        Ok(())
    }

    async fn thresholds(&self) -> Result<ThresholdMap, ClientError> {
        self.get_json("/api/thresholds").await
    }

    async fn update_threshold(&self, zone: &str, threshold: Threshold) -> Result<(), ClientError> {
        let request = UpdateThresholdRequest { zone, thresholds: threshold };
        let response = self
            .client
            .post(self.url("/api/update-thresholds"))
            .json(&request)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }

    async fn sensor_data(&self) -> Result<ZoneReadings, ClientError> {
        let readings: ZoneReadings = self.get_json("/api/sensor-data").await?;
        Ok(with_zone_names(readings))
    }

    async fn alerts(&self) -> Result<Vec<Alert>, ClientError> {
        self.get_json("/api/alerts").await
    }

    async fn analytics(&self) -> Result<Analytics, ClientError> {
        self.get_json("/api/analytics").await
    }

    async fn historical_data(&self, range: TimeRange) -> Result<Vec<SensorReading>, ClientError> {
        let response = self
            .client
            .get(self.url("/api/historical-data"))
            .query(&[("range", range.as_str())])
            .send()
            .await?;
        decode(response).await
    }
}

/// Builder for HttpClient.
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpClientBuilder {
    /// Set the backend base URL (e.g., "http://localhost:5000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient, ClientError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let endpoint = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(HttpClient {
            client,
            endpoint: normalize_endpoint(&endpoint),
        })
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

/// Fill in zone names from the map keys; keyed payloads may omit them.
fn with_zone_names(readings: ZoneReadings) -> ZoneReadings {
    readings
        .into_iter()
        .map(|(zone, mut reading)| {
            reading.zone = zone.clone();
            (zone, reading)
        })
        .collect()
}

fn check_status(response: Response) -> Result<Response, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::Http(format!(
            "{} returned status {}",
            response.url().path(),
            response.status()
        )));
    }
    Ok(response)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check_status(response)?;
    response
        .json()
        .await
        .map_err(|e| ClientError::Parse(e.to_string()))
}

/// Response body of `/api/toggle-monitoring`.
#[derive(Debug, Deserialize)]
struct ToggleResponse {
    status: bool,
}

/// Request body of `/api/update-thresholds`.
#[derive(Debug, Serialize)]
struct UpdateThresholdRequest<'a> {
    zone: &'a str,
    thresholds: Threshold,
}
