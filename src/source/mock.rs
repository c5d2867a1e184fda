//! In-memory backend used by tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use coldwatch_client::{ClientError, DashboardApi};
use coldwatch_types::{
    Alert, Analytics, Parameter, SensorReading, Severity, Threshold, ThresholdMap, TimeRange,
    ZoneReadings,
};

/// Backend double that counts calls and fails on request.
#[derive(Default)]
pub(crate) struct MockApi {
    pub monitoring: AtomicBool,
    pub fail_toggle: AtomicBool,
    pub fail_sensor: AtomicBool,
    pub fail_alerts: AtomicBool,
    pub fail_clear: AtomicBool,
    pub fail_thresholds: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_history: AtomicBool,
    pub sensor_calls: AtomicUsize,
    pub alert_calls: AtomicUsize,
    pub analytics_calls: AtomicUsize,
    pub clear_calls: AtomicUsize,
    pub threshold_calls: AtomicUsize,
    pub history_ranges: Mutex<Vec<TimeRange>>,
    pub updates: Mutex<Vec<(String, Threshold)>>,
}

impl MockApi {
    pub fn fetches(&self) -> usize {
        self.sensor_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DashboardApi for MockApi {
    async fn toggle_monitoring(&self) -> Result<bool, ClientError> {
        if self.fail_toggle.load(Ordering::SeqCst) {
            return Err(ClientError::Connection("refused".into()));
        }
        let active = !self.monitoring.load(Ordering::SeqCst);
        self.monitoring.store(active, Ordering::SeqCst);
        Ok(active)
    }

    async fn clear_alerts(&self) -> Result<(), ClientError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(ClientError::Http("500".into()));
        }
        Ok(())
    }

    async fn thresholds(&self) -> Result<ThresholdMap, ClientError> {
        self.threshold_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_thresholds.load(Ordering::SeqCst) {
            return Err(ClientError::Connection("refused".into()));
        }

        let mut map = ThresholdMap::new();
        map.insert("A".into(), Threshold::new(0.0, 5.0, 50.0, 70.0));
        for (zone, threshold) in self.updates.lock().unwrap().iter() {
            map.insert(zone.clone(), *threshold);
        }
        Ok(map)
    }

    async fn update_threshold(&self, zone: &str, threshold: Threshold) -> Result<(), ClientError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ClientError::Http("/api/update-thresholds returned status 400".into()));
        }
        self.updates
            .lock()
            .unwrap()
            .push((zone.to_string(), threshold));
        Ok(())
    }

    async fn sensor_data(&self) -> Result<ZoneReadings, ClientError> {
        self.sensor_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sensor.load(Ordering::SeqCst) {
            return Err(ClientError::Connection("refused".into()));
        }
        let mut readings = ZoneReadings::new();
        readings.insert("A".into(), SensorReading::new("A", 3.0, 60.0));
        Ok(readings)
    }

    async fn alerts(&self) -> Result<Vec<Alert>, ClientError> {
        self.alert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_alerts.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout);
        }
        Ok(vec![Alert::new(
            "A",
            Parameter::Humidity,
            75.0,
            (50.0, 70.0),
            Severity::Warning,
        )])
    }

    async fn analytics(&self) -> Result<Analytics, ClientError> {
        self.analytics_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Analytics {
            overall_compliance: 90.0,
            ..Default::default()
        })
    }

    async fn historical_data(&self, range: TimeRange) -> Result<Vec<SensorReading>, ClientError> {
        self.history_ranges.lock().unwrap().push(range);
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout);
        }
        Ok(vec![SensorReading::new("A", 2.0, 61.0)])
    }
}
