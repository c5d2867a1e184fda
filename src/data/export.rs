//! JSON export of the current dashboard state.

use std::io::Write;
use std::path::Path;

use serde_json::{json, Map, Value};

use super::stats::{
    aggregate_stats, alert_frequency_by_zone, alert_severity_counts, readings_in_window,
    reading_status, zone_status_summary,
};
use super::store::MetricsStore;

/// Build the export document from the store.
///
/// Fails when no snapshot has been applied yet.
pub fn export_document(store: &MetricsStore) -> anyhow::Result<Value> {
    let Some(view) = store.view() else {
        anyhow::bail!("No data to export");
    };
    let snapshot = view.snapshot;

    let mut export = Map::new();
    export.insert("seq".to_string(), json!(snapshot.seq));

    let zones = zone_status_summary(&snapshot.readings, view.thresholds);
    let alerts = alert_severity_counts(&snapshot.alerts);
    export.insert(
        "summary".to_string(),
        json!({
            "zones": zones.total(),
            "compliant": zones.compliant,
            "non_compliant": zones.non_compliant,
            "no_threshold": zones.unknown,
            "critical_alerts": alerts.critical,
            "warning_alerts": alerts.warning,
            "total_alerts": alerts.total(),
            "overall_compliance": snapshot.analytics.overall_compliance,
        }),
    );

    let readings: Vec<Value> = snapshot
        .readings
        .iter()
        .map(|(zone, reading)| {
            let threshold = view.thresholds.get(zone);
            let status = threshold.map(|t| reading_status(reading, t));
            json!({
                "zone": zone,
                "temperature": reading.temperature,
                "humidity": reading.humidity,
                "threshold": threshold,
                "temperature_ok": status.map(|s| s.temperature_ok),
                "humidity_ok": status.map(|s| s.humidity_ok),
                "compliant": status.map(|s| s.is_compliant()),
            })
        })
        .collect();
    export.insert("zones".to_string(), Value::Array(readings));

    export.insert(
        "alerts".to_string(),
        json!({
            "by_severity": alerts,
            "by_zone": alert_frequency_by_zone(&snapshot.alerts),
            "items": snapshot.alerts,
        }),
    );
    export.insert("analytics".to_string(), json!(snapshot.analytics));

    if let Some(trends) = store.trends() {
        let window = readings_in_window(&trends.readings, trends.range);
        export.insert(
            "trends".to_string(),
            json!({
                "range": trends.range,
                "readings": window.len(),
                "stats": aggregate_stats(&window),
            }),
        );
    }

    Ok(Value::Object(export))
}

/// Write the export document to `path` as pretty-printed JSON.
pub fn write_export(store: &MetricsStore, path: &Path) -> anyhow::Result<()> {
    let document = export_document(store)?;
    let json = serde_json::to_string_pretty(&document)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
