//! Non-interactive runs: export one snapshot or push a threshold, then exit.
//!
//! Both go through [`RefreshScheduler::handle`], the same command path the
//! dashboard uses.

use std::path::Path;

use anyhow::{bail, Result};
use tracing::{info, warn};

use coldwatch_types::{Threshold, TimeRange};

use crate::data::{export, MetricsStore};
use crate::source::{Command, RefreshScheduler, SourceEvent};

/// Load thresholds, one snapshot and the trends range into a fresh store.
///
/// Only a failed snapshot fetch is fatal. Missing thresholds or history are
/// logged and the export goes ahead without them.
pub async fn collect_export(
    scheduler: &mut RefreshScheduler,
    time_range: TimeRange,
) -> Result<MetricsStore> {
    let mut store = MetricsStore::new();

    let request_id = store.issue_history_request();
    let commands = [
        Command::LoadThresholds,
        Command::Refresh,
        Command::LoadHistory {
            request_id,
            range: time_range,
        },
    ];

    for command in commands {
        let refresh = command == Command::Refresh;
        for event in scheduler.handle(command).await {
            match event {
                SourceEvent::Thresholds(thresholds) => store.set_thresholds(thresholds),
                SourceEvent::Snapshot(snapshot) => {
                    store.set_snapshot(snapshot);
                }
                SourceEvent::History {
                    request_id,
                    range,
                    readings,
                } => {
                    store.set_history(request_id, range, readings);
                }
                SourceEvent::Error(message) if refresh => bail!(message),
                SourceEvent::Error(message) | SourceEvent::HistoryFailed { message, .. } => {
                    warn!("{}", message)
                }
                _ => {}
            }
        }
    }

    if store.snapshot().is_none() {
        bail!("Backend returned no snapshot");
    }
    Ok(store)
}

/// Collect a snapshot and write it to `path` as JSON.
pub async fn export_to_file(
    scheduler: &mut RefreshScheduler,
    time_range: TimeRange,
    path: &Path,
) -> Result<()> {
    let store = collect_export(scheduler, time_range).await?;
    export::write_export(&store, path)?;
    info!("Exported dashboard state to {}", path.display());
    Ok(())
}

/// Replace one zone's threshold on the backend.
///
/// Returns the threshold the backend reports after the update, if the
/// reload succeeded and lists the zone.
pub async fn update_threshold(
    scheduler: &mut RefreshScheduler,
    zone: String,
    threshold: Threshold,
) -> Result<Option<Threshold>> {
    let events = scheduler
        .handle(Command::UpdateThreshold {
            zone: zone.clone(),
            threshold,
        })
        .await;

    let mut updated = false;
    let mut confirmed = None;
    for event in events {
        match event {
            SourceEvent::ThresholdUpdated(_) => updated = true,
            SourceEvent::Thresholds(thresholds) => confirmed = thresholds.get(&zone).copied(),
            SourceEvent::Error(message) if !updated => bail!(message),
            SourceEvent::Error(message) => warn!("{}", message),
            _ => {}
        }
    }

    if !updated {
        bail!("Backend did not confirm the update for {}", zone);
    }
    Ok(confirmed)
}

/// One-line confirmation printed after a threshold update.
pub fn describe_threshold(zone: &str, threshold: &Threshold) -> String {
    format!(
        "Updated {}: temperature {:.1} to {:.1} C, humidity {:.0} to {:.0} %",
        zone, threshold.temp_min, threshold.temp_max, threshold.humidity_min, threshold.humidity_max
    )
}
