//! Dashboard state and the statistics derived from it.
//!
//! ## Submodules
//!
//! - [`store`]: [`MetricsStore`], the single owner of applied backend state
//! - [`stats`]: Pure compliance and aggregation functions
//! - [`history`]: Rolling per-zone history for sparklines and rates
//! - [`view`]: Per-tab view-models ([`LiveView`], [`AnalyticsView`], ...)
//! - [`export`]: JSON export of the current state
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (from the scheduler)
//!        │
//!        ▼
//! MetricsStore::set_snapshot()   (stale seq discarded)
//!        │
//!        ├──▶ History::record() (for sparklines)
//!        │
//!        └──▶ LiveView / AnalyticsView / AlertsView::compute()
//!
//! Historical readings ──▶ MetricsStore::set_history() ──▶ TrendsView::compute()
//! ```

pub mod export;
pub mod history;
pub mod stats;
pub mod store;
pub mod view;

pub use history::{History, ZoneHistory};
pub use stats::{ReadingStatus, SeverityCounts, ZoneSeries, ZoneStats, ZoneStatusSummary};
pub use store::{MetricsStore, SnapshotView, TrendsData};
pub use view::{AlertsView, AnalyticsView, HealthStatus, Kpi, LiveView, TrendsView, ZoneCard};
