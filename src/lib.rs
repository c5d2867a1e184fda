//! # coldwatch
//!
//! A terminal dashboard for cold-storage warehouse monitoring.
//!
//! coldwatch polls a monitoring backend over REST for per-zone temperature
//! and humidity readings, alerts and compliance analytics, checks each zone
//! against its thresholds, and presents the result in four tabs: Live,
//! Analytics, Alerts and Trends.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────── UI thread ─────────────────────────────┐
//! │  events ──▶ Action ──▶ app (App) ──▶ data (store, views) ──▶ ui    │
//! │                         │   ▲                                      │
//! │                 Command │   │ SourceEvent                          │
//! └─────────────────────────┼───┼──────────────────────────────────────┘
//!                           ▼   │
//! ┌───────────────── tokio runtime (1 worker) ─────────────────────────┐
//! │  source::scheduler (RefreshScheduler) ──▶ coldwatch_client (HTTP)  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, tab routing and the [`Action`](app::Action) enum
//! - **[`source`]**: The [`DataSource`] trait, [`ChannelSource`] and the refresh scheduler
//! - **[`data`]**: [`MetricsStore`], pure statistics, history and per-tab view-models
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered settings (defaults, file, environment)
//! - **[`logging`]**: Tracing setup
//! - **[`oneshot`]**: Export and threshold updates without the TUI
//!
//! ## Usage
//!
//! ```bash
//! # Watch the backend on localhost:5000
//! coldwatch
//!
//! # Another backend, faster polling, log to a file
//! coldwatch --endpoint http://warehouse:5000 --interval 1 --log-file coldwatch.log
//!
//! # Write one snapshot to JSON and exit
//! coldwatch --export state.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use coldwatch::{App, ChannelSource, SourceEvent};
//! use coldwatch_types::{Snapshot, TimeRange};
//!
//! let (handle, source) = ChannelSource::create("in-memory");
//! let mut app = App::new(Box::new(source), TimeRange::Day);
//!
//! handle
//!     .events
//!     .send(SourceEvent::Snapshot(Snapshot::builder().seq(1).reading("Zone A", 2.0, 90.0).build()))
//!     .unwrap();
//! assert!(app.poll_source());
//! assert_eq!(app.store().applied_seq(), Some(1));
//! ```
//!
//! ### Driving the scheduler
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use coldwatch::source::scheduler;
//! use coldwatch_client::HttpClient;
//!
//! # tokio_test::block_on(async {
//! let client = Arc::new(HttpClient::builder().build().unwrap());
//! let source = scheduler::spawn(client, Duration::from_secs(3), "http://localhost:5000");
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod oneshot;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{Action, App, Tab};
pub use config::Settings;
pub use data::{HealthStatus, MetricsStore, SnapshotView};
pub use source::{ChannelSource, Command, DataSource, SourceEvent};
