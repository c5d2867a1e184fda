//! # coldwatch-types
//!
//! Core types for cold-storage facility monitoring. This crate defines the
//! data exchanged between the facility backend and the coldwatch dashboard:
//! per-zone sensor readings, the safe-range thresholds configured for each
//! zone, alerts raised by the backend, and the analytics it derives.
//!
//! ## Features
//!
//! - `serde`: JSON serialization matching the backend's REST payloads
//!
//! ## Example
//!
//! ```rust
//! use coldwatch_types::{Snapshot, Threshold};
//!
//! let snapshot = Snapshot::builder()
//!     .seq(1)
//!     .reading("Zone B - Dairy", 3.1, 88.0)
//!     .reading("Zone C - Produce", 1.4, 93.5)
//!     .build();
//!
//! let dairy = Threshold::new(2.0, 4.0, 85.0, 95.0);
//! let reading = snapshot.reading("Zone B - Dairy").unwrap();
//! assert!(dairy.temperature_in_range(reading.temperature));
//! ```

mod alert;
mod analytics;
mod range;
mod reading;
mod snapshot;
mod threshold;

pub use alert::*;
pub use analytics::*;
pub use range::*;
pub use reading::*;
pub use snapshot::*;
pub use threshold::*;
