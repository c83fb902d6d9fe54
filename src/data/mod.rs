//! Data models and processing for telemetry samples.
//!
//! This module turns raw sampler readings into the normalized, aggregated
//! records the dashboard displays.
//!
//! ## Submodules
//!
//! - [`metrics`]: metric normalization ([`SocMetrics`], [`normalize`])
//! - [`power`]: streaming aggregation ([`PowerAggregator`], sliding windows
//!   and running peaks)
//! - [`history`]: bounded chart history for the power sparklines
//!
//! ## Data Flow
//!
//! ```text
//! RawSample (decoded by a source)
//!        │
//!        ▼
//! metrics::normalize()
//!        │
//!        ├──▶ SocMetrics (topology-independent, fixed shape)
//!        │
//!        └──▶ PowerAggregator::observe() per channel (instant/avg/peak)
//!                    │
//!                    └──▶ PowerHistory::record() (for the charts)
//! ```

pub mod history;
pub mod metrics;
pub mod power;

pub use history::{power_percent, PowerHistory};
pub use metrics::{normalize, ClusterMetrics, CoreMetrics, SocMetrics};
pub use power::{PowerAggregator, PowerChannel, PowerReading};
