// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # powerwatch
//!
//! A terminal dashboard and library for Apple Silicon power and utilization
//! telemetry.
//!
//! This crate consumes periodic raw samples from an external system sampler
//! and presents them as a continuously refreshed terminal dashboard: cluster
//! and per-core utilization gauges, GPU and ANE activity, memory usage, and
//! smoothed power charts with running peaks and throttle detection.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (loop)  │    │(normalize│    │(render) │    │         │  │
//! │  └────┬────┘    │ aggregate)    └─────────┘    └─────────┘  │
//! │       │         └──────────┘                                 │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── SamplerSource | StreamSource | FileSource   │
//! │  │ (input) │                  | ChannelSource               │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: the update loop - drains the sample queue, de-duplicates
//!   by timestamp, and drives normalization and aggregation
//! - **[`source`]**: sample source abstraction ([`SampleSource`] trait) with
//!   implementations for the spawned sampler process, byte streams, file
//!   replay, and channel-based input
//! - **[`data`]**: metric normalization ([`data::normalize`]) and streaming
//!   power aggregation ([`PowerAggregator`])
//! - **[`system`]**: one-time chip capability probe and the memory metrics
//!   boundary
//! - **[`ui`]**: terminal rendering using ratatui - gauges, power charts,
//!   and theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Spawn the sampler and monitor live
//! powerwatch --interval 1 --avg 30
//!
//! # Replay a captured sample file
//! powerwatch --file sample.json
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use std::time::Duration;
//! use powerwatch::{App, PowerAggregator};
//! use powerwatch::source::ChannelSource;
//! use powerwatch::system::SocInfo;
//!
//! let (tx, source) = ChannelSource::create("embedded");
//! let aggregator = PowerAggregator::with_capacity(30).unwrap();
//! let app = App::new(
//!     Box::new(source),
//!     SocInfo::detect(),
//!     aggregator,
//!     Duration::from_secs(1),
//!     false,
//! );
//! // push samples with tx.send(Some(sample))
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod events;
pub mod source;
pub mod system;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, LoopState, TelemetryData};
pub use data::{
    normalize, ClusterMetrics, CoreMetrics, PowerAggregator, PowerChannel, PowerHistory,
    PowerReading, SocMetrics,
};
pub use error::MonitorError;
pub use source::{
    ChannelSource, ClusterSample, CoreSample, FileSource, GpuSample, ProcessorSample, RawSample,
    SampleSource, SamplerSource, StreamSource,
};
pub use system::{MemoryMetrics, MemoryReader, SocInfo};
