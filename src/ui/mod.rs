//! Terminal rendering for the dashboard.
//!
//! Widget groups mirror the physical layout: a processor block (cluster,
//! core, GPU and ANE gauges), a memory block, and the power charts. All
//! rendering consumes the [`crate::app::TelemetryData`] bundle; nothing here
//! mutates application state.

pub mod common;
pub mod memory;
pub mod power;
pub mod processor;
pub mod theme;

pub use theme::Theme;
