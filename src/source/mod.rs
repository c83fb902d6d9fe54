//! Sample source abstraction for receiving raw telemetry readings.
//!
//! This module provides a trait-based abstraction for receiving samples
//! from various backends: the spawned sampler process, network streams,
//! files, or in-memory channels.

mod channel;
mod file;
mod sample;
mod sampler;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use sample::{ClusterSample, CoreSample, GpuSample, ProcessorSample, RawSample};
pub use sampler::{SamplerSource, DEFAULT_SAMPLER_COMMAND};
pub use stream::StreamSource;

use std::fmt::Debug;

use crate::error::MonitorError;

/// Trait for receiving raw samples from various sources.
///
/// Implementations push decoded samples through an internal FIFO; `poll`
/// drains it one item at a time without blocking, so the caller's refresh
/// cadence stays decoupled from sampler jitter.
///
/// # Example
///
/// ```
/// use powerwatch::source::{ChannelSource, SampleSource};
///
/// let (_tx, mut source) = ChannelSource::create("test");
/// assert!(source.poll().unwrap().is_none());
/// ```
pub trait SampleSource: Send + Debug {
    /// Poll for the next sample.
    ///
    /// Returns `Ok(Some(sample))` if one is available, `Ok(None)` if the
    /// queue is currently empty (a valid state — e.g. during sampler
    /// hiccups), and `Err(MonitorError::SourceUnavailable)` if the queue or
    /// the producing process has closed for good. Never blocks.
    fn poll(&mut self) -> Result<Option<RawSample>, MonitorError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The last non-fatal decode/read error, if any.
    fn error(&self) -> Option<String>;

    /// Stop producing samples and release any process handle. Idempotent.
    fn stop(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
