//! Error types for the monitor core.

use thiserror::Error;

/// Errors that can occur while consuming, normalizing and aggregating samples.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A raw sample was missing a required key, or exposed a cluster topology
    /// this monitor does not recognize. Recoverable: the sample is dropped
    /// and the loop continues.
    #[error("malformed sample: {0}")]
    MalformedSample(String),

    /// The sample source's queue or process handle closed unexpectedly.
    /// Fatal to the update loop.
    #[error("sample source unavailable: {0}")]
    SourceUnavailable(String),

    /// Impossible aggregator state, e.g. a zero-capacity averaging window.
    /// Prevented by startup validation.
    #[error("invalid aggregation state: {0}")]
    AggregationState(String),
}
