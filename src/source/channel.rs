//! Channel-based sample source.
//!
//! Receives raw samples via a tokio watch channel. This is the embedding
//! hook: a host application (or a test) pushes samples, and this source
//! hands the latest one to the update loop. Intermediate readings may be
//! overwritten by newer ones, which matches the monitor's semantics — only
//! strictly newer timestamps are processed anyway.

use tokio::sync::watch;

use super::{RawSample, SampleSource};
use crate::error::MonitorError;

/// A sample source that receives samples via a watch channel.
///
/// # Example
///
/// ```
/// use powerwatch::source::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<RawSample>>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<Option<RawSample>>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair for pushing samples to a ChannelSource.
    ///
    /// Returns (sender, source); the sender side publishes each new reading
    /// with `tx.send(Some(sample))`.
    pub fn create(source_description: &str) -> (watch::Sender<Option<RawSample>>, Self) {
        let (tx, rx) = watch::channel(None);
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl SampleSource for ChannelSource {
    fn poll(&mut self) -> Result<Option<RawSample>, MonitorError> {
        match self.receiver.has_changed() {
            Ok(true) => Ok(self.receiver.borrow_and_update().clone()),
            Ok(false) => Ok(None),
            // Sender dropped: the producer is gone for good.
            Err(_) => Err(MonitorError::SourceUnavailable(self.description.clone())),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{GpuSample, ProcessorSample};

    fn sample(timestamp: u64) -> RawSample {
        RawSample {
            timestamp,
            thermal_pressure: "Nominal".to_string(),
            processor: ProcessorSample {
                clusters: Vec::new(),
                ane_energy: 0.0,
                cpu_energy: 0.0,
                gpu_energy: 0.0,
            },
            gpu: GpuSample {
                freq_hz: 0.0,
                idle_ratio: 1.0,
            },
        }
    }

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Nothing published yet
        assert!(source.poll().unwrap().is_none());

        tx.send(Some(sample(7))).unwrap();

        let polled = source.poll().unwrap();
        assert_eq!(polled.unwrap().timestamp, 7);

        // No change since the last poll
        assert!(source.poll().unwrap().is_none());
    }

    #[test]
    fn test_channel_source_sender_dropped_is_unavailable() {
        let (tx, mut source) = ChannelSource::create("test");
        drop(tx);

        let err = source.poll().unwrap_err();
        assert!(matches!(err, MonitorError::SourceUnavailable(_)));
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("embedded");
        assert_eq!(source.description(), "channel: embedded");
    }
}
