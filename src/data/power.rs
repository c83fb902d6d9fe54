//! Streaming power aggregation.
//!
//! Maintains a bounded sliding window and a running peak per power channel,
//! turning the per-interval instantaneous Watt readings into the
//! (instant, average, peak) triples the dashboard displays.

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::MonitorError;

/// The three independently aggregated power channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerChannel {
    Cpu,
    Gpu,
    Combined,
}

/// One aggregated power observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerReading {
    pub instant_w: f64,
    /// Arithmetic mean over the channel's current window contents.
    pub average_w: f64,
    /// Running peak, non-decreasing for the life of the process.
    pub peak_w: f64,
}

#[derive(Debug, Default)]
struct ChannelState {
    window: VecDeque<f64>,
    peak_w: f64,
}

impl ChannelState {
    fn observe(&mut self, capacity: usize, watts: f64) -> PowerReading {
        if self.window.len() == capacity {
            self.window.pop_front();
        }
        self.window.push_back(watts);
        self.peak_w = self.peak_w.max(watts);

        let average_w = self.window.iter().sum::<f64>() / self.window.len() as f64;
        PowerReading {
            instant_w: watts,
            average_w,
            peak_w: self.peak_w,
        }
    }
}

/// Sliding-window averages and running peaks for the three power channels.
///
/// Owned by one `App` instance for the life of the process; the window
/// capacity is fixed at startup. Windows start empty and fill gradually,
/// which is expected during the first averaging period.
#[derive(Debug)]
pub struct PowerAggregator {
    capacity: usize,
    cpu: ChannelState,
    gpu: ChannelState,
    combined: ChannelState,
}

impl PowerAggregator {
    /// Size the windows from the averaging duration and the sampling interval.
    ///
    /// Capacity is `averaging_window / sampling_interval`, and must come out
    /// to at least 1 (an averaging window no shorter than the interval).
    pub fn new(
        averaging_window: Duration,
        sampling_interval: Duration,
    ) -> Result<Self, MonitorError> {
        if sampling_interval.is_zero() {
            return Err(MonitorError::AggregationState(
                "sampling interval is zero".to_string(),
            ));
        }
        let capacity =
            (averaging_window.as_secs_f64() / sampling_interval.as_secs_f64()) as usize;
        Self::with_capacity(capacity)
    }

    /// Construct with an explicit window capacity.
    pub fn with_capacity(capacity: usize) -> Result<Self, MonitorError> {
        if capacity == 0 {
            return Err(MonitorError::AggregationState(
                "averaging window is shorter than the sampling interval".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            cpu: ChannelState::default(),
            gpu: ChannelState::default(),
            combined: ChannelState::default(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record one instantaneous Watt reading on a channel.
    ///
    /// Appends to the channel's window (evicting the oldest value at
    /// capacity) and returns the window average plus the updated peak.
    /// Channels are independent; there is no cross-channel ordering.
    pub fn observe(&mut self, channel: PowerChannel, watts: f64) -> PowerReading {
        let state = match channel {
            PowerChannel::Cpu => &mut self.cpu,
            PowerChannel::Gpu => &mut self.gpu,
            PowerChannel::Combined => &mut self.combined,
        };
        state.observe(self.capacity, watts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_is_its_own_average_and_peak() {
        let mut agg = PowerAggregator::with_capacity(30).unwrap();

        let reading = agg.observe(PowerChannel::Cpu, 5.0);
        assert_eq!(reading.instant_w, 5.0);
        assert_eq!(reading.average_w, 5.0);
        assert_eq!(reading.peak_w, 5.0);
    }

    #[test]
    fn test_window_eviction_at_capacity() {
        let mut agg = PowerAggregator::with_capacity(3).unwrap();

        agg.observe(PowerChannel::Cpu, 9.0);
        agg.observe(PowerChannel::Cpu, 3.0);
        agg.observe(PowerChannel::Cpu, 3.0);
        // Fourth observation evicts the 9.0; average reflects only the
        // most recent three values.
        let reading = agg.observe(PowerChannel::Cpu, 3.0);
        assert_eq!(reading.average_w, 3.0);
        // The peak remembers the evicted value.
        assert_eq!(reading.peak_w, 9.0);
    }

    #[test]
    fn test_average_never_exceeds_peak_and_peak_is_monotonic() {
        let mut agg = PowerAggregator::with_capacity(4).unwrap();

        let values = [0.5, 7.2, 3.3, 0.0, 12.8, 1.1, 1.1, 0.2];
        let mut last_peak = 0.0_f64;
        for watts in values {
            let reading = agg.observe(PowerChannel::Combined, watts);
            assert!(reading.average_w <= reading.peak_w);
            assert!(reading.peak_w >= last_peak);
            last_peak = reading.peak_w;
        }
        assert_eq!(last_peak, 12.8);
    }

    #[test]
    fn test_capacity_one_degenerates_to_instantaneous() {
        let mut agg = PowerAggregator::with_capacity(1).unwrap();

        agg.observe(PowerChannel::Gpu, 10.0);
        let reading = agg.observe(PowerChannel::Gpu, 2.0);
        assert_eq!(reading.average_w, 2.0);
        assert_eq!(reading.peak_w, 10.0);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut agg = PowerAggregator::with_capacity(2).unwrap();

        agg.observe(PowerChannel::Cpu, 100.0);
        let gpu = agg.observe(PowerChannel::Gpu, 1.0);
        assert_eq!(gpu.average_w, 1.0);
        assert_eq!(gpu.peak_w, 1.0);
    }

    #[test]
    fn test_capacity_from_durations() {
        let agg =
            PowerAggregator::new(Duration::from_secs(30), Duration::from_secs(1)).unwrap();
        assert_eq!(agg.capacity(), 30);

        // Averaging window equal to the interval is the valid degenerate case.
        let agg =
            PowerAggregator::new(Duration::from_secs(2), Duration::from_secs(2)).unwrap();
        assert_eq!(agg.capacity(), 1);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err =
            PowerAggregator::new(Duration::from_secs(1), Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, MonitorError::AggregationState(_)));

        assert!(PowerAggregator::with_capacity(0).is_err());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err =
            PowerAggregator::new(Duration::from_secs(30), Duration::ZERO).unwrap_err();
        assert!(matches!(err, MonitorError::AggregationState(_)));
    }
}
