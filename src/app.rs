//! Application state and the update loop.
//!
//! `App` owns the sample source, the aggregator and the latest display
//! bundle. One `tick()` performs one non-blocking dequeue: de-duplicates by
//! timestamp, normalizes, aggregates and stores the result for rendering.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::data::{
    normalize, power_percent, PowerAggregator, PowerChannel, PowerHistory, PowerReading,
    SocMetrics,
};
use crate::source::SampleSource;
use crate::system::{MemoryMetrics, MemoryReader, SocInfo};
use crate::ui::Theme;

/// Update loop state.
///
/// `AwaitingFirstSample` only establishes the timestamp baseline; display and
/// aggregation start with the second distinct reading. Termination is
/// cooperative and idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingFirstSample,
    Polling,
    Terminating,
    Stopped,
}

/// The full bundle handed to the presentation layer, one per accepted sample.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub soc: SocMetrics,
    pub memory: MemoryMetrics,
    pub cpu_power: PowerReading,
    pub gpu_power: PowerReading,
    pub combined_power: PowerReading,
    /// ANE draw over the interval, in Watts. Not windowed; the ANE gauge
    /// shows the instantaneous value only.
    pub ane_w: f64,
    pub throttling: bool,
    pub last_updated: Instant,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub state: LoopState,
    pub show_help: bool,
    pub show_cores: bool,

    // Collaborators
    source: Box<dyn SampleSource>,
    memory: MemoryReader,
    aggregator: PowerAggregator,

    pub soc: SocInfo,
    sampling_interval: Duration,
    last_timestamp: Option<u64>,

    // Display state
    pub data: Option<TelemetryData>,
    pub history: PowerHistory,
    pub load_error: Option<String>,
    pub theme: Theme,
}

impl App {
    /// Create a new App with the given source and aggregator.
    pub fn new(
        source: Box<dyn SampleSource>,
        soc: SocInfo,
        aggregator: PowerAggregator,
        sampling_interval: Duration,
        show_cores: bool,
    ) -> Self {
        Self {
            running: true,
            state: LoopState::AwaitingFirstSample,
            show_help: false,
            show_cores,
            source,
            memory: MemoryReader::new(),
            aggregator,
            soc,
            sampling_interval,
            last_timestamp: None,
            data: None,
            history: PowerHistory::new(),
            load_error: None,
            theme: Theme::auto_detect(),
        }
    }

    /// Returns a description of the current sample source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Perform one update-loop iteration: a single non-blocking dequeue.
    ///
    /// Returns `Ok(true)` when a new display bundle was produced. Stale and
    /// malformed samples are dropped without touching aggregator state. The
    /// only error is a source that has closed for good, which is fatal to
    /// the loop.
    pub fn tick(&mut self) -> Result<bool> {
        if matches!(self.state, LoopState::Terminating | LoopState::Stopped) {
            return Ok(false);
        }

        self.load_error = self.source.error();

        let Some(sample) = self.source.poll()? else {
            return Ok(false);
        };

        if self.state == LoopState::AwaitingFirstSample {
            // Baseline only: windows stay empty and fill from the next
            // distinct reading onwards.
            self.last_timestamp = Some(sample.timestamp);
            self.state = LoopState::Polling;
            info!(timestamp = sample.timestamp, "first sample received");
            return Ok(false);
        }

        if Some(sample.timestamp) <= self.last_timestamp {
            // The sampler re-delivered an old reading; only strictly newer
            // timestamps are processed.
            debug!(timestamp = sample.timestamp, "dropping stale sample");
            return Ok(false);
        }

        let soc_metrics = match normalize(&sample) {
            Ok(metrics) => metrics,
            Err(e) => {
                // Recovered locally: the sample is dropped and the baseline
                // is left untouched so a corrected reading with the same
                // timestamp is not mistaken for a duplicate.
                warn!(error = %e, "dropping malformed sample");
                self.load_error = Some(e.to_string());
                return Ok(false);
            }
        };
        self.last_timestamp = Some(sample.timestamp);

        // Joules accumulated over one interval -> average Watts for it.
        let secs = self.sampling_interval.as_secs_f64();
        let cpu_power = self
            .aggregator
            .observe(PowerChannel::Cpu, soc_metrics.cpu_j / secs);
        let gpu_power = self
            .aggregator
            .observe(PowerChannel::Gpu, soc_metrics.gpu_j / secs);
        let combined_power = self
            .aggregator
            .observe(PowerChannel::Combined, soc_metrics.combined_j / secs);
        let ane_w = soc_metrics.ane_j / secs;

        self.history.record(
            power_percent(cpu_power.instant_w, self.soc.cpu_max_power),
            power_percent(gpu_power.instant_w, self.soc.gpu_max_power),
        );

        self.data = Some(TelemetryData {
            soc: soc_metrics,
            memory: self.memory.read(),
            cpu_power,
            gpu_power,
            combined_power,
            ane_w,
            throttling: sample.thermal_pressure != "Nominal",
            last_updated: Instant::now(),
        });

        Ok(true)
    }

    /// Toggle the per-core gauges.
    pub fn toggle_cores(&mut self) {
        self.show_cores = !self.show_cores;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Stop the sample source and release its process handle.
    ///
    /// Idempotent: a second call while terminating or after stopping is a
    /// no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.state == LoopState::Stopped {
            return Ok(());
        }
        self.state = LoopState::Terminating;
        let result = self.source.stop();
        self.state = LoopState::Stopped;
        result
    }
}
