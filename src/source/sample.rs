//! Shared types for raw telemetry samples.
//!
//! These types match the decoded form of one sampler reading. They serve as
//! the common data format between the sampler producer and this monitor
//! consumer. Field layout follows the sampler's per-interval record: a
//! processor section with per-cluster/per-core utilization and accumulated
//! energy counters, plus a GPU section.

use serde::{Deserialize, Serialize};

/// One complete raw reading from the sampler.
///
/// `timestamp` is a monotonically non-decreasing identifier of the sampling
/// instant (epoch milliseconds). The sampler may re-deliver the same reading
/// before a new one is ready, so timestamps are used for de-duplication
/// downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSample {
    pub timestamp: u64,

    /// Coarse throttling indicator. `"Nominal"` means not throttled; any
    /// other value means the SoC is under thermal pressure.
    pub thermal_pressure: String,

    pub processor: ProcessorSample,

    pub gpu: GpuSample,
}

/// The processor section of a raw sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorSample {
    /// Core clusters in sampler order. Topology varies by chip variant:
    /// either one unified `E-Cluster`/`P-Cluster` pair, or split
    /// sub-clusters (`E0-Cluster`, `P0-Cluster`, ...) on multi-die parts.
    pub clusters: Vec<ClusterSample>,

    /// Energy accumulated over the sampling interval, in millijoules.
    pub ane_energy: f64,
    pub cpu_energy: f64,
    pub gpu_energy: f64,
}

/// Utilization for one core cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSample {
    pub name: String,
    pub freq_hz: f64,
    /// Fraction of the interval the cluster spent idle, in [0, 1].
    pub idle_ratio: f64,
    pub cpus: Vec<CoreSample>,
}

/// Utilization for one core within a cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreSample {
    /// Global core index as reported by the sampler.
    pub cpu: u32,
    pub freq_hz: f64,
    pub idle_ratio: f64,
}

/// The GPU section of a raw sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuSample {
    /// The sampler reports this field in MHz despite the key name.
    pub freq_hz: f64,
    pub idle_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sample() {
        let json = r#"{
            "timestamp": 1700000000000,
            "thermal_pressure": "Nominal",
            "processor": {
                "clusters": [
                    {
                        "name": "E-Cluster",
                        "freq_hz": 2000000000.0,
                        "idle_ratio": 0.4,
                        "cpus": [
                            { "cpu": 0, "freq_hz": 1800000000.0, "idle_ratio": 0.5 },
                            { "cpu": 1, "freq_hz": 2000000000.0, "idle_ratio": 0.3 }
                        ]
                    }
                ],
                "ane_energy": 120.0,
                "cpu_energy": 5000.0,
                "gpu_energy": 2500.0
            },
            "gpu": { "freq_hz": 1296.0, "idle_ratio": 0.8 }
        }"#;

        let sample: RawSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.timestamp, 1_700_000_000_000);
        assert_eq!(sample.thermal_pressure, "Nominal");
        assert_eq!(sample.processor.clusters.len(), 1);

        let cluster = &sample.processor.clusters[0];
        assert_eq!(cluster.name, "E-Cluster");
        assert_eq!(cluster.cpus.len(), 2);
        assert_eq!(cluster.cpus[1].cpu, 1);

        assert_eq!(sample.processor.cpu_energy, 5000.0);
        assert_eq!(sample.gpu.idle_ratio, 0.8);
    }

    #[test]
    fn test_deserialize_missing_field_is_an_error() {
        // No processor section at all: the decode step rejects it before the
        // normalizer ever sees it.
        let json = r#"{ "timestamp": 1, "thermal_pressure": "Nominal" }"#;
        assert!(serde_json::from_str::<RawSample>(json).is_err());
    }
}
