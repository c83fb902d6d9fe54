//! Metric normalization.
//!
//! Transforms one raw sampler reading into a stable, topology-independent
//! [`SocMetrics`] record. Chips expose either a unified `E-Cluster`/`P-Cluster`
//! pair or split sub-clusters (`E0-Cluster`, `E1-Cluster`, `P0..P3-Cluster`
//! on multi-die parts); normalization reconciles both shapes so downstream
//! consumers never have to care which one the hardware reported.

use crate::error::MonitorError;
use crate::source::{ClusterSample, RawSample};

/// Normalized utilization for one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterMetrics {
    pub label: String,
    pub active_percent: u32,
    pub freq_mhz: u32,
}

/// Normalized utilization for one core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreMetrics {
    /// Global core index as reported by the sampler.
    pub index: u32,
    pub active_percent: u32,
    pub freq_mhz: u32,
}

/// One normalized metric record, produced per raw sample.
///
/// Every field is present for every supported topology: the unified
/// `e_cluster`/`p_cluster` entries are synthesized from sub-clusters when the
/// chip reports a split topology, so no optional keys leak downstream.
/// `e_cores`/`p_cores` are ordered as encountered in the raw sample; that
/// order is the canonical display order.
#[derive(Debug, Clone, PartialEq)]
pub struct SocMetrics {
    pub e_cluster: ClusterMetrics,
    pub p_cluster: ClusterMetrics,
    /// Per-cluster entries under their raw labels, in sample order.
    pub clusters: Vec<ClusterMetrics>,
    pub e_cores: Vec<CoreMetrics>,
    pub p_cores: Vec<CoreMetrics>,
    pub gpu_active_percent: u32,
    pub gpu_freq_mhz: u32,
    /// Energy over the sampling interval, in Joules. Dividing by the
    /// interval length to get Watts is the update loop's job, not ours.
    pub ane_j: f64,
    pub cpu_j: f64,
    pub gpu_j: f64,
    pub combined_j: f64,
}

/// Normalize one raw sample.
///
/// Pure function: no state, no I/O, and the same input always yields the
/// same output. The only failure path is a topology the reconciliation
/// rules don't cover, reported as [`MonitorError::MalformedSample`] naming
/// the offending key.
pub fn normalize(raw: &RawSample) -> Result<SocMetrics, MonitorError> {
    let mut clusters = Vec::with_capacity(raw.processor.clusters.len());
    let mut e_cores = Vec::new();
    let mut p_cores = Vec::new();

    for cluster in &raw.processor.clusters {
        clusters.push(ClusterMetrics {
            label: cluster.name.clone(),
            active_percent: active_percent(cluster.idle_ratio),
            freq_mhz: freq_mhz(cluster.freq_hz),
        });

        let cores = if cluster.name.starts_with('E') {
            &mut e_cores
        } else {
            &mut p_cores
        };
        for cpu in &cluster.cpus {
            cores.push(CoreMetrics {
                index: cpu.cpu,
                active_percent: active_percent(cpu.idle_ratio),
                freq_mhz: freq_mhz(cpu.freq_hz),
            });
        }
    }

    let e_cluster = reconcile(&clusters, 'E')?;
    let p_cluster = reconcile(&clusters, 'P')?;

    let ane_j = raw.processor.ane_energy / 1000.0;
    let cpu_j = raw.processor.cpu_energy / 1000.0;
    let gpu_j = raw.processor.gpu_energy / 1000.0;

    Ok(SocMetrics {
        e_cluster,
        p_cluster,
        clusters,
        e_cores,
        p_cores,
        gpu_active_percent: active_percent(raw.gpu.idle_ratio),
        // The sampler reports the GPU frequency field already in MHz.
        gpu_freq_mhz: raw.gpu.freq_hz.round() as u32,
        ane_j,
        cpu_j,
        gpu_j,
        combined_j: ane_j + cpu_j + gpu_j,
    })
}

fn active_percent(idle_ratio: f64) -> u32 {
    ((1.0 - idle_ratio) * 100.0).round() as u32
}

fn freq_mhz(freq_hz: f64) -> u32 {
    (freq_hz / 1e6).round() as u32
}

/// Produce the unified cluster entry for the given kind (`'E'` or `'P'`).
///
/// A unified entry present in the sample passes through unchanged. Otherwise
/// one is synthesized from the sub-clusters: active% is the integer-truncated
/// arithmetic mean, frequency is the max. Split arities other than 2 (E and P)
/// or 4 (P only, the `P0..P3` multi-die shape) are rejected rather than
/// guessing a divisor.
fn reconcile(clusters: &[ClusterMetrics], kind: char) -> Result<ClusterMetrics, MonitorError> {
    let unified = format!("{}-Cluster", kind);
    if let Some(cluster) = clusters.iter().find(|c| c.label == unified) {
        return Ok(cluster.clone());
    }

    let subs: Vec<&ClusterMetrics> =
        clusters.iter().filter(|c| c.label.starts_with(kind)).collect();

    match subs.len() {
        0 => Err(MonitorError::MalformedSample(format!(
            "missing {} entry",
            unified
        ))),
        2 => Ok(synthesize(&unified, &subs)),
        4 if kind == 'P' => Ok(synthesize(&unified, &subs)),
        n => Err(MonitorError::MalformedSample(format!(
            "unrecognized {}-cluster topology: {} sub-clusters",
            kind, n
        ))),
    }
}

fn synthesize(label: &str, subs: &[&ClusterMetrics]) -> ClusterMetrics {
    let active_sum: u32 = subs.iter().map(|c| c.active_percent).sum();
    ClusterMetrics {
        label: label.to_string(),
        active_percent: active_sum / subs.len() as u32,
        freq_mhz: subs.iter().map(|c| c.freq_mhz).max().unwrap_or(0),
    }
}
