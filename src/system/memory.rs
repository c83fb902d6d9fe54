//! Memory metrics boundary.
//!
//! Synchronous snapshot of RAM and swap usage, read once per accepted
//! sample. Backed by `sysinfo`; the `System` handle is reused across reads.

use sysinfo::System;

const BYTES_PER_GB: f64 = (1u64 << 30) as f64;

/// One snapshot of RAM and swap usage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryMetrics {
    pub used_gb: f64,
    pub total_gb: f64,
    pub free_percent: f64,
    pub swap_used_gb: f64,
    pub swap_total_gb: f64,
}

impl MemoryMetrics {
    /// The swap section is hidden from display when swap is effectively
    /// not configured.
    pub fn swap_inactive(&self) -> bool {
        self.swap_total_gb < 0.1
    }
}

/// Reads memory metrics from the host.
pub struct MemoryReader {
    sys: System,
}

impl Default for MemoryReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryReader {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }

    /// Refresh and return the current memory metrics.
    pub fn read(&mut self) -> MemoryMetrics {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        let available = self.sys.available_memory();
        let used = total.saturating_sub(available);
        let free_percent = if total > 0 {
            available as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        MemoryMetrics {
            used_gb: bytes_to_gb(used),
            total_gb: bytes_to_gb(total),
            free_percent,
            swap_used_gb: bytes_to_gb(self.sys.used_swap()),
            swap_total_gb: bytes_to_gb(self.sys.total_swap()),
        }
    }
}

fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_gb() {
        assert_eq!(bytes_to_gb(0), 0.0);
        assert_eq!(bytes_to_gb(1 << 30), 1.0);
        assert_eq!(bytes_to_gb(3 << 29), 1.5);
    }

    #[test]
    fn test_swap_inactive_threshold() {
        let mut metrics = MemoryMetrics {
            used_gb: 8.0,
            total_gb: 16.0,
            free_percent: 50.0,
            swap_used_gb: 0.0,
            swap_total_gb: 0.05,
        };
        assert!(metrics.swap_inactive());

        metrics.swap_total_gb = 1.0;
        assert!(!metrics.swap_inactive());
    }

    #[test]
    fn test_read_produces_consistent_snapshot() {
        let mut reader = MemoryReader::new();
        let metrics = reader.read();

        assert!(metrics.total_gb >= metrics.used_gb);
        assert!((0.0..=100.0).contains(&metrics.free_percent));
    }
}
