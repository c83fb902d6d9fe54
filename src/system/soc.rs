//! Static chip capability query.
//!
//! Probed once at startup and never re-queried per sample: the chip name and
//! core counts size the per-core display, and the max-power figures are the
//! denominators for the power-percent charts.

use std::process::Command;

use tracing::warn;

/// Nominal ANE power ceiling, used for the ANE utilization gauge.
pub const ANE_MAX_POWER_W: f64 = 8.0;

/// Chip identity and topology, resolved once at startup.
#[derive(Debug, Clone)]
pub struct SocInfo {
    pub name: String,
    pub e_core_count: usize,
    pub p_core_count: usize,
    pub gpu_core_count: usize,
    /// Power-percent denominators for the chart scales, in Watts.
    pub cpu_max_power: f64,
    pub gpu_max_power: f64,
}

impl SocInfo {
    /// Probe the host chip, falling back to a conservative baseline profile
    /// when the probes are unavailable (non-Apple hosts, test environments).
    pub fn detect() -> Self {
        let name = sysctl_string("machdep.cpu.brand_string")
            .unwrap_or_else(|| "Apple SoC".to_string());
        let (cpu_max_power, gpu_max_power, gpu_core_count) = power_profile(&name);

        // perflevel0 = performance cores, perflevel1 = efficiency cores
        let p_core_count = sysctl_usize("hw.perflevel0.logicalcpu").unwrap_or_else(|| {
            warn!("could not probe performance core count, assuming 4");
            4
        });
        let e_core_count = sysctl_usize("hw.perflevel1.logicalcpu").unwrap_or_else(|| {
            warn!("could not probe efficiency core count, assuming 4");
            4
        });

        Self {
            name,
            e_core_count,
            p_core_count,
            // TODO: read the real count from `system_profiler SPDisplaysDataType`
            // instead of the family table.
            gpu_core_count,
            cpu_max_power,
            gpu_max_power,
        }
    }

    /// Banner string, e.g. `"Apple M1 Max (cores: 2E+8P+32GPU)"`.
    pub fn banner(&self) -> String {
        format!(
            "{} (cores: {}E+{}P+{}GPU)",
            self.name, self.e_core_count, self.p_core_count, self.gpu_core_count
        )
    }
}

/// (cpu_max_power, gpu_max_power, gpu_core_count) per chip family.
fn power_profile(name: &str) -> (f64, f64, usize) {
    if name.contains("Ultra") {
        (60.0, 120.0, 64)
    } else if name.contains("Max") {
        (30.0, 60.0, 32)
    } else if name.contains("Pro") {
        (30.0, 30.0, 16)
    } else {
        (20.0, 20.0, 8)
    }
}

fn sysctl_string(key: &str) -> Option<String> {
    let output = Command::new("sysctl").arg("-n").arg(key).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn sysctl_usize(key: &str) -> Option<usize> {
    sysctl_string(key)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_profile_families() {
        assert_eq!(power_profile("Apple M1 Ultra"), (60.0, 120.0, 64));
        assert_eq!(power_profile("Apple M1 Max"), (30.0, 60.0, 32));
        assert_eq!(power_profile("Apple M2 Pro"), (30.0, 30.0, 16));
        assert_eq!(power_profile("Apple M1"), (20.0, 20.0, 8));
        // Unknown chips land on the conservative baseline
        assert_eq!(power_profile("Apple SoC"), (20.0, 20.0, 8));
    }

    #[test]
    fn test_banner_format() {
        let soc = SocInfo {
            name: "Apple M1 Max".to_string(),
            e_core_count: 2,
            p_core_count: 8,
            gpu_core_count: 32,
            cpu_max_power: 30.0,
            gpu_max_power: 60.0,
        };
        assert_eq!(soc.banner(), "Apple M1 Max (cores: 2E+8P+32GPU)");
    }
}
