//! System Metadata Collection
//!
//! - **Git**: commit and branch of the working directory
//! - **OS**: family and architecture
//! - **CPU**: model name and core count
//! - **Memory**: total RAM in GB
//!
//! CPU model and memory come from `/proc` and fall back to "Unknown" / 0
//! elsewhere.

use chrono::Utc;
use zkbench_report::{ReportConfig, ReportMeta, SystemInfo};

/// Build report metadata for a run with the given settings
pub fn build_report_meta(config: ReportConfig) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        os_version: std::env::consts::ARCH.to_string(),
        cpu: cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
        memory_gb: memory_gb().unwrap_or(0.0),
    };

    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        git_commit: git(&["rev-parse", "HEAD"]),
        git_branch: git(&["rev-parse", "--abbrev-ref", "HEAD"]),
        system,
        config,
    }
}

fn git(args: &[&str]) -> Option<String> {
    std::process::Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
}

fn cpu_model() -> Option<String> {
    let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
    content
        .lines()
        .find(|l| l.starts_with("model name"))
        .and_then(|l| l.split(':').nth(1))
        .map(|s| s.trim().to_string())
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

fn memory_gb() -> Option<f64> {
    let content = std::fs::read_to_string("/proc/meminfo").ok()?;
    content
        .lines()
        .find(|l| l.starts_with("MemTotal"))
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u64>().ok())
        .map(|kb| kb as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_carries_run_settings() {
        let meta = build_report_meta(ReportConfig {
            repeats: 3,
            isolation: "direct".to_string(),
            results_dir: "results".to_string(),
        });
        assert_eq!(meta.config.repeats, 3);
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
        assert!(meta.system.cpu_cores >= 1);
    }
}
