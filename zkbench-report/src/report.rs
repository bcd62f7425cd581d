//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zkbench_core::ResolvedConfiguration;
use zkbench_stats::PhaseStatistics;

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// One entry per planned configuration
    pub results: Vec<ConfigResult>,
    /// Aggregate counts
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// zkbench version
    pub version: String,
    /// Run start (UTC)
    pub timestamp: DateTime<Utc>,
    /// Commit of the working directory, if it is a git checkout
    pub git_commit: Option<String>,
    /// Branch of the working directory
    pub git_branch: Option<String>,
    /// Host description
    pub system: SystemInfo,
    /// Effective run settings
    pub config: ReportConfig,
}

/// Run settings captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Repeats per configuration
    pub repeats: u32,
    /// `sandbox` or `direct`
    pub isolation: String,
    /// Results directory
    pub results_dir: String,
}

/// Host information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system family
    pub os: String,
    /// Kernel or OS version
    pub os_version: String,
    /// CPU model name
    pub cpu: String,
    /// Logical cores
    pub cpu_cores: u32,
    /// Installed memory
    pub memory_gb: f64,
}

/// Outcome of one planned configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResult {
    /// Integration name
    pub system: String,
    /// Statement description (`hash/mimc`)
    pub statement: String,
    /// Configuration label
    pub label: String,
    /// Resolved configuration
    pub config: ResolvedConfiguration,
    /// Outcome
    pub status: RunStatus,
    /// Statistics per phase; empty unless passed
    pub phases: Vec<PhaseStatistics>,
    /// Why the configuration did not pass
    pub failure: Option<FailureInfo>,
}

/// Configuration outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every repeat succeeded and rows were written
    Passed,
    /// A command, the toolchain or the results directory failed
    Failed,
    /// The system does not support the statement
    Skipped,
}

/// Failure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Short error kind (`non-zero-exit`, `provider-acquisition`, ...)
    pub kind: String,
    /// Full error message
    pub message: String,
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Configurations attempted
    pub total: usize,
    /// Configurations that produced rows
    pub passed: usize,
    /// Configurations that failed
    pub failed: usize,
    /// Combinations rejected by `is_valid_configuration`
    pub skipped_invalid: usize,
    /// Configurations whose statement the system does not support
    pub unsupported: usize,
    /// Wall-clock duration of the whole run
    pub total_duration_ms: f64,
}
