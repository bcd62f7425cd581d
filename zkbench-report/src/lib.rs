#![warn(missing_docs)]
//! zkbench Report - Result Tables and Run Summaries
//!
//! Generates:
//! - One CSV table per phase (`compile.csv`, `setup.csv`, ...), one row per configuration
//! - JSON run report (machine-readable)

mod csv;
mod json;
mod report;

pub use csv::{CSV_HEADER, PhaseTables, format_row};
pub use json::generate_json_report;
pub use report::{
    ConfigResult, FailureInfo, Report, ReportConfig, ReportMeta, ReportSummary, RunStatus,
    SystemInfo,
};

/// Output format of the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// JSON with full schema
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
