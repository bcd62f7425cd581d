//! Output Formatting
//!
//! Terminal summary of a run: results grouped by system with status icons
//! (✓/✗/⊘), per-phase means for passed configurations, then totals and the
//! location of the phase tables.

use super::report::is_statement_wide;
use std::collections::BTreeMap;
use zkbench_report::{ConfigResult, Report, RunStatus};

/// Format a report for terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("zkbench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    let mut systems: BTreeMap<&str, Vec<&ConfigResult>> = BTreeMap::new();
    for result in &report.results {
        systems.entry(&result.system).or_default().push(result);
    }

    for (system, results) in systems {
        output.push_str(&format!("System: {}\n", system));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for result in results {
            let status_icon = match result.status {
                RunStatus::Passed => "✓",
                RunStatus::Failed => "✗",
                RunStatus::Skipped => "⊘",
            };

            let name = if !result.label.is_empty() {
                result.label.clone()
            } else if is_statement_wide(&result.config) {
                format!("{} (all configurations)", result.statement)
            } else {
                format!("{} [{}]", result.statement, result.config)
            };
            output.push_str(&format!("  {} {}\n", status_icon, name));

            for phase in &result.phases {
                output.push_str(&format!(
                    "      {:<8} cpu: {} s (sd {})  wall: {} s (sd {})  mem: {} B\n",
                    phase.phase.as_str(),
                    phase.cputime.mean,
                    phase.cputime.std_dev,
                    phase.walltime.mean,
                    phase.walltime.std_dev,
                    phase.memory.mean,
                ));
            }

            if let Some(failure) = &result.failure {
                output.push_str(&format!("      {}: {}\n", failure.kind, failure.message));
            }
        }
        output.push('\n');
    }

    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Passed: {}  Failed: {}  Unsupported: {}  Invalid (skipped): {}\n",
        report.summary.total,
        report.summary.passed,
        report.summary.failed,
        report.summary.unsupported,
        report.summary.skipped_invalid
    ));
    output.push_str(&format!(
        "  Repeats: {}  Isolation: {}\n",
        report.meta.config.repeats, report.meta.config.isolation
    ));
    output.push_str(&format!(
        "  Tables: {}/csv\n",
        report.meta.config.results_dir
    ));
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::build_report_meta;
    use rust_decimal::Decimal;
    use zkbench_core::{Phase, ResolvedConfiguration};
    use zkbench_report::{FailureInfo, ReportConfig, ReportSummary};
    use zkbench_stats::{PhaseStatistics, SummaryStatistics};

    fn stat(mean: i64) -> SummaryStatistics {
        SummaryStatistics {
            mean: Decimal::from(mean),
            std_dev: Decimal::ZERO,
            sample_count: 2,
        }
    }

    #[test]
    fn test_format_groups_by_system() {
        let meta = build_report_meta(ReportConfig {
            repeats: 2,
            isolation: "sandbox".to_string(),
            results_dir: "/tmp/results".to_string(),
        });
        let report = Report {
            meta,
            results: vec![
                ConfigResult {
                    system: "zokrates".to_string(),
                    statement: "hash/mimc".to_string(),
                    label: "mimc.zok/ark/g16/bn254".to_string(),
                    config: ResolvedConfiguration::new(),
                    status: RunStatus::Passed,
                    phases: vec![PhaseStatistics {
                        phase: Phase::Prove,
                        cputime: stat(3),
                        walltime: stat(4),
                        memory: stat(1024),
                    }],
                    failure: None,
                },
                ConfigResult {
                    system: "gnark".to_string(),
                    statement: "hash/sha256".to_string(),
                    label: String::new(),
                    config: ResolvedConfiguration::new(),
                    status: RunStatus::Skipped,
                    phases: Vec::new(),
                    failure: Some(FailureInfo {
                        kind: "unsupported-statement".to_string(),
                        message: "gnark does not support statement hash/sha256".to_string(),
                    }),
                },
            ],
            summary: ReportSummary {
                total: 2,
                passed: 1,
                unsupported: 1,
                ..Default::default()
            },
        };

        let output = format_human_output(&report);
        assert!(output.contains("System: gnark"));
        assert!(output.contains("✓ mimc.zok/ark/g16/bn254"));
        assert!(output.contains("prove    cpu: 3 s"));
        assert!(output.contains("⊘ hash/sha256 (all configurations)"));
        assert!(output.contains("Tables: /tmp/results/csv"));
        // BTreeMap grouping puts gnark first
        assert!(output.find("gnark").unwrap() < output.find("zokrates").unwrap());
    }
}
