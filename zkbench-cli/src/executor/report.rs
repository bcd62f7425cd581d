//! Report Building
//!
//! ```text
//! executed ConfigResults ──┐
//!                          ├──▶ Report { meta, results, summary }
//! plan.rejected ───────────┘
//!   unsupported statement ──▶ skipped
//!   anything else ──────────▶ failed
//! ```

use crate::planner::ExecutionPlan;
use zkbench_core::ResolvedConfiguration;
use zkbench_report::{ConfigResult, FailureInfo, Report, ReportMeta, ReportSummary, RunStatus};

/// Merge executed and rejected configurations into a report
pub fn build_report(
    meta: ReportMeta,
    plan: &ExecutionPlan<'_>,
    executed: Vec<ConfigResult>,
    total_duration_ms: f64,
) -> Report {
    let mut results = executed;
    results.extend(plan.rejected.iter().map(|rejected| ConfigResult {
        system: rejected.system.to_string(),
        statement: rejected.statement.to_string(),
        label: String::new(),
        config: rejected.config.clone(),
        status: if rejected.unsupported {
            RunStatus::Skipped
        } else {
            RunStatus::Failed
        },
        phases: Vec::new(),
        failure: Some(FailureInfo {
            kind: rejected.kind.to_string(),
            message: rejected.message.clone(),
        }),
    }));

    let count = |status: RunStatus| results.iter().filter(|r| r.status == status).count();
    let summary = ReportSummary {
        total: results.len(),
        passed: count(RunStatus::Passed),
        failed: count(RunStatus::Failed),
        skipped_invalid: plan.invalid,
        unsupported: count(RunStatus::Skipped),
        total_duration_ms,
    };

    Report {
        meta,
        results,
        summary,
    }
}

/// Whether a rejected entry stands for a whole statement rather than one configuration
pub(crate) fn is_statement_wide(config: &ResolvedConfiguration) -> bool {
    config.is_empty()
}
