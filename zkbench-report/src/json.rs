//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON report
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        ConfigResult, FailureInfo, ReportConfig, ReportMeta, ReportSummary, RunStatus, SystemInfo,
    };
    use chrono::Utc;
    use zkbench_core::ResolvedConfiguration;

    #[test]
    fn test_json_report_shape() {
        let report = Report {
            meta: ReportMeta {
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                git_commit: None,
                git_branch: None,
                system: SystemInfo {
                    os: "linux".to_string(),
                    os_version: "6.1".to_string(),
                    cpu: "test".to_string(),
                    cpu_cores: 4,
                    memory_gb: 8.0,
                },
                config: ReportConfig {
                    repeats: 2,
                    isolation: "sandbox".to_string(),
                    results_dir: "results".to_string(),
                },
            },
            results: vec![ConfigResult {
                system: "gnark".to_string(),
                statement: "hash/mimc".to_string(),
                label: "mimc/bn254".to_string(),
                config: ResolvedConfiguration::from_pairs([("curve", "bn254")]),
                status: RunStatus::Failed,
                phases: Vec::new(),
                failure: Some(FailureInfo {
                    kind: "non-zero-exit".to_string(),
                    message: "Process exited with code 1".to_string(),
                }),
            }],
            summary: ReportSummary {
                total: 1,
                failed: 1,
                ..Default::default()
            },
        };

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["results"][0]["status"], "failed");
        assert_eq!(value["results"][0]["config"]["curve"], "bn254");
        assert_eq!(value["results"][0]["failure"]["kind"], "non-zero-exit");
        assert_eq!(value["summary"]["failed"], 1);
    }
}
