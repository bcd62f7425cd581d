//! Resource Report Parsing
//!
//! `runexec` prints one `key=value` pair per line after the measured tool
//! exits:
//!
//! ```text
//! starttime=2024-01-01T12:00:00.000000+00:00
//! returnvalue=0
//! walltime=2.0123s
//! cputime=1.9876s
//! memory=52428800B
//! ```
//!
//! Time and memory values end in a one-character unit suffix which is
//! stripped before parsing as a decimal. A report is only accepted when
//! `cputime`, `walltime` and `memory` each appear exactly once.

use crate::error::RunError;
use rust_decimal::Decimal;
use std::str::FromStr;
use zkbench_core::{Metric, RunMetrics};

/// Keys that carry no information the harness uses
const IGNORED_KEYS: [&str; 3] = ["starttime", "blkio-read", "blkio-write"];

/// Incremental report parser, fed one line at a time
#[derive(Debug, Default)]
pub struct ReportParser {
    values: [Option<Decimal>; 3],
    counts: [u32; 3],
}

fn slot(metric: Metric) -> usize {
    match metric {
        Metric::CpuTime => 0,
        Metric::WallTime => 1,
        Metric::Memory => 2,
    }
}

/// `cputime-cpu<N>`: per-core CPU time
fn is_per_core_cputime(key: &str) -> bool {
    key.strip_prefix("cputime-cpu")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

impl ReportParser {
    /// Create an empty parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line of the report.
    ///
    /// Fails fast on the first line that signals a failed run or breaks the grammar.
    pub fn feed_line(&mut self, line: &str) -> Result<(), RunError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(());
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| RunError::malformed(line, "expected key=value"))?;
        if key.is_empty() || value.is_empty() {
            return Err(RunError::malformed(line, "empty key or value"));
        }

        match key {
            "cputime" => self.record(Metric::CpuTime, line, value),
            "walltime" => self.record(Metric::WallTime, line, value),
            "memory" => self.record(Metric::Memory, line, value),
            "returnvalue" => {
                let code: i32 = value
                    .parse()
                    .map_err(|_| RunError::malformed(line, "return value is not an integer"))?;
                if code != 0 {
                    return Err(RunError::NonZeroExit { code });
                }
                Ok(())
            }
            "terminationreason" => Err(RunError::SandboxTermination {
                reason: value.to_string(),
            }),
            "exitsignal" => {
                let signal: i32 = value
                    .parse()
                    .map_err(|_| RunError::malformed(line, "exit signal is not an integer"))?;
                Err(RunError::SignalTermination { signal })
            }
            k if IGNORED_KEYS.contains(&k) || is_per_core_cputime(k) => {
                tracing::trace!("ignoring report key {}", k);
                Ok(())
            }
            _ => Err(RunError::malformed(line, "unknown key")),
        }
    }

    fn record(&mut self, metric: Metric, line: &str, value: &str) -> Result<(), RunError> {
        // Drop the unit suffix (`s`, `B`)
        let mut chars = value.chars();
        chars.next_back();
        let number = chars.as_str();
        if number.is_empty() {
            return Err(RunError::malformed(line, "value has no digits before its unit"));
        }

        let parsed = Decimal::from_str(number)
            .map_err(|e| RunError::malformed(line, format!("not a decimal: {}", e)))?;

        let index = slot(metric);
        self.values[index] = Some(parsed);
        self.counts[index] += 1;
        Ok(())
    }

    /// Finish parsing and return the complete record
    pub fn finish(self) -> Result<RunMetrics, RunError> {
        let mut missing = Vec::new();
        let mut duplicated = Vec::new();
        for metric in Metric::ALL {
            match self.counts[slot(metric)] {
                0 => missing.push(metric.as_str()),
                1 => {}
                _ => duplicated.push(metric.as_str()),
            }
        }

        if !missing.is_empty() || !duplicated.is_empty() {
            let mut problems = Vec::new();
            if !missing.is_empty() {
                problems.push(format!("missing {}", missing.join(", ")));
            }
            if !duplicated.is_empty() {
                problems.push(format!("duplicated {}", duplicated.join(", ")));
            }
            return Err(RunError::IncompleteReport(problems.join("; ")));
        }

        let value = |metric: Metric| self.values[slot(metric)].unwrap_or_default();
        Ok(RunMetrics::new(
            value(Metric::CpuTime),
            value(Metric::WallTime),
            value(Metric::Memory),
        ))
    }
}

/// Parse a complete report
pub fn parse_report(text: &str) -> Result<RunMetrics, RunError> {
    let mut parser = ReportParser::new();
    for line in text.lines() {
        parser.feed_line(line)?;
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_basic_report() {
        let metrics =
            parse_report("cputime=1.5s\nwalltime=2.0s\nmemory=1024B\nreturnvalue=0").unwrap();

        assert_eq!(metrics.cputime, dec("1.5"));
        assert_eq!(metrics.walltime, dec("2.0"));
        assert_eq!(metrics.memory, dec("1024"));
    }

    #[test]
    fn test_ignored_keys_and_blank_lines() {
        let report = "\nstarttime=2024-01-01T00:00:00+00:00\n\
                      cputime=0.25s\ncputime-cpu0=0.20s\ncputime-cpu13=0.05s\n\
                      blkio-read=0B\nblkio-write=4096B\n\n\
                      walltime=0.5s\nmemory=2048B\nreturnvalue=0\n";
        let metrics = parse_report(report).unwrap();
        assert_eq!(metrics.cputime, dec("0.25"));
        assert_eq!(metrics.memory, dec("2048"));
    }

    #[test]
    fn test_values_keep_full_precision() {
        let metrics = parse_report(
            "cputime=0.000000000000000000000001s\nwalltime=12345678901234567890.5s\nmemory=1B",
        )
        .unwrap();
        assert_eq!(metrics.cputime, dec("0.000000000000000000000001"));
        assert_eq!(metrics.walltime, dec("12345678901234567890.5"));
    }

    #[test]
    fn test_non_zero_return_value() {
        let err = parse_report("cputime=1s\nwalltime=1s\nmemory=1B\nreturnvalue=1").unwrap_err();
        assert!(matches!(err, RunError::NonZeroExit { code: 1 }));
    }

    #[test]
    fn test_termination_reason() {
        let err = parse_report("terminationreason=timeout\ncputime=1s").unwrap_err();
        assert!(matches!(err, RunError::SandboxTermination { ref reason } if reason == "timeout"));
    }

    #[test]
    fn test_exit_signal() {
        let err = parse_report("exitsignal=9").unwrap_err();
        assert!(matches!(err, RunError::SignalTermination { signal: 9 }));
    }

    #[test]
    fn test_missing_memory_is_incomplete() {
        let err = parse_report("cputime=1.5s\nwalltime=2.0s\nreturnvalue=0").unwrap_err();
        match err {
            RunError::IncompleteReport(msg) => assert!(msg.contains("memory")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_metric_is_incomplete() {
        let err = parse_report("cputime=1s\ncputime=2s\nwalltime=1s\nmemory=1B").unwrap_err();
        match err {
            RunError::IncompleteReport(msg) => assert!(msg.contains("duplicated cputime")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_key_is_malformed() {
        let err = parse_report("cpuenergy=12J").unwrap_err();
        assert!(matches!(err, RunError::MalformedReport { .. }));

        // Only numeric core suffixes are ignored
        assert!(parse_report("cputime-cpuX=1s").is_err());
    }

    #[test]
    fn test_bad_lines_are_malformed() {
        for line in ["no separator", "=1s", "cputime=", "cputime=s", "cputime=abcs", "returnvalue=x"] {
            let mut parser = ReportParser::new();
            assert!(
                matches!(parser.feed_line(line), Err(RunError::MalformedReport { .. })),
                "{line} should be malformed"
            );
        }
    }

    #[test]
    fn test_incremental_feed() {
        let mut parser = ReportParser::new();
        for line in ["walltime=3s\r\n", "memory=10B\n", "cputime=2s"] {
            parser.feed_line(line).unwrap();
        }
        let metrics = parser.finish().unwrap();
        assert_eq!(metrics.walltime, dec("3"));
    }
}
