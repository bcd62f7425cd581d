//! Repeat Accumulation
//!
//! ```text
//! repeat 1: compile ─┬─ Σ per phase ─┐
//! repeat 2: compile ─┤               ├─▶ mean / sd per phase and metric
//! repeat N: ...     ─┘               ┘
//! ```
//!
//! Within a repeat, the metrics of every command of a phase are summed.
//! Across repeats, the sums are summarized. A repeat only counts once it
//! has been committed, so a config that fails midway leaves nothing behind.

use crate::StatsError;
use crate::summary::{SummaryStatistics, compute_summary};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zkbench_core::{Metric, Phase, RunMetrics};

/// Statistics of one phase across all repeats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStatistics {
    /// Phase
    pub phase: Phase,
    /// CPU seconds
    pub cputime: SummaryStatistics,
    /// Wall-clock seconds
    pub walltime: SummaryStatistics,
    /// Peak memory bytes
    pub memory: SummaryStatistics,
}

impl PhaseStatistics {
    /// Statistics of one metric
    pub fn get(&self, metric: Metric) -> &SummaryStatistics {
        match metric {
            Metric::CpuTime => &self.cputime,
            Metric::WallTime => &self.walltime,
            Metric::Memory => &self.memory,
        }
    }
}

/// Per-phase sums of a single repeat
#[derive(Debug, Clone)]
pub struct RepeatSample {
    sums: BTreeMap<Phase, RunMetrics>,
}

impl RepeatSample {
    /// Add the metrics of one command
    pub fn add(&mut self, phase: Phase, metrics: RunMetrics) -> Result<(), StatsError> {
        let sum = self.sums.entry(phase).or_insert(RunMetrics::ZERO);
        *sum = sum
            .checked_add(metrics)
            .ok_or(StatsError::Overflow("phase sum"))?;
        Ok(())
    }

    /// Sum for a phase so far
    pub fn total(&self, phase: Phase) -> Option<RunMetrics> {
        self.sums.get(&phase).copied()
    }
}

/// Collects committed repeats of one configuration
#[derive(Debug, Clone)]
pub struct RepeatAccumulator {
    phases: Vec<Phase>,
    repeats: Vec<BTreeMap<Phase, RunMetrics>>,
}

impl RepeatAccumulator {
    /// Accumulator for a sequence touching `phases`
    pub fn new(phases: impl IntoIterator<Item = Phase>) -> Self {
        let mut phases: Vec<Phase> = phases.into_iter().collect();
        phases.sort();
        phases.dedup();
        Self {
            phases,
            repeats: Vec::new(),
        }
    }

    /// Phases reported by `finish`
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Start a repeat with every phase at zero
    pub fn sample(&self) -> RepeatSample {
        RepeatSample {
            sums: self.phases.iter().map(|p| (*p, RunMetrics::ZERO)).collect(),
        }
    }

    /// Record a fully successful repeat
    pub fn commit(&mut self, sample: RepeatSample) {
        self.repeats.push(sample.sums);
    }

    /// Number of committed repeats
    pub fn repeat_count(&self) -> usize {
        self.repeats.len()
    }

    /// Mean and standard deviation per phase, in phase order
    pub fn finish(&self) -> Result<Vec<PhaseStatistics>, StatsError> {
        self.phases
            .iter()
            .map(|&phase| {
                let column = |metric: Metric| -> Vec<Decimal> {
                    self.repeats
                        .iter()
                        .map(|r| r.get(&phase).copied().unwrap_or(RunMetrics::ZERO).get(metric))
                        .collect()
                };
                Ok(PhaseStatistics {
                    phase,
                    cputime: compute_summary(&column(Metric::CpuTime))?,
                    walltime: compute_summary(&column(Metric::WallTime))?,
                    memory: compute_summary(&column(Metric::Memory))?,
                })
            })
            .collect()
    }
}
