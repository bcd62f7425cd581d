//! Resource metrics of one command run

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A measured resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// CPU time in seconds
    CpuTime,
    /// Wall-clock time in seconds
    WallTime,
    /// Peak memory in bytes
    Memory,
}

impl Metric {
    /// Every metric, in table column order
    pub const ALL: [Metric; 3] = [Metric::CpuTime, Metric::WallTime, Metric::Memory];

    /// Report key and table column suffix
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::CpuTime => "cputime",
            Metric::WallTime => "walltime",
            Metric::Memory => "memory",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete metrics record; every field is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// CPU seconds
    pub cputime: Decimal,
    /// Wall-clock seconds
    pub walltime: Decimal,
    /// Peak memory bytes
    pub memory: Decimal,
}

impl RunMetrics {
    /// All-zero record, the identity for summation
    pub const ZERO: RunMetrics = RunMetrics {
        cputime: Decimal::ZERO,
        walltime: Decimal::ZERO,
        memory: Decimal::ZERO,
    };

    /// Create a record
    pub fn new(cputime: Decimal, walltime: Decimal, memory: Decimal) -> Self {
        Self {
            cputime,
            walltime,
            memory,
        }
    }

    /// Value of one metric
    pub fn get(&self, metric: Metric) -> Decimal {
        match metric {
            Metric::CpuTime => self.cputime,
            Metric::WallTime => self.walltime,
            Metric::Memory => self.memory,
        }
    }

    /// Field-wise sum, `None` if any field overflows
    pub fn checked_add(self, rhs: RunMetrics) -> Option<RunMetrics> {
        Some(RunMetrics {
            cputime: self.cputime.checked_add(rhs.cputime)?,
            walltime: self.walltime.checked_add(rhs.walltime)?,
            memory: self.memory.checked_add(rhs.memory)?,
        })
    }
}
