#![warn(missing_docs)]
//! zkbench Statistical Engine
//!
//! Reduces repeated runs of one configuration to per-phase statistics:
//! - Per-repeat sums of every command in the same phase
//! - Mean and population standard deviation per metric
//!
//! All arithmetic is exact decimal arithmetic; no floating point is involved.
//! Values beyond the decimal range surface as [`StatsError::Overflow`].

mod accumulator;
mod summary;

pub use accumulator::{PhaseStatistics, RepeatAccumulator, RepeatSample};
pub use summary::{SummaryStatistics, compute_summary};

use thiserror::Error;

/// Statistics that cannot be represented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StatsError {
    /// An intermediate sum or product left the decimal range
    #[error("Decimal overflow while computing the {0}")]
    Overflow(&'static str),
}
