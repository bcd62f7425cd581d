//! Summary Statistics
//!
//! `mean = Σx / n` and the population form `sd = sqrt(Σ(x - mean)² / n)`.
//! A single sample has a standard deviation of exactly zero.

use crate::StatsError;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

/// Mean and spread of one metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Arithmetic mean
    pub mean: Decimal,
    /// Population standard deviation
    pub std_dev: Decimal,
    /// Number of samples
    pub sample_count: usize,
}

/// Compute mean and population standard deviation
pub fn compute_summary(samples: &[Decimal]) -> Result<SummaryStatistics, StatsError> {
    if samples.is_empty() {
        return Ok(SummaryStatistics::default());
    }

    let n = Decimal::from(samples.len());
    let mean = samples
        .iter()
        .try_fold(Decimal::ZERO, |acc, x| acc.checked_add(*x))
        .and_then(|sum| sum.checked_div(n))
        .ok_or(StatsError::Overflow("mean"))?;

    let std_dev = if samples.len() < 2 {
        Decimal::ZERO
    } else {
        let variance = samples
            .iter()
            .try_fold(Decimal::ZERO, |acc, x| {
                let d = x.checked_sub(mean)?;
                acc.checked_add(d.checked_mul(d)?)
            })
            .and_then(|squares| squares.checked_div(n))
            .ok_or(StatsError::Overflow("standard deviation"))?;
        variance.sqrt().unwrap_or(Decimal::ZERO)
    };

    Ok(SummaryStatistics {
        mean: mean.normalize(),
        std_dev: std_dev.normalize(),
        sample_count: samples.len(),
    })
}
