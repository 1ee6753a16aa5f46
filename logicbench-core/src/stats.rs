//! Timing Statistics
//!
//! Summaries over per-pass wall-clock times, in milliseconds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("no samples to summarize")]
    NoSamples,
}

/// Summary of one case's timed passes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub samples: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub std_dev_ms: f64,
}

pub fn summarize(samples: &[f64]) -> Result<TimingSummary, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::NoSamples);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let variance = sorted.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n as f64;

    Ok(TimingSummary {
        samples: n,
        mean_ms: mean,
        median_ms: median_sorted(&sorted),
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
        std_dev_ms: variance.sqrt(),
    })
}

fn median_sorted(sorted: &[f64]) -> f64 {
    debug_assert!(!sorted.is_empty());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}
