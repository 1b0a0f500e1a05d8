//! Percentile computation over sorted samples.

use serde::{Deserialize, Serialize};

/// Fixed percentile set reported with every summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Percentiles {
    /// Compute the standard set from ascending-sorted samples.
    pub fn from_sorted(sorted: &[f64]) -> Self {
        Self {
            p5: percentile_sorted(sorted, 5.0),
            p25: percentile_sorted(sorted, 25.0),
            p50: percentile_sorted(sorted, 50.0),
            p75: percentile_sorted(sorted, 75.0),
            p95: percentile_sorted(sorted, 95.0),
            p99: percentile_sorted(sorted, 99.0),
        }
    }

    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.p75 - self.p25
    }
}

/// R-7 percentile (linear interpolation between order statistics).
///
/// `sorted` must be ascending; `percentile` is in `[0, 100]`. Returns 0.0 for
/// an empty slice.
pub fn percentile_sorted(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let p = (percentile / 100.0).clamp(0.0, 1.0);
    let h = p * (n - 1) as f64;
    let lower = h.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let fraction = h - lower as f64;

    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// Sort a copy of `samples` ascending.
pub(crate) fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}
