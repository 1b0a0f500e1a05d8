//! Descriptive statistics over raw timing samples.
//!
//! A [`DescriptiveSummary`] is the robust snapshot every downstream decision is
//! made from. Outlier handling is chosen by the caller through an explicit
//! [`OutlierPolicy`]; nothing here picks one silently.

mod percentile;

pub use percentile::{percentile_sorted, Percentiles};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use percentile::sorted_copy;

/// How samples outside the bulk of the distribution are treated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutlierPolicy {
    /// Keep every sample.
    None,
    /// Discard samples outside the `[low, high]` percentile bounds (percent).
    TruncatePercentiles { low: f64, high: f64 },
}

impl OutlierPolicy {
    /// Check that percentile bounds are ordered and within `[0, 100]`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            OutlierPolicy::None => Ok(()),
            OutlierPolicy::TruncatePercentiles { low, high } => {
                if !(0.0..=100.0).contains(&low) || !(0.0..=100.0).contains(&high) || low >= high
                {
                    return Err(AnalysisError::InvalidInput(format!(
                        "percentile bounds must satisfy 0 <= low < high <= 100, got [{}, {}]",
                        low, high
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Read-only summary of one sample sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveSummary {
    /// Number of samples the statistics were computed from.
    pub count: usize,
    /// Number of samples before outlier handling.
    pub raw_count: usize,
    /// Samples discarded by the outlier policy.
    pub outliers_removed: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample variance (n-1 denominator); 0 when `count == 1`.
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Percentiles,
}

impl DescriptiveSummary {
    /// Pearson's second skewness coefficient, `3 * (mean - median) / std_dev`.
    ///
    /// Zero when the samples have no spread.
    pub fn median_skewness(&self) -> f64 {
        if self.std_dev == 0.0 {
            0.0
        } else {
            3.0 * (self.mean - self.median) / self.std_dev
        }
    }
}

/// Reject empty input and anything that is not a finite, non-negative real.
pub(crate) fn validate_samples(samples: &[f64]) -> Result<()> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "sample sequence is empty".to_string(),
        ));
    }
    if let Some(bad) = samples.iter().find(|x| !x.is_finite() || **x < 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "samples must be finite and non-negative, got {}",
            bad
        )));
    }
    Ok(())
}

/// Apply `policy` to `samples`, returning the retained samples in input order.
///
/// # Errors
///
/// `InvalidInput` for empty or malformed samples, bad percentile bounds, or a
/// policy that would discard every sample.
pub fn apply_outlier_policy(samples: &[f64], policy: &OutlierPolicy) -> Result<Vec<f64>> {
    validate_samples(samples)?;
    policy.validate()?;

    match *policy {
        OutlierPolicy::None => Ok(samples.to_vec()),
        OutlierPolicy::TruncatePercentiles { low, high } => {
            let sorted = sorted_copy(samples);
            let lower = percentile_sorted(&sorted, low);
            let upper = percentile_sorted(&sorted, high);

            let kept: Vec<f64> = samples
                .iter()
                .copied()
                .filter(|x| *x >= lower && *x <= upper)
                .collect();

            if kept.is_empty() {
                return Err(AnalysisError::InvalidInput(format!(
                    "outlier policy [{}, {}] discarded every sample",
                    low, high
                )));
            }
            Ok(kept)
        }
    }
}

/// Summarize `samples` after applying `policy`.
///
/// # Errors
///
/// `InvalidInput` when the sequence is empty, contains negative or non-finite
/// values, or the policy is invalid.
pub fn summarize(samples: &[f64], policy: &OutlierPolicy) -> Result<DescriptiveSummary> {
    let kept = apply_outlier_policy(samples, policy)?;
    Ok(summarize_retained(&kept, samples.len()))
}

/// Summary of samples that already passed validation and outlier handling.
pub(crate) fn summarize_retained(kept: &[f64], raw_count: usize) -> DescriptiveSummary {
    let sorted = sorted_copy(kept);
    let n = sorted.len();

    let mean = sorted.iter().sum::<f64>() / n as f64;
    let variance = if n < 2 {
        0.0
    } else {
        sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    };
    let percentiles = Percentiles::from_sorted(&sorted);

    DescriptiveSummary {
        count: n,
        raw_count,
        outliers_removed: raw_count - n,
        mean,
        median: percentiles.p50,
        variance,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
        percentiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_one_to_five() {
        let summary = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0], &OutlierPolicy::None).unwrap();

        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.variance, 2.5);
        assert!((summary.std_dev - 1.5811).abs() < 1e-4);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.outliers_removed, 0);
    }

    #[test]
    fn test_summarize_single_sample() {
        let summary = summarize(&[7.0], &OutlierPolicy::None).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.variance, 0.0);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.median, 7.0);
    }

    #[test]
    fn test_summarize_empty() {
        let result = summarize(&[], &OutlierPolicy::None);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_summarize_rejects_negative_and_nan() {
        assert!(matches!(
            summarize(&[1.0, -2.0], &OutlierPolicy::None),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            summarize(&[1.0, f64::NAN], &OutlierPolicy::None),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_truncation_drops_spike() {
        let mut samples: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        samples.push(1000.0);
        let policy = OutlierPolicy::TruncatePercentiles {
            low: 0.0,
            high: 95.0,
        };

        let summary = summarize(&samples, &policy).unwrap();

        assert_eq!(summary.raw_count, 21);
        assert_eq!(summary.outliers_removed, 1);
        assert_eq!(summary.max, 20.0);
        assert_eq!(summary.mean, 10.5);
    }

    #[test]
    fn test_truncation_preserves_input_order() {
        let kept = apply_outlier_policy(
            &[5.0, 100.0, 1.0, 3.0, 0.0],
            &OutlierPolicy::TruncatePercentiles {
                low: 10.0,
                high: 90.0,
            },
        )
        .unwrap();
        assert_eq!(kept, vec![5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_invalid_bounds() {
        let policy = OutlierPolicy::TruncatePercentiles {
            low: 90.0,
            high: 10.0,
        };
        assert!(matches!(
            summarize(&[1.0, 2.0], &policy),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_policy_discarding_everything() {
        let policy = OutlierPolicy::TruncatePercentiles {
            low: 40.0,
            high: 60.0,
        };
        assert!(matches!(
            summarize(&[1.0, 10.0], &policy),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let samples = [3.2, 1.1, 9.7, 4.4, 4.4, 0.3];
        let policy = OutlierPolicy::TruncatePercentiles {
            low: 5.0,
            high: 95.0,
        };
        assert_eq!(
            summarize(&samples, &policy).unwrap(),
            summarize(&samples, &policy).unwrap()
        );
    }

    #[test]
    fn test_median_skewness() {
        let summary = summarize(&[1.0, 1.0, 1.0, 1.0, 20.0], &OutlierPolicy::None).unwrap();
        assert!(summary.median_skewness() > 0.5);

        let flat = summarize(&[2.0, 2.0], &OutlierPolicy::None).unwrap();
        assert_eq!(flat.median_skewness(), 0.0);
    }

    #[test]
    fn test_policy_serde_tagging() {
        let policy: OutlierPolicy =
            serde_json::from_str(r#"{"kind":"truncate_percentiles","low":5.0,"high":95.0}"#)
                .unwrap();
        assert_eq!(
            policy,
            OutlierPolicy::TruncatePercentiles {
                low: 5.0,
                high: 95.0
            }
        );
        let none: OutlierPolicy = serde_json::from_str(r#"{"kind":"none"}"#).unwrap();
        assert_eq!(none, OutlierPolicy::None);
    }
}
