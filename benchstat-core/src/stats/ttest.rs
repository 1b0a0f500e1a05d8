use statrs::distribution::{ContinuousCDF, StudentsT};

use super::{require_samples, StatisticalTest, TestDetail, TestKind, TestResult};
use crate::error::Result;

/// Welch's t-test for comparing two independent samples with potentially unequal variances.
///
/// The statistic is oriented as `before - after`, so a negative t means the
/// `after` group is slower.
#[derive(Debug, Clone, Copy, Default)]
pub struct WelchTTest;

impl WelchTTest {
    fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Sample variance with Bessel's correction (n-1 denominator).
    fn variance(samples: &[f64], mean: f64) -> f64 {
        if samples.len() < 2 {
            return 0.0;
        }
        let sum_sq_diff: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
        sum_sq_diff / (samples.len() - 1) as f64
    }

    /// Calculate degrees of freedom using the Welch-Satterthwaite equation.
    ///
    /// df = (var1/n1 + var2/n2)^2 / ((var1/n1)^2/(n1-1) + (var2/n2)^2/(n2-1))
    fn welch_satterthwaite_df(var1: f64, n1: usize, var2: f64, n2: usize) -> f64 {
        let s1 = var1 / n1 as f64;
        let s2 = var2 / n2 as f64;
        let numerator = (s1 + s2).powi(2);
        let denominator = (s1.powi(2) / (n1 - 1) as f64) + (s2.powi(2) / (n2 - 1) as f64);

        if denominator == 0.0 {
            // Fallback to minimum df when variances are zero
            return (n1.min(n2) - 1) as f64;
        }

        numerator / denominator
    }
}

impl StatisticalTest for WelchTTest {
    fn analyze(&self, before: &[f64], after: &[f64]) -> Result<TestResult> {
        require_samples(TestKind::TTest.min_samples(), before, after)?;

        let n1 = before.len();
        let n2 = after.len();
        let mean1 = Self::mean(before);
        let mean2 = Self::mean(after);
        let var1 = Self::variance(before, mean1);
        let var2 = Self::variance(after, mean2);
        let df = Self::welch_satterthwaite_df(var1, n1, var2, n2);

        let se = (var1 / n1 as f64 + var2 / n2 as f64).sqrt();

        // Both groups constant: the difference is either exact or absent.
        if se == 0.0 {
            let (t, p_value) = if mean1 == mean2 {
                (0.0, 1.0)
            } else if mean1 > mean2 {
                (f64::INFINITY, 0.0)
            } else {
                (f64::NEG_INFINITY, 0.0)
            };
            return Ok(TestResult {
                kind: TestKind::TTest,
                statistic: t,
                p_value,
                detail: TestDetail::TTest {
                    t,
                    degrees_of_freedom: df,
                },
            });
        }

        let t = (mean1 - mean2) / se;

        let p_value = match StudentsT::new(0.0, 1.0, df) {
            // Two-tailed test: p = 2 * P(T > |t|)
            Ok(t_dist) => (2.0 * (1.0 - t_dist.cdf(t.abs()))).clamp(0.0, 1.0),
            Err(_) => 1.0, // Conservative fallback if distribution creation fails
        };

        Ok(TestResult {
            kind: TestKind::TTest,
            statistic: t,
            p_value,
            detail: TestDetail::TTest {
                t,
                degrees_of_freedom: df,
            },
        })
    }
}
