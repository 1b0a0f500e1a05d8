//! Two-sample hypothesis tests and the before/after comparator.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which hypothesis test to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Rank-sum test; robust to non-normal timing distributions.
    MannWhitneyU,
    /// Welch's two-sample t-test.
    TTest,
    /// Two-sample Kolmogorov-Smirnov test on the empirical CDFs.
    KolmogorovSmirnov,
    /// Choose between Mann-Whitney U and the t-test from the data.
    Auto,
}

impl TestKind {
    /// Smallest group size the test can run on.
    pub fn min_samples(self) -> usize {
        match self {
            TestKind::TTest => 2,
            TestKind::MannWhitneyU | TestKind::KolmogorovSmirnov | TestKind::Auto => 1,
        }
    }
}

/// Test-specific values behind a [`TestResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum TestDetail {
    MannWhitneyU {
        /// U computed from the `before` rank sum.
        u: f64,
        /// Continuity- and tie-corrected normal approximation.
        z: f64,
        /// Variance reduction term `sum(t^3 - t) / (12 N (N - 1))`.
        tie_correction: f64,
    },
    TTest {
        t: f64,
        degrees_of_freedom: f64,
    },
    KolmogorovSmirnov {
        d: f64,
    },
}

/// Outcome of a single hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// The test that actually ran (never `Auto`).
    pub kind: TestKind,
    /// Headline statistic: U, t, or D.
    pub statistic: f64,
    /// Two-tailed p-value in `[0, 1]`.
    pub p_value: f64,
    pub detail: TestDetail,
}

/// A two-sample test over `before` and `after` observations.
pub trait StatisticalTest: Send + Sync {
    /// Run the test. Inputs are assumed already validated and filtered.
    fn analyze(&self, before: &[f64], after: &[f64]) -> Result<TestResult>;
}

mod comparator;
mod ks;
mod mann_whitney;
mod selector;
mod ttest;

pub use comparator::{compare, ComparisonSettings, ComparisonVerdict, Outcome};
pub use ks::KolmogorovSmirnov;
pub use mann_whitney::MannWhitneyU;
pub use selector::select_test_kind;
pub use ttest::WelchTTest;

/// Two-tailed p-value for a standard normal deviate.
pub(crate) fn normal_two_tailed_p(z: f64) -> f64 {
    use statrs::distribution::{ContinuousCDF, Normal};

    if z == 0.0 {
        return 1.0;
    }
    match Normal::new(0.0, 1.0) {
        Ok(normal) => (2.0 * (1.0 - normal.cdf(z.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// Ensure both groups hold at least `required` observations.
pub(crate) fn require_samples(required: usize, before: &[f64], after: &[f64]) -> Result<()> {
    if before.len() < required || after.len() < required {
        return Err(crate::error::AnalysisError::InsufficientSamples {
            required,
            before: before.len(),
            after: after.len(),
        });
    }
    Ok(())
}
