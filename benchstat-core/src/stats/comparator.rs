use serde::{Deserialize, Serialize};

use super::{
    select_test_kind, KolmogorovSmirnov, MannWhitneyU, StatisticalTest, TestDetail, TestKind,
    WelchTTest,
};
use crate::descriptive::{apply_outlier_policy, summarize_retained, DescriptiveSummary, OutlierPolicy};
use crate::error::{AnalysisError, Result};

/// Classification of a before/after comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// `after` is significantly and materially faster.
    Improved,
    /// `after` is significantly and materially slower.
    Regressed,
    NoChange,
}

/// Settings for [`compare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonSettings {
    pub test_kind: TestKind,
    /// Significance level; a p-value above it is never a change.
    pub alpha: f64,
    /// Minimum relative median shift, in percent, reported as a change.
    pub minimum_effect_size: f64,
    /// Outlier handling applied to both groups before testing.
    pub outlier_policy: OutlierPolicy,
    /// Groups smaller than this are compared with Mann-Whitney U under `Auto`.
    pub small_sample_threshold: usize,
    /// Largest Pearson median skewness still treated as normal under `Auto`.
    pub skewness_threshold: f64,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            test_kind: TestKind::Auto,
            alpha: 0.05,
            minimum_effect_size: 1.0, // 1% minimum effect size
            outlier_policy: OutlierPolicy::None,
            small_sample_threshold: 30,
            skewness_threshold: 0.5,
        }
    }
}

impl ComparisonSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "alpha must be between 0 and 1 (exclusive), got {}",
                self.alpha
            )));
        }
        if self.minimum_effect_size.is_nan() || self.minimum_effect_size < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "minimum_effect_size must be non-negative, got {}",
                self.minimum_effect_size
            )));
        }
        self.outlier_policy.validate()
    }
}

/// Result of comparing a `before` sample set against an `after` one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonVerdict {
    /// The test that ran (never `Auto`).
    pub test_kind: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub detail: TestDetail,
    pub outcome: Outcome,
    /// Relative median shift `(after - before) / before` in percent.
    pub relative_change: f64,
    pub before: DescriptiveSummary,
    pub after: DescriptiveSummary,
}

impl ComparisonVerdict {
    pub fn is_significant(&self) -> bool {
        self.p_value <= self.alpha
    }
}

/// Relative median shift in percent. A zero baseline with a non-zero `after`
/// median is an unbounded shift.
fn relative_change(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        if after == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        (after - before) / before * 100.0
    }
}

/// Direction follows the median shift; an unmoved median is never a change,
/// even with a zero effect-size threshold.
fn classify(p_value: f64, change: f64, settings: &ComparisonSettings) -> Outcome {
    if p_value > settings.alpha || change.abs() < settings.minimum_effect_size {
        return Outcome::NoChange;
    }
    if change > 0.0 {
        Outcome::Regressed
    } else if change < 0.0 {
        Outcome::Improved
    } else {
        Outcome::NoChange
    }
}

/// Compare `before` against `after` and classify the difference.
///
/// # Errors
///
/// `InvalidInput` for empty or malformed samples and invalid settings;
/// `InsufficientSamples` when a group is too small for the resolved test.
pub fn compare(
    before: &[f64],
    after: &[f64],
    settings: &ComparisonSettings,
) -> Result<ComparisonVerdict> {
    settings.validate()?;

    let before_kept = apply_outlier_policy(before, &settings.outlier_policy)?;
    let after_kept = apply_outlier_policy(after, &settings.outlier_policy)?;
    let before_summary = summarize_retained(&before_kept, before.len());
    let after_summary = summarize_retained(&after_kept, after.len());

    let kind = select_test_kind(&before_summary, &after_summary, settings);
    tracing::debug!(
        ?kind,
        before = before_kept.len(),
        after = after_kept.len(),
        "running two-sample test"
    );

    let result = match kind {
        TestKind::TTest => WelchTTest.analyze(&before_kept, &after_kept)?,
        TestKind::KolmogorovSmirnov => KolmogorovSmirnov.analyze(&before_kept, &after_kept)?,
        TestKind::MannWhitneyU | TestKind::Auto => MannWhitneyU.analyze(&before_kept, &after_kept)?,
    };

    let change = relative_change(before_summary.median, after_summary.median);
    let outcome = classify(result.p_value, change, settings);

    Ok(ComparisonVerdict {
        test_kind: result.kind,
        statistic: result.statistic,
        p_value: result.p_value,
        alpha: settings.alpha,
        detail: result.detail,
        outcome,
        relative_change: change,
        before: before_summary,
        after: after_summary,
    })
}
