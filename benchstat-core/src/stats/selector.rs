use super::{ComparisonSettings, TestKind};
use crate::descriptive::DescriptiveSummary;

/// Resolve the test to run for a pair of summaries.
///
/// An explicit kind in `settings` is returned as-is. For [`TestKind::Auto`],
/// Mann-Whitney U is chosen when either group is smaller than
/// `small_sample_threshold`, has no spread, or has a Pearson median skewness
/// beyond `skewness_threshold`; otherwise Welch's t-test.
pub fn select_test_kind(
    before: &DescriptiveSummary,
    after: &DescriptiveSummary,
    settings: &ComparisonSettings,
) -> TestKind {
    if settings.test_kind != TestKind::Auto {
        return settings.test_kind;
    }

    let looks_normal = |s: &DescriptiveSummary| {
        s.count >= settings.small_sample_threshold
            && s.std_dev > 0.0
            && s.median_skewness().abs() <= settings.skewness_threshold
    };

    if looks_normal(before) && looks_normal(after) {
        TestKind::TTest
    } else {
        TestKind::MannWhitneyU
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptive::{summarize, OutlierPolicy};

    fn summary(samples: &[f64]) -> DescriptiveSummary {
        summarize(samples, &OutlierPolicy::None).unwrap()
    }

    fn symmetric(n: usize, center: f64) -> Vec<f64> {
        (0..n).map(|i| center + (i % 7) as f64 - 3.0).collect()
    }

    #[test]
    fn test_explicit_kind_wins() {
        let settings = ComparisonSettings {
            test_kind: TestKind::KolmogorovSmirnov,
            ..ComparisonSettings::default()
        };
        let s = summary(&[1.0, 2.0]);
        assert_eq!(
            select_test_kind(&s, &s, &settings),
            TestKind::KolmogorovSmirnov
        );
    }

    #[test]
    fn test_small_samples_use_rank_test() {
        let s = summary(&symmetric(10, 100.0));
        assert_eq!(
            select_test_kind(&s, &s, &ComparisonSettings::default()),
            TestKind::MannWhitneyU
        );
    }

    #[test]
    fn test_large_symmetric_samples_use_ttest() {
        let before = summary(&symmetric(70, 100.0));
        let after = summary(&symmetric(70, 110.0));
        assert_eq!(
            select_test_kind(&before, &after, &ComparisonSettings::default()),
            TestKind::TTest
        );
    }

    #[test]
    fn test_skewed_samples_use_rank_test() {
        let before = summary(&symmetric(70, 100.0));
        let mut skewed = vec![10.0; 60];
        skewed.extend(vec![500.0; 10]);
        let after = summary(&skewed);

        assert!(after.median_skewness().abs() > 0.5);
        assert_eq!(
            select_test_kind(&before, &after, &ComparisonSettings::default()),
            TestKind::MannWhitneyU
        );
    }

    #[test]
    fn test_constant_samples_use_rank_test() {
        let before = summary(&[5.0; 40]);
        let after = summary(&symmetric(40, 5.0));
        assert_eq!(
            select_test_kind(&before, &after, &ComparisonSettings::default()),
            TestKind::MannWhitneyU
        );
    }
}
