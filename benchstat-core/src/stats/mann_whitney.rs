use super::{normal_two_tailed_p, require_samples, StatisticalTest, TestDetail, TestKind, TestResult};
use crate::error::Result;

/// Mann-Whitney U test with average ranks for ties.
///
/// Uses the normal approximation with a continuity correction and the
/// tie-corrected variance
/// `n1 n2 [ (N + 1) / 12 - sum(t^3 - t) / (12 N (N - 1)) ]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MannWhitneyU;

/// Ranks of the pooled sample and the tie term that goes with them.
struct PooledRanks {
    /// Sum of the ranks belonging to the `before` group.
    before_rank_sum: f64,
    /// `sum(t^3 - t)` over every group of tied values.
    tie_sum: f64,
}

impl MannWhitneyU {
    fn rank(before: &[f64], after: &[f64]) -> PooledRanks {
        let mut pooled: Vec<(f64, bool)> = before
            .iter()
            .map(|&x| (x, true))
            .chain(after.iter().map(|&x| (x, false)))
            .collect();
        pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut before_rank_sum = 0.0;
        let mut tie_sum = 0.0;
        let mut start = 0;
        while start < pooled.len() {
            let mut end = start + 1;
            while end < pooled.len() && pooled[end].0 == pooled[start].0 {
                end += 1;
            }

            // Positions start..end hold ranks start+1..=end.
            let average_rank = (start + 1 + end) as f64 / 2.0;
            let ties = (end - start) as f64;
            tie_sum += ties.powi(3) - ties;
            before_rank_sum += average_rank * pooled[start..end].iter().filter(|p| p.1).count() as f64;

            start = end;
        }

        PooledRanks {
            before_rank_sum,
            tie_sum,
        }
    }
}

impl StatisticalTest for MannWhitneyU {
    fn analyze(&self, before: &[f64], after: &[f64]) -> Result<TestResult> {
        require_samples(TestKind::MannWhitneyU.min_samples(), before, after)?;

        let n1 = before.len() as f64;
        let n2 = after.len() as f64;
        let n = n1 + n2;

        let ranks = Self::rank(before, after);
        let u = ranks.before_rank_sum - n1 * (n1 + 1.0) / 2.0;
        let mean_u = n1 * n2 / 2.0;

        let tie_correction = if n > 1.0 {
            ranks.tie_sum / (12.0 * n * (n - 1.0))
        } else {
            0.0
        };
        let variance = n1 * n2 * ((n + 1.0) / 12.0 - tie_correction);

        // Every observation tied: no information about location.
        let z = if variance <= 0.0 {
            0.0
        } else {
            let diff = u - mean_u;
            let corrected = (diff.abs() - 0.5).max(0.0);
            diff.signum() * corrected / variance.sqrt()
        };
        let p_value = if variance <= 0.0 {
            1.0
        } else {
            normal_two_tailed_p(z)
        };

        Ok(TestResult {
            kind: TestKind::MannWhitneyU,
            statistic: u,
            p_value,
            detail: TestDetail::MannWhitneyU {
                u,
                z,
                tie_correction,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn unpack(result: &TestResult) -> (f64, f64, f64) {
        match result.detail {
            TestDetail::MannWhitneyU {
                u,
                z,
                tie_correction,
            } => (u, z, tie_correction),
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_total_separation() {
        let before = [1.0; 5];
        let after = [10.0; 5];

        let result = MannWhitneyU.analyze(&before, &after).unwrap();
        let (u, z, _) = unpack(&result);

        // Every before value ranks below every after value.
        assert_eq!(u, 0.0);
        assert!(z < 0.0);
        assert!(result.p_value < 0.01);
        assert!((result.p_value - 0.003977).abs() < 1e-5);

        let reversed = MannWhitneyU.analyze(&after, &before).unwrap();
        assert_eq!(reversed.statistic, 25.0);
        assert!((reversed.p_value - result.p_value).abs() < 1e-12);
    }

    #[test]
    fn test_tie_corrected_z_matches_closed_form() {
        let before = [1.0, 2.0, 2.0, 3.0];
        let after = [2.0, 2.0, 3.0, 4.0];

        let result = MannWhitneyU.analyze(&before, &after).unwrap();
        let (u, z, tie_correction) = unpack(&result);

        // Ranks: 1 -> 1, 2s -> 3.5, 3s -> 6.5, 4 -> 8; R1 = 14.5, U = 4.5.
        assert_eq!(u, 4.5);
        // Tie groups of size 4 and 2: (60 + 6) / (12 * 8 * 7).
        assert!(tie_correction > 0.0);
        assert!((tie_correction - 66.0 / 672.0).abs() < 1e-12);

        let sigma = (16.0_f64 * (9.0 / 12.0 - 66.0 / 672.0)).sqrt();
        let expected_z = (4.5 - 8.0 + 0.5) / sigma;
        assert!((z - expected_z).abs() < 1e-12);
        assert!((z + 0.928985).abs() < 1e-6);
        assert!((result.p_value - 0.352897).abs() < 1e-5);
    }

    #[test]
    fn test_identical_samples() {
        let samples = [3.0, 1.0, 4.0, 1.5, 9.0];
        let result = MannWhitneyU.analyze(&samples, &samples).unwrap();
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_all_values_tied() {
        let result = MannWhitneyU.analyze(&[5.0; 4], &[5.0; 3]).unwrap();
        let (_, z, _) = unpack(&result);
        assert_eq!(z, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_single_observation_each_side() {
        let result = MannWhitneyU.analyze(&[1.0], &[2.0]).unwrap();
        assert!(result.p_value > 0.05);
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(
            MannWhitneyU.analyze(&[], &[1.0]),
            Err(AnalysisError::InsufficientSamples {
                required: 1,
                before: 0,
                after: 1
            })
        );
    }
}
