use super::{require_samples, StatisticalTest, TestDetail, TestKind, TestResult};
use crate::error::Result;

/// Two-sample Kolmogorov-Smirnov test.
///
/// D is the largest vertical distance between the two empirical CDFs. The
/// p-value uses the asymptotic Kolmogorov distribution with Stephens'
/// small-sample adjustment of the effective sample size.
#[derive(Debug, Clone, Copy, Default)]
pub struct KolmogorovSmirnov;

impl KolmogorovSmirnov {
    fn statistic(before: &[f64], after: &[f64]) -> f64 {
        let mut a = before.to_vec();
        let mut b = after.to_vec();
        a.sort_by(f64::total_cmp);
        b.sort_by(f64::total_cmp);

        let (n1, n2) = (a.len() as f64, b.len() as f64);
        let (mut i, mut j) = (0, 0);
        let mut d: f64 = 0.0;

        while i < a.len() && j < b.len() {
            let x = a[i].min(b[j]);
            // Step past every copy of x on both sides before comparing CDFs.
            while i < a.len() && a[i] <= x {
                i += 1;
            }
            while j < b.len() && b[j] <= x {
                j += 1;
            }
            d = d.max((i as f64 / n1 - j as f64 / n2).abs());
        }
        d
    }

    /// Complementary Kolmogorov CDF, `Q(lambda) = 2 sum (-1)^(k-1) exp(-2 k^2 lambda^2)`.
    fn kolmogorov_q(lambda: f64) -> f64 {
        if lambda < 1e-3 {
            return 1.0;
        }
        let mut sum = 0.0;
        let mut sign = 1.0;
        for k in 1..=100 {
            let k = k as f64;
            let term = sign * (-2.0 * k * k * lambda * lambda).exp();
            sum += term;
            if term.abs() < 1e-12 {
                break;
            }
            sign = -sign;
        }
        (2.0 * sum).clamp(0.0, 1.0)
    }
}

impl StatisticalTest for KolmogorovSmirnov {
    fn analyze(&self, before: &[f64], after: &[f64]) -> Result<TestResult> {
        require_samples(TestKind::KolmogorovSmirnov.min_samples(), before, after)?;

        let d = Self::statistic(before, after);
        let (n1, n2) = (before.len() as f64, after.len() as f64);
        let en = (n1 * n2 / (n1 + n2)).sqrt();
        let p_value = if d == 0.0 {
            1.0
        } else {
            Self::kolmogorov_q((en + 0.12 + 0.11 / en) * d)
        };

        Ok(TestResult {
            kind: TestKind::KolmogorovSmirnov,
            statistic: d,
            p_value,
            detail: TestDetail::KolmogorovSmirnov { d },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_samples() {
        let samples = [1.0, 2.0, 2.0, 5.0, 8.0];
        let result = KolmogorovSmirnov.analyze(&samples, &samples).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_disjoint_samples() {
        let before: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let after: Vec<f64> = (11..=20).map(|x| x as f64).collect();

        let result = KolmogorovSmirnov.analyze(&before, &after).unwrap();

        assert_eq!(result.statistic, 1.0);
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn test_partial_overlap_statistic() {
        // ECDFs differ most at x = 2: before 2/3, after 0.
        let before = [1.0, 2.0, 3.0];
        let after = [3.0, 4.0, 5.0];
        let result = KolmogorovSmirnov.analyze(&before, &after).unwrap();
        assert!((result.statistic - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_q_is_monotone() {
        let q1 = KolmogorovSmirnov::kolmogorov_q(0.5);
        let q2 = KolmogorovSmirnov::kolmogorov_q(1.0);
        let q3 = KolmogorovSmirnov::kolmogorov_q(2.0);
        assert!(q1 > q2 && q2 > q3);
        // Critical value for alpha = 0.05.
        assert!((KolmogorovSmirnov::kolmogorov_q(1.358) - 0.05).abs() < 1e-3);
    }
}
