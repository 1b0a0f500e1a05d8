//! Ordinary least squares on a single feature.

/// Slope and intercept of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Fit `y = slope * x + intercept` by least squares.
///
/// Uses centered sums for numerical stability. A feature with no spread
/// yields a zero slope and the mean of `y` as intercept.
pub(crate) fn least_squares(xs: &[f64], ys: &[f64]) -> LinearFit {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        sxx += dx * dx;
        sxy += dx * (y - y_mean);
    }

    if sxx == 0.0 {
        return LinearFit {
            slope: 0.0,
            intercept: y_mean,
        };
    }

    let slope = sxy / sxx;
    LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    }
}

/// Coefficient of determination of `predicted` against `observed`.
///
/// With no variance in `observed`, an exact fit scores 1 and anything else 0.
pub(crate) fn r_squared(observed: &[f64], predicted: &[f64]) -> f64 {
    let n = observed.len() as f64;
    let mean = observed.iter().sum::<f64>() / n;

    let ss_tot: f64 = observed.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();

    let scale = observed.iter().map(|y| y * y).sum::<f64>().max(f64::MIN_POSITIVE);
    if ss_tot <= scale * 1e-24 {
        return if ss_res <= scale * 1e-20 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0];
        let fit = least_squares(&xs, &ys);
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_feature() {
        let fit = least_squares(&[2.0, 2.0, 2.0], &[1.0, 2.0, 6.0]);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 3.0);
    }

    #[test]
    fn test_r_squared_perfect_and_mean() {
        let observed = [1.0, 2.0, 3.0];
        assert_eq!(r_squared(&observed, &observed), 1.0);
        assert_eq!(r_squared(&observed, &[2.0, 2.0, 2.0]), 0.0);
    }

    #[test]
    fn test_r_squared_can_be_negative() {
        assert!(r_squared(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) < 0.0);
    }

    #[test]
    fn test_r_squared_constant_observations() {
        assert_eq!(r_squared(&[4.0, 4.0, 4.0], &[4.0, 4.0, 4.0]), 1.0);
        assert_eq!(r_squared(&[4.0, 4.0, 4.0], &[3.0, 4.0, 5.0]), 0.0);
        assert_eq!(r_squared(&[0.0, 0.0], &[0.0, 0.0]), 1.0);
    }
}
