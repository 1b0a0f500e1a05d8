//! Empirical complexity classification.
//!
//! Every [`ComplexityKind`] is fitted with a transform followed by ordinary
//! least squares, scored by R² in the original timing space, and ranked with
//! a bias towards the simpler model when scores are indistinguishable.

mod model;
mod regression;

pub use model::{ComplexityCandidate, ComplexityKind};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use regression::{least_squares, r_squared};

/// Knobs for [`ComplexityFitter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSettings {
    /// Minimum number of distinct variable values.
    pub min_points: usize,
    /// R² differences within this margin are treated as ties.
    pub tie_epsilon: f64,
    /// Best fits scoring below this are reported as unknown.
    pub minimum_r_squared: f64,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            min_points: 3,
            tie_epsilon: 0.0005,
            minimum_r_squared: 0.5,
        }
    }
}

impl FitSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_points < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "min_points must be at least 2, got {}",
                self.min_points
            )));
        }
        if self.tie_epsilon.is_nan() || self.tie_epsilon < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "tie_epsilon must be non-negative, got {}",
                self.tie_epsilon
            )));
        }
        if !self.minimum_r_squared.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "minimum_r_squared must be finite, got {}",
                self.minimum_r_squared
            )));
        }
        Ok(())
    }
}

/// Outcome of fitting one variable of one benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityResult {
    pub variable: String,
    /// Best accepted model, or the unknown sentinel.
    pub best: ComplexityCandidate,
    /// Every fitted candidate, best first.
    pub candidates: Vec<ComplexityCandidate>,
}

impl ComplexityResult {
    /// The runner-up to the best model, if any.
    pub fn next_closest(&self) -> Option<&ComplexityCandidate> {
        if self.best.is_unknown() {
            self.candidates.first()
        } else {
            self.candidates.get(1)
        }
    }
}

/// Order candidates by R², descending, preferring the simpler kind on near-ties.
///
/// At each step the highest remaining R² sets the bar, and the lowest-order
/// candidate within `epsilon` of it is taken next.
pub fn rank_candidates(
    mut remaining: Vec<ComplexityCandidate>,
    epsilon: f64,
) -> Vec<ComplexityCandidate> {
    let mut ranked = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let top = remaining
            .iter()
            .map(|c| c.r_squared)
            .fold(f64::NEG_INFINITY, f64::max);

        let pick = remaining
            .iter()
            .enumerate()
            .filter(|(_, c)| c.r_squared >= top - epsilon)
            .min_by_key(|(_, c)| c.kind)
            .map(|(i, _)| i)
            .unwrap_or(0);

        ranked.push(remaining.remove(pick));
    }

    ranked
}

/// Fits every complexity model to `(variable, timing)` observations.
#[derive(Debug, Clone, Default)]
pub struct ComplexityFitter {
    settings: FitSettings,
}

impl ComplexityFitter {
    pub fn new(settings: FitSettings) -> Self {
        Self { settings }
    }

    /// Fit all models to `points` and pick the best.
    ///
    /// # Errors
    ///
    /// - `InvalidDomain` if a variable value is not finite and positive.
    /// - `InvalidInput` for negative or non-finite timings, or bad settings.
    /// - `InsufficientData` with fewer than `min_points` distinct variable values.
    pub fn fit(&self, variable: &str, points: &[(f64, f64)]) -> Result<ComplexityResult> {
        self.settings.validate()?;

        if let Some(&(x, _)) = points.iter().find(|(x, _)| !x.is_finite() || *x <= 0.0) {
            return Err(AnalysisError::InvalidDomain { value: x });
        }
        if let Some(&(_, y)) = points.iter().find(|(_, y)| !y.is_finite() || *y < 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "timings must be finite and non-negative, got {}",
                y
            )));
        }

        let mut distinct: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();
        if distinct.len() < self.settings.min_points {
            return Err(AnalysisError::InsufficientData {
                required: self.settings.min_points,
                distinct: distinct.len(),
            });
        }

        let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
        let ys: Vec<f64> = points.iter().map(|(_, y)| *y).collect();

        let candidates: Vec<ComplexityCandidate> = ComplexityKind::FITTED
            .iter()
            .filter_map(|&kind| fit_kind(kind, &xs, &ys))
            .collect();

        let ranked = rank_candidates(candidates, self.settings.tie_epsilon);
        let best = ranked
            .first()
            .filter(|c| c.r_squared >= self.settings.minimum_r_squared)
            .copied()
            .unwrap_or_else(ComplexityCandidate::unknown);

        tracing::debug!(
            variable,
            best = %best.kind,
            r_squared = best.r_squared,
            candidates = ranked.len(),
            "complexity fit complete"
        );

        Ok(ComplexityResult {
            variable: variable.to_string(),
            best,
            candidates: ranked,
        })
    }
}

/// Fit with default settings and a custom minimum number of distinct points.
pub fn fit_complexity(
    variable: &str,
    points: &[(f64, f64)],
    min_points: usize,
) -> Result<ComplexityResult> {
    ComplexityFitter::new(FitSettings {
        min_points,
        ..FitSettings::default()
    })
    .fit(variable, points)
}

/// Fit a single model; `None` when the model cannot be evaluated on this data.
fn fit_kind(kind: ComplexityKind, xs: &[f64], ys: &[f64]) -> Option<ComplexityCandidate> {
    let (scale, bias, predicted) = match kind {
        ComplexityKind::Constant => {
            let mean = ys.iter().sum::<f64>() / ys.len() as f64;
            (0.0, mean, vec![mean; ys.len()])
        }
        ComplexityKind::Exponential => {
            if ys.iter().any(|y| *y <= 0.0) {
                tracing::debug!("skipping exponential model: zero timing");
                return None;
            }
            let log_ys: Vec<f64> = ys.iter().map(|y| y.ln()).collect();
            let fit = least_squares(xs, &log_ys);
            let bias = fit.intercept.exp();
            let predicted: Vec<f64> = xs.iter().map(|x| bias * (fit.slope * x).exp()).collect();
            (fit.slope, bias, predicted)
        }
        ComplexityKind::Unknown => return None,
        _ => {
            let features: Vec<f64> = xs.iter().filter_map(|x| kind.feature(*x)).collect();
            let fit = least_squares(&features, ys);
            let predicted: Vec<f64> = features
                .iter()
                .map(|f| fit.slope * f + fit.intercept)
                .collect();
            (fit.slope, fit.intercept, predicted)
        }
    };

    if predicted.iter().any(|p| !p.is_finite()) {
        tracing::debug!(?kind, "skipping model: non-finite prediction");
        return None;
    }
    let r_squared = r_squared(ys, &predicted);
    if !r_squared.is_finite() {
        return None;
    }

    Some(ComplexityCandidate {
        kind,
        scale,
        bias,
        r_squared,
    })
}
