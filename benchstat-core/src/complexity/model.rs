use std::fmt;

use serde::{Deserialize, Serialize};

/// Complexity classes the fitter tries, declared from simplest to most complex.
///
/// The declaration order is the tie-break order: when two fits are
/// indistinguishable, the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityKind {
    Constant,
    Logarithmic,
    SquareRoot,
    Linear,
    Linearithmic,
    Quadratic,
    Cubic,
    Exponential,
    /// No model passed the acceptance gate.
    Unknown,
}

impl ComplexityKind {
    /// Every kind the fitter attempts, in complexity order.
    pub const FITTED: [ComplexityKind; 8] = [
        ComplexityKind::Constant,
        ComplexityKind::Logarithmic,
        ComplexityKind::SquareRoot,
        ComplexityKind::Linear,
        ComplexityKind::Linearithmic,
        ComplexityKind::Quadratic,
        ComplexityKind::Cubic,
        ComplexityKind::Exponential,
    ];

    pub fn big_o(self) -> &'static str {
        match self {
            ComplexityKind::Constant => "O(1)",
            ComplexityKind::Logarithmic => "O(log n)",
            ComplexityKind::SquareRoot => "O(sqrt n)",
            ComplexityKind::Linear => "O(n)",
            ComplexityKind::Linearithmic => "O(n log n)",
            ComplexityKind::Quadratic => "O(n^2)",
            ComplexityKind::Cubic => "O(n^3)",
            ComplexityKind::Exponential => "O(2^n)",
            ComplexityKind::Unknown => "unknown",
        }
    }

    /// Transformed feature `f(x)` for models of the form `a * f(x) + b`.
    ///
    /// `None` for kinds not fitted that way (constant, exponential, unknown).
    pub(crate) fn feature(self, x: f64) -> Option<f64> {
        match self {
            ComplexityKind::Logarithmic => Some(x.ln()),
            ComplexityKind::SquareRoot => Some(x.sqrt()),
            ComplexityKind::Linear => Some(x),
            ComplexityKind::Linearithmic => Some(x * x.ln()),
            ComplexityKind::Quadratic => Some(x * x),
            ComplexityKind::Cubic => Some(x * x * x),
            ComplexityKind::Constant | ComplexityKind::Exponential | ComplexityKind::Unknown => {
                None
            }
        }
    }
}

impl fmt::Display for ComplexityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.big_o())
    }
}

/// One fitted model.
///
/// Curves are `scale * f(x) + bias`, except `Exponential` which is
/// `bias * exp(scale * x)` and `Constant` which is just `bias`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityCandidate {
    pub kind: ComplexityKind,
    pub scale: f64,
    pub bias: f64,
    /// Coefficient of determination in the original timing space.
    pub r_squared: f64,
}

impl ComplexityCandidate {
    /// The sentinel reported when nothing fits well enough.
    pub fn unknown() -> Self {
        Self {
            kind: ComplexityKind::Unknown,
            scale: 0.0,
            bias: 0.0,
            r_squared: 0.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == ComplexityKind::Unknown
    }

    /// Evaluate the fitted curve at `x`; NaN for the unknown sentinel.
    pub fn predict(&self, x: f64) -> f64 {
        match self.kind {
            ComplexityKind::Constant => self.bias,
            ComplexityKind::Exponential => self.bias * (self.scale * x).exp(),
            ComplexityKind::Unknown => f64::NAN,
            kind => match kind.feature(x) {
                Some(f) => self.scale * f + self.bias,
                None => f64::NAN,
            },
        }
    }
}
