use thiserror::Error;

/// Errors raised by the analysis entry points.
///
/// Every variant describes a property of the input data. Nothing here is
/// transient, so callers should skip the affected test case rather than retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The sample sequence (or a setting) is empty or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A group is too small for the requested hypothesis test.
    #[error(
        "Insufficient samples: need at least {required} per group, got {before} before and {after} after"
    )]
    InsufficientSamples {
        required: usize,
        before: usize,
        after: usize,
    },

    /// Too few distinct variable values to fit a complexity curve.
    #[error("Insufficient data: need at least {required} distinct variable values, got {distinct}")]
    InsufficientData { required: usize, distinct: usize },

    /// A variable value lies outside the domain of the model transforms.
    #[error("Invalid domain: variable values must be finite and positive, got {value}")]
    InvalidDomain { value: f64 },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;
