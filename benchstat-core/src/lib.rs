//! Core statistics for benchstat.
//!
//! Pure, synchronous analysis over borrowed timing samples: descriptive
//! summaries, before/after hypothesis testing, and empirical complexity
//! fitting. Nothing in this crate performs I/O or keeps state between calls.

pub mod complexity;
pub mod descriptive;
pub mod error;
pub mod generator;
pub mod sample;
pub mod stats;

// Re-export main types for convenience
pub use complexity::{
    fit_complexity, rank_candidates, ComplexityCandidate, ComplexityFitter, ComplexityKind,
    ComplexityResult, FitSettings,
};
pub use descriptive::{summarize, DescriptiveSummary, OutlierPolicy, Percentiles};
pub use error::{AnalysisError, Result};
pub use generator::{DistributionGenerator, Resampler, SampleGenerator};
pub use sample::{SampleSet, TestCaseId, TestCaseVariable};
pub use stats::{
    compare, select_test_kind, ComparisonSettings, ComparisonVerdict, KolmogorovSmirnov,
    MannWhitneyU, Outcome, StatisticalTest, TestDetail, TestKind, TestResult, WelchTTest,
};
