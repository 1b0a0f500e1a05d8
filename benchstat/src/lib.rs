//! benchstat: statistical analysis of benchmark runs
//!
//! This library compares before/after benchmark runs with hypothesis tests
//! and estimates the empirical complexity of scaled benchmarks, on top of the
//! pure statistics in `benchstat-core`.

pub mod batch;
pub mod config;

// Re-export core types for convenience
pub use benchstat_core::{
    compare, fit_complexity, summarize, AnalysisError, ComparisonSettings, ComparisonVerdict,
    ComplexityCandidate, ComplexityFitter, ComplexityKind, ComplexityResult, DescriptiveSummary,
    FitSettings, OutlierPolicy, Outcome, SampleSet, TestCaseId, TestCaseVariable, TestKind,
};

// Re-export main types from this crate
pub use batch::{
    analyze_complexity, compare_runs, CaseVerdict, ComparisonBatch, ComplexityBatch,
    MethodComplexity, SkippedCase, SkippedFit,
};
pub use config::{ComplexityConfig, Config};
