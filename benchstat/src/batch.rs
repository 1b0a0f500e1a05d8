//! Batch analysis over whole benchmark runs.
//!
//! Matches before/after runs case by case and groups scaled cases into
//! per-variable complexity fits. Individual analyses run on rayon's pool;
//! a failing case is logged and recorded as skipped rather than failing the
//! batch.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use benchstat_core::{
    compare, summarize, AnalysisError, ComparisonSettings, ComparisonVerdict, ComplexityFitter,
    ComplexityResult, FitSettings, OutlierPolicy, Outcome, SampleSet, TestCaseId,
};

/// Verdict for one test case present in both runs.
#[derive(Debug, Clone, Serialize)]
pub struct CaseVerdict {
    pub id: TestCaseId,
    pub verdict: ComparisonVerdict,
}

/// A case the batch could not analyze, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedCase {
    pub id: TestCaseId,
    pub error: AnalysisError,
}

/// Result of comparing two runs.
#[derive(Debug, Clone, Default)]
pub struct ComparisonBatch {
    /// Verdicts in the order cases appear in the `after` run.
    pub verdicts: Vec<CaseVerdict>,
    /// Matched cases whose comparison failed.
    pub skipped: Vec<SkippedCase>,
    /// Cases only present in the `before` run.
    pub only_before: Vec<TestCaseId>,
    /// Cases only present in the `after` run.
    pub only_after: Vec<TestCaseId>,
}

impl ComparisonBatch {
    pub fn regressions(&self) -> impl Iterator<Item = &CaseVerdict> {
        self.with_outcome(Outcome::Regressed)
    }

    pub fn improvements(&self) -> impl Iterator<Item = &CaseVerdict> {
        self.with_outcome(Outcome::Improved)
    }

    pub fn has_regressions(&self) -> bool {
        self.regressions().next().is_some()
    }

    fn with_outcome(&self, outcome: Outcome) -> impl Iterator<Item = &CaseVerdict> {
        self.verdicts
            .iter()
            .filter(move |v| v.verdict.outcome == outcome)
    }
}

/// Structural identity of a test case: method plus exact variable values.
#[derive(PartialEq, Eq, Hash)]
struct CaseKey<'a> {
    method: &'a str,
    variables: Vec<(&'a str, u64)>,
}

impl<'a> CaseKey<'a> {
    fn of(id: &'a TestCaseId) -> Self {
        Self {
            method: &id.method,
            variables: id
                .variables
                .iter()
                .map(|v| (v.name.as_str(), v.value.to_bits()))
                .collect(),
        }
    }
}

/// Compare every case of `after` against the case with the same id in `before`.
///
/// Ids match on method name plus variable names and values. When a run holds
/// the same id more than once, the first occurrence is used.
pub fn compare_runs(
    before: &[SampleSet],
    after: &[SampleSet],
    settings: &ComparisonSettings,
) -> ComparisonBatch {
    let mut before_by_id: HashMap<CaseKey<'_>, &SampleSet> = HashMap::new();
    for set in before {
        before_by_id.entry(CaseKey::of(&set.id)).or_insert(set);
    }

    let mut batch = ComparisonBatch::default();
    let mut pairs = Vec::new();
    let mut seen = HashSet::new();
    for set in after {
        let key = CaseKey::of(&set.id);
        if seen.contains(&key) {
            continue;
        }
        match before_by_id.get(&key) {
            Some(base) => pairs.push((*base, set)),
            None => batch.only_after.push(set.id.clone()),
        }
        seen.insert(key);
    }
    for set in before {
        if seen.insert(CaseKey::of(&set.id)) {
            batch.only_before.push(set.id.clone());
        }
    }

    let outcomes: Vec<(TestCaseId, Result<ComparisonVerdict, AnalysisError>)> = pairs
        .par_iter()
        .map(|(base, cand)| {
            (
                cand.id.clone(),
                compare(base.samples(), cand.samples(), settings),
            )
        })
        .collect();

    for (id, outcome) in outcomes {
        match outcome {
            Ok(verdict) => batch.verdicts.push(CaseVerdict { id, verdict }),
            Err(error) => {
                warn!(case = %id, %error, "skipping comparison");
                batch.skipped.push(SkippedCase { id, error });
            }
        }
    }

    debug!(
        compared = batch.verdicts.len(),
        skipped = batch.skipped.len(),
        only_before = batch.only_before.len(),
        only_after = batch.only_after.len(),
        "compared runs"
    );
    batch
}

/// Fit for one scaling variable of one method.
#[derive(Debug, Clone, Serialize)]
pub struct MethodComplexity {
    pub method: String,
    pub result: ComplexityResult,
}

/// A (method, variable) pair the fitter rejected.
#[derive(Debug, Clone)]
pub struct SkippedFit {
    pub method: String,
    pub variable: String,
    pub error: AnalysisError,
}

/// Result of complexity analysis over a run.
#[derive(Debug, Clone, Default)]
pub struct ComplexityBatch {
    /// Fits in first-seen order of method, then variable.
    pub results: Vec<MethodComplexity>,
    pub skipped: Vec<SkippedFit>,
}

impl ComplexityBatch {
    /// The fit for `method` along `variable`, if one was produced.
    pub fn get(&self, method: &str, variable: &str) -> Option<&ComplexityResult> {
        self.results
            .iter()
            .find(|r| r.method == method && r.result.variable == variable)
            .map(|r| &r.result)
    }
}

struct FitJob<'a> {
    method: &'a str,
    variable: &'a str,
    points: Vec<(f64, f64)>,
}

/// Fit a complexity model for every variable of every method in `cases`.
///
/// For each variable, only cases whose other variables sit at their smallest
/// observed value contribute, so the remaining parameters are held fixed.
/// Each contributing case supplies its mean timing after `outlier_policy`.
/// Methods without variables are ignored.
pub fn analyze_complexity(
    cases: &[SampleSet],
    settings: &FitSettings,
    outlier_policy: &OutlierPolicy,
) -> ComplexityBatch {
    let mut methods: Vec<(&str, Vec<&SampleSet>)> = Vec::new();
    for set in cases {
        match methods.iter_mut().find(|(m, _)| *m == set.id.method) {
            Some((_, group)) => group.push(set),
            None => methods.push((set.id.method.as_str(), vec![set])),
        }
    }

    let mut jobs = Vec::new();
    for (method, group) in &methods {
        for variable in variable_names(group) {
            let points = group
                .iter()
                .filter(|set| others_at_baseline(set, variable, group))
                .filter_map(|set| {
                    let x = set.variable(variable)?;
                    match summarize(set.samples(), outlier_policy) {
                        Ok(summary) => Some((x, summary.mean)),
                        Err(error) => {
                            warn!(case = %set.id, %error, "dropping case from complexity fit");
                            None
                        }
                    }
                })
                .collect();
            jobs.push(FitJob {
                method,
                variable,
                points,
            });
        }
    }

    let fitter = ComplexityFitter::new(settings.clone());
    let fits: Vec<_> = jobs
        .par_iter()
        .map(|job| fitter.fit(job.variable, &job.points))
        .collect();

    let mut batch = ComplexityBatch::default();
    for (job, fit) in jobs.iter().zip(fits) {
        match fit {
            Ok(result) => batch.results.push(MethodComplexity {
                method: job.method.to_string(),
                result,
            }),
            Err(error) => {
                warn!(
                    method = job.method,
                    variable = job.variable,
                    %error,
                    "skipping complexity fit"
                );
                batch.skipped.push(SkippedFit {
                    method: job.method.to_string(),
                    variable: job.variable.to_string(),
                    error,
                });
            }
        }
    }
    batch
}

/// Variable names of a method's cases, in first-seen order.
fn variable_names<'a>(group: &[&'a SampleSet]) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for set in group {
        for var in &set.id.variables {
            if !names.contains(&var.name.as_str()) {
                names.push(var.name.as_str());
            }
        }
    }
    names
}

/// Whether every variable of `set` other than `variable` holds its smallest
/// value across `group`.
fn others_at_baseline(set: &SampleSet, variable: &str, group: &[&SampleSet]) -> bool {
    set.id
        .variables
        .iter()
        .filter(|v| v.name != variable)
        .all(|v| {
            let smallest = group
                .iter()
                .filter_map(|other| other.variable(&v.name))
                .fold(f64::INFINITY, f64::min);
            v.value == smallest
        })
}
