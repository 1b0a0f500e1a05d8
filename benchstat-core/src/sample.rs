use std::fmt;

use serde::{Deserialize, Serialize};

/// A named scaling parameter attached to a test case, e.g. `N = 1000`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseVariable {
    pub name: String,
    pub value: f64,
}

impl TestCaseVariable {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Identity of a single test case: the benchmark method plus its variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseId {
    pub method: String,
    pub variables: Vec<TestCaseVariable>,
}

impl TestCaseId {
    /// An id for a method that takes no variables.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            variables: Vec::new(),
        }
    }

    /// Builder-style helper appending a variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: f64) -> Self {
        self.variables.push(TestCaseVariable::new(name, value));
        self
    }

    /// Value of the named variable, if this case carries it.
    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value)
    }
}

impl fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method)?;
        if self.variables.is_empty() {
            return Ok(());
        }
        let parts: Vec<String> = self
            .variables
            .iter()
            .map(|v| format!("{}: {}", v.name, v.value))
            .collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// Timing observations captured for one test case.
///
/// The analysis functions only ever borrow the samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    pub id: TestCaseId,
    samples: Vec<f64>,
}

impl SampleSet {
    pub fn new(id: TestCaseId, samples: Vec<f64>) -> Self {
        Self { id, samples }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Shorthand for `self.id.variable(name)`.
    pub fn variable(&self, name: &str) -> Option<f64> {
        self.id.variable(name)
    }
}
