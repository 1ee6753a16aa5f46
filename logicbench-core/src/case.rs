//! Test Case Definitions
//!
//! A test case pairs a rule with the inputs it is evaluated against and the
//! number of timed passes to make over those inputs.

use fxhash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Number of timed passes when a case does not specify its own
pub const DEFAULT_ITERATIONS: u64 = 3;

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Test case '{0}' must run at least one iteration")]
    ZeroIterations(String),

    #[error("Duplicate test case name: {0}")]
    DuplicateName(String),

    #[error("Test case '{0}' must set exactly one of `input` or `inputs`")]
    AmbiguousInput(String),

    #[error("Invalid case file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Inputs a rule is evaluated against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseInput {
    /// One data value, evaluated once per pass
    Single(Value),
    /// Ordered data values, each evaluated once per pass
    Sequence(Vec<Value>),
}

impl CaseInput {
    /// Input values in evaluation order
    pub fn values(&self) -> &[Value] {
        match self {
            CaseInput::Single(value) => std::slice::from_ref(value),
            CaseInput::Sequence(values) => values,
        }
    }

    /// Number of evaluator calls per pass
    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

/// A named benchmark case. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    name: String,
    rule: Value,
    input: CaseInput,
    iterations: u64,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        rule: Value,
        input: CaseInput,
        iterations: u64,
    ) -> Result<Self, CaseError> {
        let name = name.into();
        if iterations == 0 {
            return Err(CaseError::ZeroIterations(name));
        }
        Ok(Self {
            name,
            rule,
            input,
            iterations,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &Value {
        &self.rule
    }

    pub fn input(&self) -> &CaseInput {
        &self.input
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Copy of this case with a different pass count
    pub fn with_iterations(&self, iterations: u64) -> Result<Self, CaseError> {
        Self::new(self.name.clone(), self.rule.clone(), self.input.clone(), iterations)
    }
}

/// Reject case lists whose names collide
pub fn ensure_unique_names(cases: &[TestCase]) -> Result<(), CaseError> {
    let mut seen = FxHashSet::default();
    for case in cases {
        if !seen.insert(case.name()) {
            return Err(CaseError::DuplicateName(case.name().to_string()));
        }
    }
    Ok(())
}

/// One entry of a JSON case file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseEntry {
    name: String,
    rule: Value,
    #[serde(default, deserialize_with = "present")]
    input: Option<Value>,
    #[serde(default)]
    inputs: Option<Vec<Value>>,
    #[serde(default)]
    iterations: Option<u64>,
}

/// `Some` for any value written in the file, `null` included; a missing
/// field falls back to `None` through `#[serde(default)]`
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl CaseEntry {
    fn into_case(self) -> Result<TestCase, CaseError> {
        let input = match (self.input, self.inputs) {
            (Some(value), None) => CaseInput::Single(value),
            (None, Some(values)) => CaseInput::Sequence(values),
            _ => return Err(CaseError::AmbiguousInput(self.name)),
        };
        TestCase::new(
            self.name,
            self.rule,
            input,
            self.iterations.unwrap_or(DEFAULT_ITERATIONS),
        )
    }
}

/// Parse a JSON array of case entries.
///
/// ```json
/// [
///   { "name": "eq", "rule": {"==": [1, 1]}, "input": {} },
///   { "name": "temps", "rule": {">=": [{"var": "temp"}, 20]},
///     "inputs": [{"temp": 25}, {"temp": 10}], "iterations": 10 }
/// ]
/// ```
pub fn parse_cases(json: &str) -> Result<Vec<TestCase>, CaseError> {
    let entries: Vec<CaseEntry> = serde_json::from_str(json)?;
    let cases = entries
        .into_iter()
        .map(CaseEntry::into_case)
        .collect::<Result<Vec<_>, _>>()?;
    ensure_unique_names(&cases)?;
    Ok(cases)
}
