//! Evaluator Boundary
//!
//! The rule engine under test is a black box: a rule and a data value go in,
//! an output value or an error comes out.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{evaluator} failed: {message}")]
pub struct EvalError {
    pub evaluator: String,
    pub message: String,
}

impl EvalError {
    pub fn new(evaluator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            evaluator: evaluator.into(),
            message: message.into(),
        }
    }
}

/// A rule engine the harness can time
pub trait Evaluator {
    /// Display name recorded in reports
    fn name(&self) -> &str;

    /// Apply `rule` to `data`
    fn evaluate(&self, rule: &Value, data: &Value) -> Result<Value, EvalError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn evaluate(&self, rule: &Value, data: &Value) -> Result<Value, EvalError> {
        (**self).evaluate(rule, data)
    }
}

/// JSON Logic as implemented by the `jsonlogic-rs` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLogicEvaluator;

impl JsonLogicEvaluator {
    pub const NAME: &'static str = "jsonlogic-rs";
}

impl Evaluator for JsonLogicEvaluator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, rule: &Value, data: &Value) -> Result<Value, EvalError> {
        jsonlogic_rs::apply(rule, data).map_err(|e| EvalError::new(Self::NAME, e.to_string()))
    }
}
