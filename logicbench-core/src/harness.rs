//! Benchmark Harness
//!
//! Runs test cases one after another against an [`Evaluator`], timing
//! `iterations` passes over each case's inputs. A case whose evaluator call
//! fails becomes a [`CaseFailure`]; the [`FailurePolicy`] decides whether
//! the remaining cases still run.

use crate::case::TestCase;
use crate::evaluator::{EvalError, Evaluator};
use crate::stats::{summarize, StatsError, TimingSummary};
use serde::Serialize;
use serde_json::Value;
use std::hint::black_box;
use std::time::Instant;
use thiserror::Error;

/// Maximum (input, output) pairs kept per record for detail views
pub const DETAIL_ROW_LIMIT: usize = 100;

/// What to do with the remaining cases after one fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and run the next case
    #[default]
    Continue,
    /// Stop the run, keeping the results gathered so far
    Abort,
}

/// Measurements for one completed case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub name: String,
    pub rule: Value,
    /// Wall-clock time of all passes divided by the pass count
    pub average_time_ms: f64,
    pub complexity_score: usize,
    pub iterations: u64,
    /// One output per input, in input order
    pub outputs: Vec<Value>,
    /// Leading inputs, at most [`DETAIL_ROW_LIMIT`]
    pub sample_inputs: Vec<Value>,
    /// Duration of each timed pass
    pub pass_times_ms: Vec<f64>,
}

impl ResultRecord {
    /// Number of inputs the case was evaluated against
    pub fn input_count(&self) -> usize {
        self.outputs.len()
    }

    /// Leading (input, output) pairs
    pub fn detail_rows(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.sample_inputs.iter().zip(self.outputs.iter())
    }

    pub fn timing(&self) -> Result<TimingSummary, StatsError> {
        summarize(&self.pass_times_ms)
    }
}

/// A case that could not be measured because the evaluator failed
#[derive(Debug, Clone, PartialEq, Error)]
#[error("case '{name}' failed: {error}")]
pub struct CaseFailure {
    pub name: String,
    pub rule: Value,
    pub complexity_score: usize,
    #[source]
    pub error: EvalError,
}

pub type CaseResult = Result<ResultRecord, CaseFailure>;

/// Outcome of one harness run, in case declaration order
#[derive(Debug, Clone, Default)]
pub struct HarnessRun {
    pub results: Vec<CaseResult>,
    /// Set when [`FailurePolicy::Abort`] cut the run short
    pub aborted: bool,
}

impl HarnessRun {
    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseFailure> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Receives progress events while a run executes.
///
/// All methods default to doing nothing.
pub trait RunObserver {
    fn run_started(&mut self, _total: usize) {}

    /// Called before the case's timing starts
    fn case_started(&mut self, _index: usize, _name: &str) {}

    fn case_finished(&mut self, _index: usize, _result: &CaseResult) {}

    fn run_finished(&mut self, _run: &HarnessRun) {}
}

impl RunObserver for () {}

impl<T: RunObserver + ?Sized> RunObserver for &mut T {
    fn run_started(&mut self, total: usize) {
        (**self).run_started(total)
    }

    fn case_started(&mut self, index: usize, name: &str) {
        (**self).case_started(index, name)
    }

    fn case_finished(&mut self, index: usize, result: &CaseResult) {
        (**self).case_finished(index, result)
    }

    fn run_finished(&mut self, run: &HarnessRun) {
        (**self).run_finished(run)
    }
}

impl<A: RunObserver, B: RunObserver> RunObserver for (A, B) {
    fn run_started(&mut self, total: usize) {
        self.0.run_started(total);
        self.1.run_started(total);
    }

    fn case_started(&mut self, index: usize, name: &str) {
        self.0.case_started(index, name);
        self.1.case_started(index, name);
    }

    fn case_finished(&mut self, index: usize, result: &CaseResult) {
        self.0.case_finished(index, result);
        self.1.case_finished(index, result);
    }

    fn run_finished(&mut self, run: &HarnessRun) {
        self.0.run_finished(run);
        self.1.run_finished(run);
    }
}

/// Character length of the rule's compact JSON text
pub fn complexity_score(rule: &Value) -> usize {
    rule.to_string().chars().count()
}

/// Sequential, timed runner over a list of cases
pub struct Harness<E> {
    evaluator: E,
    policy: FailurePolicy,
}

impl<E: Evaluator> Harness<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run every case in order
    pub fn run<O: RunObserver + ?Sized>(&self, cases: &[TestCase], observer: &mut O) -> HarnessRun {
        tracing::info!(
            cases = cases.len(),
            evaluator = self.evaluator.name(),
            "starting benchmark run"
        );
        observer.run_started(cases.len());

        let mut run = HarnessRun {
            results: Vec::with_capacity(cases.len()),
            aborted: false,
        };

        for (index, case) in cases.iter().enumerate() {
            observer.case_started(index, case.name());
            let result = self.run_case(case);
            observer.case_finished(index, &result);

            let failed = result.is_err();
            run.results.push(result);

            if failed && self.policy == FailurePolicy::Abort {
                tracing::warn!(case = case.name(), "aborting run after failed case");
                run.aborted = cases.len() > index + 1;
                break;
            }
        }

        observer.run_finished(&run);
        run
    }

    /// Time and evaluate a single case
    pub fn run_case(&self, case: &TestCase) -> CaseResult {
        let complexity_score = complexity_score(case.rule());
        tracing::debug!(
            case = case.name(),
            iterations = case.iterations(),
            inputs = case.input().len(),
            complexity_score,
            "running case"
        );

        match self.measure(case) {
            Ok((elapsed_ms, pass_times_ms, outputs)) => {
                let average_time_ms = elapsed_ms / case.iterations() as f64;
                tracing::debug!(case = case.name(), average_time_ms, "case complete");
                Ok(ResultRecord {
                    name: case.name().to_string(),
                    rule: case.rule().clone(),
                    average_time_ms,
                    complexity_score,
                    iterations: case.iterations(),
                    outputs,
                    sample_inputs: case
                        .input()
                        .values()
                        .iter()
                        .take(DETAIL_ROW_LIMIT)
                        .cloned()
                        .collect(),
                    pass_times_ms,
                })
            }
            Err(error) => {
                tracing::warn!(case = case.name(), %error, "case failed");
                Err(CaseFailure {
                    name: case.name().to_string(),
                    rule: case.rule().clone(),
                    complexity_score,
                    error,
                })
            }
        }
    }

    /// Timed passes, then one untimed pass collecting outputs
    fn measure(&self, case: &TestCase) -> Result<(f64, Vec<f64>, Vec<Value>), EvalError> {
        let rule = case.rule();
        let inputs = case.input().values();
        let mut pass_times_ms = Vec::with_capacity(case.iterations() as usize);

        let start = Instant::now();
        for _ in 0..case.iterations() {
            let pass_start = Instant::now();
            for input in inputs {
                black_box(self.evaluator.evaluate(rule, input)?);
            }
            pass_times_ms.push(pass_start.elapsed().as_secs_f64() * 1000.0);
        }
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let outputs = inputs
            .iter()
            .map(|input| self.evaluator.evaluate(rule, input))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((elapsed_ms, pass_times_ms, outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseInput;
    use crate::evaluator::JsonLogicEvaluator;
    use proptest::prelude::*;
    use serde_json::json;

    /// Returns the data unchanged
    struct Echo;

    impl Evaluator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn evaluate(&self, _rule: &Value, data: &Value) -> Result<Value, EvalError> {
            Ok(data.clone())
        }
    }

    /// Fails on any data value carrying a `boom` key
    struct Fussy;

    impl Evaluator for Fussy {
        fn name(&self) -> &str {
            "fussy"
        }

        fn evaluate(&self, _rule: &Value, data: &Value) -> Result<Value, EvalError> {
            if data.get("boom").is_some() {
                Err(EvalError::new("fussy", "boom"))
            } else {
                Ok(json!(true))
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RunObserver for Recorder {
        fn run_started(&mut self, total: usize) {
            self.events.push(format!("start:{}", total));
        }

        fn case_started(&mut self, index: usize, name: &str) {
            self.events.push(format!("case:{}:{}", index, name));
        }

        fn case_finished(&mut self, index: usize, result: &CaseResult) {
            self.events.push(format!("done:{}:{}", index, result.is_ok()));
        }

        fn run_finished(&mut self, run: &HarnessRun) {
            self.events.push(format!("finish:{}", run.results.len()));
        }
    }

    fn case(name: &str, rule: Value, input: CaseInput, iterations: u64) -> TestCase {
        TestCase::new(name, rule, input, iterations).unwrap()
    }

    #[test]
    fn test_literal_rule_output_and_complexity() {
        let harness = Harness::new(JsonLogicEvaluator);
        let record = harness
            .run_case(&case("eq", json!({"==": [1, 1]}), CaseInput::Single(json!({})), 3))
            .unwrap();

        assert_eq!(record.outputs, vec![json!(true)]);
        assert_eq!(record.complexity_score, 12);
        assert_eq!(record.complexity_score, r#"{"==":[1,1]}"#.len());
        assert_eq!(record.pass_times_ms.len(), 3);
    }

    #[test]
    fn test_variable_rule_output() {
        let harness = Harness::new(JsonLogicEvaluator);
        let record = harness
            .run_case(&case(
                "temp",
                json!({">=": [{"var": "temp"}, 20]}),
                CaseInput::Single(json!({"temp": 25})),
                1,
            ))
            .unwrap();
        assert_eq!(record.outputs, vec![json!(true)]);
    }

    #[test]
    fn test_sequence_of_100_yields_100_outputs() {
        let inputs: Vec<Value> = (0..100).map(|i| json!({"temp": i})).collect();
        let harness = Harness::new(JsonLogicEvaluator);
        let record = harness
            .run_case(&case(
                "seq",
                json!({">=": [{"var": "temp"}, 50]}),
                CaseInput::Sequence(inputs),
                2,
            ))
            .unwrap();

        assert_eq!(record.outputs.len(), 100);
        assert_eq!(record.input_count(), 100);
        assert_eq!(record.outputs[49], json!(false));
        assert_eq!(record.outputs[50], json!(true));
        assert_eq!(record.detail_rows().count(), 100);
    }

    #[test]
    fn test_detail_rows_are_capped() {
        let inputs: Vec<Value> = (0..250).map(|i| json!(i)).collect();
        let record = Harness::new(Echo)
            .run_case(&case("big", json!(null), CaseInput::Sequence(inputs), 1))
            .unwrap();
        assert_eq!(record.outputs.len(), 250);
        assert_eq!(record.sample_inputs.len(), DETAIL_ROW_LIMIT);
        assert_eq!(record.detail_rows().count(), DETAIL_ROW_LIMIT);
    }

    #[test]
    fn test_average_time_is_finite_and_non_negative() {
        let record = Harness::new(JsonLogicEvaluator)
            .run_case(&case("eq", json!({"==": [1, 1]}), CaseInput::Single(json!({})), 5))
            .unwrap();
        assert!(record.average_time_ms.is_finite());
        assert!(record.average_time_ms >= 0.0);
        assert!(record.timing().is_ok());
    }

    #[test]
    fn test_results_follow_declaration_order() {
        let cases = vec![
            case("b", json!(1), CaseInput::Single(json!({})), 1),
            case("a", json!(2), CaseInput::Single(json!({})), 1),
            case("c", json!(3), CaseInput::Single(json!({})), 1),
        ];
        let run = Harness::new(Echo).run(&cases, &mut ());
        let names: Vec<_> = run.records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(!run.aborted);
    }

    #[test]
    fn test_repeat_runs_give_identical_outputs() {
        let inputs: Vec<Value> = (0..20).map(|i| json!({"temp": i * 3})).collect();
        let cases = vec![case(
            "nested",
            json!({"and": [{">=": [{"var": "temp"}, 20]}, {"<=": [{"var": "temp"}, 30]}]}),
            CaseInput::Sequence(inputs),
            2,
        )];
        let harness = Harness::new(JsonLogicEvaluator);
        let first = harness.run(&cases, &mut ());
        let second = harness.run(&cases, &mut ());

        let a: Vec<_> = first.records().map(|r| r.outputs.clone()).collect();
        let b: Vec<_> = second.records().map(|r| r.outputs.clone()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_failure_continues_by_default() {
        let cases = vec![
            case("ok", json!(1), CaseInput::Single(json!({})), 1),
            case("bad", json!(1), CaseInput::Sequence(vec![json!({}), json!({"boom": 1})]), 1),
            case("after", json!(1), CaseInput::Single(json!({})), 1),
        ];
        let run = Harness::new(Fussy).run(&cases, &mut ());

        assert_eq!(run.results.len(), 3);
        assert!(run.results[0].is_ok());
        let failure = run.results[1].as_ref().unwrap_err();
        assert_eq!(failure.name, "bad");
        assert_eq!(failure.error.message, "boom");
        assert!(run.results[2].is_ok());
        assert!(run.has_failures());
        assert!(!run.aborted);
    }

    #[test]
    fn test_abort_policy_keeps_prefix() {
        let cases = vec![
            case("ok", json!(1), CaseInput::Single(json!({})), 1),
            case("bad", json!(1), CaseInput::Single(json!({"boom": true})), 1),
            case("never", json!(1), CaseInput::Single(json!({})), 1),
        ];
        let run = Harness::new(Fussy)
            .with_policy(FailurePolicy::Abort)
            .run(&cases, &mut ());

        assert_eq!(run.results.len(), 2);
        assert!(run.results[0].is_ok());
        assert!(run.results[1].is_err());
        assert!(run.aborted);
    }

    #[test]
    fn test_abort_on_last_case_is_not_aborted() {
        let cases = vec![case("bad", json!(1), CaseInput::Single(json!({"boom": 1})), 1)];
        let run = Harness::new(Fussy)
            .with_policy(FailurePolicy::Abort)
            .run(&cases, &mut ());
        assert_eq!(run.results.len(), 1);
        assert!(!run.aborted);
    }

    #[test]
    fn test_observer_sees_events_in_order() {
        let cases = vec![
            case("first", json!(1), CaseInput::Single(json!({})), 1),
            case("second", json!(1), CaseInput::Single(json!({"boom": 1})), 1),
        ];
        let mut recorder = Recorder::default();
        Harness::new(Fussy).run(&cases, &mut recorder);

        assert_eq!(
            recorder.events,
            vec![
                "start:2",
                "case:0:first",
                "done:0:true",
                "case:1:second",
                "done:1:false",
                "finish:2",
            ]
        );
    }

    #[test]
    fn test_paired_observers_both_notified() {
        let cases = vec![case("only", json!(1), CaseInput::Single(json!({})), 1)];
        let mut left = Recorder::default();
        let mut right = Recorder::default();
        Harness::new(Echo).run(&cases, &mut (&mut left, &mut right));
        assert_eq!(left.events, right.events);
        assert_eq!(left.events.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_outputs_align_with_inputs(
            values in prop::collection::vec(any::<i64>(), 0..200),
            iterations in 1u64..4,
        ) {
            let inputs: Vec<Value> = values.iter().map(|v| json!(v)).collect();
            let record = Harness::new(Echo)
                .run_case(&case("p", json!(null), CaseInput::Sequence(inputs.clone()), iterations))
                .unwrap();
            prop_assert_eq!(&record.outputs, &inputs);
            prop_assert_eq!(record.pass_times_ms.len() as u64, iterations);
            prop_assert!(record.average_time_ms.is_finite() && record.average_time_ms >= 0.0);
        }

        #[test]
        fn prop_complexity_is_compact_text_length(key in "[a-z]{1,8}", n in any::<i32>()) {
            let rule = json!({ key.clone(): [{"var": key}, n] });
            prop_assert_eq!(complexity_score(&rule), serde_json::to_string(&rule).unwrap().chars().count());
        }
    }
}
