//! LogicBench Core - Benchmark Harness
//!
//! Test case definitions, the evaluator boundary, the timed sequential
//! harness and the built-in suite.
//!
//! # Example
//!
//! ```ignore
//! use logicbench_core::{builtin_cases, Harness, JsonLogicEvaluator, DEFAULT_SEED};
//!
//! let cases = builtin_cases(DEFAULT_SEED)?;
//! let run = Harness::new(JsonLogicEvaluator).run(&cases, &mut ());
//! for record in run.records() {
//!     println!("{}: {:.4} ms", record.name, record.average_time_ms);
//! }
//! ```

mod case;
mod evaluator;
mod harness;
mod stats;
mod suite;

pub use case::{ensure_unique_names, parse_cases, CaseError, CaseInput, TestCase, DEFAULT_ITERATIONS};
pub use evaluator::{EvalError, Evaluator, JsonLogicEvaluator};
pub use harness::{
    complexity_score, CaseFailure, CaseResult, FailurePolicy, Harness, HarnessRun, ResultRecord,
    RunObserver, DETAIL_ROW_LIMIT,
};
pub use stats::{summarize, StatsError, TimingSummary};
pub use suite::{build_cases, builtin_cases, registered_defs, CaseDef, DEFAULT_SEED};

// Re-exported for crates registering their own cases
pub use inventory;
pub use rand::rngs::StdRng;
