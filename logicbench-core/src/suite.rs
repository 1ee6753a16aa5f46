//! Built-in Benchmark Suite
//!
//! Cases are registered with `inventory`, so any crate linked into the
//! binary can contribute its own with `inventory::submit!`. Random inputs
//! come from a `StdRng` seeded per case, which keeps a case's data stable
//! regardless of which other cases are selected and lets cases be built in
//! parallel.

use crate::case::{ensure_unique_names, CaseError, CaseInput, TestCase, DEFAULT_ITERATIONS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde_json::{json, Value};

/// Seed used when none is given
pub const DEFAULT_SEED: u64 = 42;

/// A registered case. `build` returns the rule and its inputs.
#[derive(Debug, Clone, Copy)]
pub struct CaseDef {
    pub name: &'static str,
    /// Position in the run; ties are broken by name
    pub order: u32,
    pub build: fn(&mut StdRng) -> (Value, CaseInput),
}

inventory::collect!(CaseDef);

/// All registered case definitions in run order
pub fn registered_defs() -> Vec<&'static CaseDef> {
    let mut defs: Vec<_> = inventory::iter::<CaseDef>.into_iter().collect();
    defs.sort_by_key(|d| (d.order, d.name));
    defs
}

/// Materialize a set of definitions into test cases
pub fn build_cases(
    defs: &[&CaseDef],
    seed: u64,
    iterations: u64,
) -> Result<Vec<TestCase>, CaseError> {
    let cases = defs
        .par_iter()
        .map(|def| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(u64::from(def.order)));
            let (rule, input) = (def.build)(&mut rng);
            TestCase::new(def.name, rule, input, iterations)
        })
        .collect::<Result<Vec<_>, _>>()?;
    ensure_unique_names(&cases)?;
    Ok(cases)
}

/// Every registered case, built with the default pass count
pub fn builtin_cases(seed: u64) -> Result<Vec<TestCase>, CaseError> {
    build_cases(&registered_defs(), seed, DEFAULT_ITERATIONS)
}

fn repeat(count: usize, value: Value) -> CaseInput {
    CaseInput::Sequence(vec![value; count])
}

fn simple_comparison(_: &mut StdRng) -> (Value, CaseInput) {
    (json!({"==": [{"var": "value"}, 1]}), repeat(100, json!({"value": 1})))
}

fn data_variable_access(_: &mut StdRng) -> (Value, CaseInput) {
    (json!({">=": [{"var": "temp"}, 20]}), repeat(100, json!({"temp": 25})))
}

fn nested_logic(_: &mut StdRng) -> (Value, CaseInput) {
    (
        json!({"and": [
            {">=": [{"var": "temp"}, 20]},
            {"<=": [{"var": "temp"}, 30]}
        ]}),
        repeat(100, json!({"temp": 25})),
    )
}

fn complex_logic(_: &mut StdRng) -> (Value, CaseInput) {
    (
        json!({"if": [
            {">=": [{"var": "temp"}, 30]},
            "hot",
            {"if": [{">=": [{"var": "temp"}, 20]}, "warm", "cold"]}
        ]}),
        repeat(100, json!({"temp": 25})),
    )
}

fn array_operations(rng: &mut StdRng) -> (Value, CaseInput) {
    let inputs = (0..100)
        .map(|_| json!({"reading": rng.gen_range(20..30)}))
        .collect();
    (json!({">=": [{"var": "reading"}, 20]}), CaseInput::Sequence(inputs))
}

fn complex_data_access(_: &mut StdRng) -> (Value, CaseInput) {
    (
        json!({"and": [
            {">=": [{"var": "main.temp"}, 20]},
            {">=": [{"var": "secondary.temp"}, 15]}
        ]}),
        repeat(100, json!({"main": {"temp": 25}, "secondary": {"temp": 22}})),
    )
}

fn large_dataset(rng: &mut StdRng) -> (Value, CaseInput) {
    let inputs = (0..50_000)
        .map(|_| {
            json!({
                "temp": rng.gen::<f64>() * 100.0,
                "humidity": rng.gen::<f64>() * 100.0,
                "field1": 1, "field2": 2, "field3": 3, "field4": 4, "field5": 5,
                "field6": 6, "field7": 7, "field8": 8, "field9": 9, "field10": 10
            })
        })
        .collect();
    (
        json!({"and": [
            {">=": [{"var": "temp"}, 20]},
            {"<=": [{"var": "temp"}, 50]},
            {">=": [{"var": "humidity"}, 20]},
            {"<=": [{"var": "humidity"}, 50]}
        ]}),
        CaseInput::Sequence(inputs),
    )
}

inventory::submit! { CaseDef { name: "Simple Comparison", order: 0, build: simple_comparison } }
inventory::submit! { CaseDef { name: "Data Variable Access", order: 1, build: data_variable_access } }
inventory::submit! { CaseDef { name: "Nested Logic", order: 2, build: nested_logic } }
inventory::submit! { CaseDef { name: "Complex Logic", order: 3, build: complex_logic } }
inventory::submit! { CaseDef { name: "Array Operations", order: 4, build: array_operations } }
inventory::submit! { CaseDef { name: "Complex Data Access", order: 5, build: complex_data_access } }
inventory::submit! { CaseDef { name: "Large Dataset Processing", order: 6, build: large_dataset } }
