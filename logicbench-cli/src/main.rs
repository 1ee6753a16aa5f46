//! LogicBench CLI
//!
//! Times a JSON Logic evaluator against the built-in suite or a case file.

fn main() -> anyhow::Result<()> {
    logicbench_cli::run()
}
