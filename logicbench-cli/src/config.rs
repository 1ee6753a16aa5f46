//! Run Configuration
//!
//! Everything a run needs, resolved from the command line.

use crate::Cli;
use anyhow::Context;
use logicbench_core::{build_cases, parse_cases, registered_defs, FailurePolicy, TestCase, DEFAULT_ITERATIONS};
use logicbench_report::OutputFormat;
use regex::Regex;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Only cases whose name matches run
    pub filter: Regex,
    /// Case file replacing the built-in suite
    pub cases_file: Option<PathBuf>,
    /// Pass count override for every case
    pub iterations: Option<u64>,
    pub seed: u64,
    pub policy: FailurePolicy,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    /// Case names whose detail panel starts open
    pub expand: Vec<String>,
    pub expand_all: bool,
    /// Rayon pool size, 0 = all cores
    pub threads: usize,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let filter = Regex::new(&cli.filter)
            .with_context(|| format!("invalid filter pattern '{}'", cli.filter))?;
        let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;

        if cli.iterations == Some(0) {
            anyhow::bail!("--iterations must be at least 1");
        }

        Ok(Self {
            filter,
            cases_file: cli.cases.clone(),
            iterations: cli.iterations,
            seed: cli.seed,
            policy: if cli.fail_fast {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Continue
            },
            format,
            output: cli.output.clone(),
            expand: cli.expand.clone(),
            expand_all: cli.expand_all,
            threads: cli.threads,
        })
    }

    /// Seed recorded in the report; generated inputs only exist for the built-in suite
    pub fn report_seed(&self) -> Option<u64> {
        self.cases_file.is_none().then_some(self.seed)
    }

    /// Build the selected cases in run order
    pub fn load_cases(&self) -> anyhow::Result<Vec<TestCase>> {
        match &self.cases_file {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read case file {}", path.display()))?;
                let cases = parse_cases(&json)
                    .with_context(|| format!("failed to load cases from {}", path.display()))?;

                cases
                    .into_iter()
                    .filter(|c| self.filter.is_match(c.name()))
                    .map(|c| match self.iterations {
                        Some(n) => c.with_iterations(n).map_err(anyhow::Error::from),
                        None => Ok(c),
                    })
                    .collect()
            }
            None => {
                let defs: Vec<_> = registered_defs()
                    .into_iter()
                    .filter(|d| self.filter.is_match(d.name))
                    .collect();
                let iterations = self.iterations.unwrap_or(DEFAULT_ITERATIONS);
                Ok(build_cases(&defs, self.seed, iterations)?)
            }
        }
    }
}
