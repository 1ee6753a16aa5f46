//! Benchmark Executor
//!
//! Runs the harness with progress reporting, then assembles the report.

use indicatif::{ProgressBar, ProgressStyle};
use logicbench_core::{CaseResult, FailurePolicy, Harness, HarnessRun, JsonLogicEvaluator, RunObserver, TestCase};
use logicbench_report::{
    chart_points, render_ascii_chart, render_table, Report, ReportMeta, ReportSummary, SystemInfo,
    ViewState,
};
use std::time::Instant;

/// Rows in the terminal chart
const CHART_HEIGHT: usize = 10;

/// Shows the currently running case on a progress bar
pub struct ProgressObserver {
    pb: ProgressBar,
}

impl ProgressObserver {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { pb }
    }

    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ProgressObserver {
    fn run_started(&mut self, total: usize) {
        self.pb.set_length(total as u64);
    }

    fn case_started(&mut self, _index: usize, name: &str) {
        self.pb.set_message(format!("Running: {}...", name));
    }

    fn case_finished(&mut self, _index: usize, result: &CaseResult) {
        if let Err(failure) = result {
            self.pb.println(format!("  ✗ {}", failure));
        }
        self.pb.inc(1);
    }

    fn run_finished(&mut self, run: &HarnessRun) {
        if run.aborted {
            self.pb.abandon_with_message("Aborted");
        } else {
            self.pb.finish_with_message("Complete");
        }
    }
}

/// A finished run and the presentation state it produced
pub struct Execution {
    pub run: HarnessRun,
    pub view: ViewState,
    pub duration_ms: f64,
}

/// Run the cases sequentially against the JSON Logic evaluator
pub fn execute(cases: &[TestCase], policy: FailurePolicy, progress: ProgressObserver) -> Execution {
    let harness = Harness::new(JsonLogicEvaluator).with_policy(policy);
    let mut view = ViewState::new();
    let mut progress = progress;

    let start = Instant::now();
    let run = harness.run(cases, &mut (&mut progress, &mut view));
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    tracing::info!(
        cases = run.results.len(),
        failed = run.failures().count(),
        aborted = run.aborted,
        duration_ms,
        "benchmark run finished"
    );

    Execution {
        run,
        view,
        duration_ms,
    }
}

/// Build a complete Report from an execution
pub fn build_report(execution: &Execution, meta: ReportMeta) -> Report {
    let results = execution.view.results().to_vec();
    let summary = ReportSummary::from_cases(&results, execution.run.aborted, execution.duration_ms);
    Report {
        meta,
        results,
        summary,
    }
}

/// Build report metadata
pub fn build_report_meta(evaluator: &str, seed: Option<u64>) -> ReportMeta {
    use chrono::Utc;

    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
    };

    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        evaluator: evaluator.to_string(),
        timestamp: Utc::now(),
        seed,
        system,
    }
}

fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

/// Format output for human-readable display
pub fn format_human_output(report: &Report, view: &ViewState) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format!("{} Performance Benchmark\n", report.meta.evaluator));
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if report.results.is_empty() {
        output.push_str("No results.\n");
    } else {
        output.push_str(&render_ascii_chart(&chart_points(&report.results), CHART_HEIGHT));
        output.push('\n');
        output.push_str(&render_table(&report.results, view.expansion()));
    }

    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Passed: {}  Failed: {}{}\n",
        report.summary.total_cases,
        report.summary.passed,
        report.summary.failed,
        if report.summary.aborted { "  (aborted)" } else { "" }
    ));
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));
    if let Some(seed) = report.meta.seed {
        output.push_str(&format!("  Seed: {}\n", seed));
    }

    output
}
