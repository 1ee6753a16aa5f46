//! LogicBench CLI Library
//!
//! Command-line entry point: parses arguments, builds the selected cases,
//! runs the harness and writes the report.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     logicbench_cli::run()
//! }
//! ```

mod config;
mod executor;

pub use config::RunConfig;
pub use executor::{
    build_report, build_report_meta, execute, format_human_output, Execution, ProgressObserver,
};

use clap::{Parser, Subcommand};
use logicbench_core::{JsonLogicEvaluator, TestCase, DEFAULT_SEED};
use logicbench_report::{
    generate_csv_report, generate_html_report, generate_json_report, OutputFormat, Report,
    ViewState,
};
use rayon::ThreadPoolBuilder;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// LogicBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "logicbench")]
#[command(author, version, about = "Time a JSON Logic evaluator against a suite of rules")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter test cases by regex pattern on their names
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Output format: human, json, csv, html
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON case file to run instead of the built-in suite
    #[arg(long)]
    pub cases: Option<PathBuf>,

    /// Timed passes per case (overrides each case's own count)
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Seed for generated inputs
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Stop at the first failing case
    #[arg(long)]
    pub fail_fast: bool,

    /// Show the data and results of this case (repeatable)
    #[arg(long, value_name = "NAME")]
    pub expand: Vec<String>,

    /// Show the data and results of every case
    #[arg(long)]
    pub expand_all: bool,

    /// Dry run - list cases without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of threads used to generate case inputs
    /// 0 = use all available cores (default)
    #[arg(long, short = 'j', default_value = "0")]
    pub threads: usize,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the cases that would run
    List,
    /// Run the benchmark (default)
    Run,
}

/// Run the LogicBench CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the LogicBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    let config = RunConfig::from_cli(&cli)?;

    if config.threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    match cli.command {
        Some(Commands::List) => list_cases(&config),
        Some(Commands::Run) => run_benchmark(&config),
        None if cli.dry_run => list_cases(&config),
        None => run_benchmark(&config),
    }
}

/// Logs go to stderr so reports on stdout stay machine-readable.
/// `RUST_LOG` takes precedence over the `-v` default.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::new(if verbose {
        "logicbench=debug"
    } else {
        "logicbench=info"
    })
}

fn list_cases(config: &RunConfig) -> anyhow::Result<()> {
    let cases = config.load_cases()?;
    print!("{}", format_plan(&cases));
    Ok(())
}

/// The cases a run would execute, as a tree
pub fn format_plan(cases: &[TestCase]) -> String {
    let mut output = String::from("LogicBench Plan:\n");
    for case in cases {
        output.push_str(&format!(
            "├── {} ({} inputs × {} iterations, complexity {})\n",
            case.name(),
            case.input().len(),
            case.iterations(),
            logicbench_core::complexity_score(case.rule())
        ));
    }
    output.push_str(&format!("{} cases found.\n", cases.len()));
    output
}

fn run_benchmark(config: &RunConfig) -> anyhow::Result<()> {
    let cases = config.load_cases()?;

    if cases.is_empty() {
        eprintln!("No test cases found.");
        return Ok(());
    }

    eprintln!("Running {} cases against {}...\n", cases.len(), JsonLogicEvaluator::NAME);

    let mut execution = execute(&cases, config.policy, ProgressObserver::new());
    apply_expansion(&mut execution.view, config);

    let meta = build_report_meta(JsonLogicEvaluator::NAME, config.report_seed());
    let report = build_report(&execution, meta);

    let output = render(&report, &execution.view, config.format)?;
    write_output(&output, config)?;

    // Exit with appropriate code
    if report.summary.failed > 0 {
        eprintln!("\n{} case(s) failed", report.summary.failed);
        std::process::exit(1);
    }

    Ok(())
}

/// Open the detail panels requested on the command line
pub fn apply_expansion(view: &mut ViewState, config: &RunConfig) {
    if config.expand_all {
        view.expand_all();
        return;
    }
    for name in &config.expand {
        if !view.toggle_named(name) {
            tracing::warn!(case = name.as_str(), "--expand names no case in this run");
        }
    }
}

/// Render a report in the chosen format
pub fn render(report: &Report, view: &ViewState, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report),
        OutputFormat::Html => generate_html_report(report, view.expansion()),
        OutputFormat::Human => format_human_output(report, view),
    })
}

fn write_output(output: &str, config: &RunConfig) -> anyhow::Result<()> {
    if let Some(ref path) = config.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }
    Ok(())
}
