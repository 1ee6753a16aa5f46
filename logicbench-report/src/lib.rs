//! LogicBench Report - Presentation and Output Formats
//!
//! Turns harness results into:
//! - presentation state ([`ViewState`]) with per-row detail panels
//! - a chart of average time per case (terminal and SVG)
//! - a results table (terminal)
//! - JSON, CSV and single-file HTML reports

mod chart;
mod csv;
mod html;
mod json;
mod report;
mod table;
mod view;

pub use chart::{chart_points, render_ascii_chart, render_svg_chart, ChartPoint};
pub use csv::generate_csv_report;
pub use html::generate_html_report;
pub use json::generate_json_report;
pub use report::{
    CaseMetrics, CaseReport, CaseStatus, DetailRow, FailureInfo, Report, ReportMeta,
    ReportSummary, SystemInfo,
};
pub use table::render_table;
pub use view::{Expansion, ViewEvent, ViewState};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with every output value
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Single-file HTML page
    Html,
    /// Chart and table for the terminal
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "html" => Ok(OutputFormat::Html),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
