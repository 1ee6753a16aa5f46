//! HTML Report
//!
//! Single self-contained page: an SVG line chart of average time per case
//! and a results table whose rows open into (input, output) detail panels.

use crate::chart::{chart_points, render_svg_chart};
use crate::report::{CaseReport, Report};
use crate::view::Expansion;
use std::fmt::Write as _;

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; margin: 2rem; color: #222; }
h1 { font-size: 1.6rem; }
.meta { color: #666; font-size: 0.85rem; margin-bottom: 1.5rem; }
table.results { border-collapse: collapse; width: 100%; max-width: 64rem; }
table.results th, table.results td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #e5e5e5; vertical-align: top; }
table.results tbody tr:nth-child(4n+1) { background: #fafafa; }
td.num { font-family: ui-monospace, monospace; }
pre { margin: 0; max-width: 24rem; overflow-x: auto; font-size: 0.8rem; }
details summary { cursor: pointer; }
table.nested th, table.nested td { padding: 0 0.5rem; }
.error { color: #b00020; }
";

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn pretty(value: &serde_json::Value) -> String {
    escape_html(&serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
}

/// Generate the HTML report. Rows open in `expansion` start expanded.
pub fn generate_html_report(report: &Report, expansion: &Expansion) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>LogicBench Results</title>\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");

    let _ = writeln!(
        html,
        "<h1>{} Performance Benchmark</h1>",
        escape_html(&report.meta.evaluator)
    );
    let _ = writeln!(
        html,
        "<div class=\"meta\">{} &middot; {} ({}, {} cores) &middot; {} cases, {} failed{} &middot; {:.2} ms total</div>",
        report.meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        escape_html(&report.meta.system.cpu),
        escape_html(&report.meta.system.os),
        report.meta.system.cpu_cores,
        report.summary.total_cases,
        report.summary.failed,
        if report.summary.aborted { ", aborted" } else { "" },
        report.summary.total_duration_ms,
    );

    html.push_str(&render_svg_chart(&chart_points(&report.results), 640, 320));

    html.push_str("<table class=\"results\">\n<thead><tr>");
    for header in ["Test Case", "Avg. Time (ms)", "Rule Complexity", "Rule"] {
        let _ = write!(html, "<th>{}</th>", header);
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for (i, case) in report.results.iter().enumerate() {
        write_case_rows(&mut html, case, expansion.is_expanded(i));
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

fn write_case_rows(html: &mut String, case: &CaseReport, open: bool) {
    let time = case
        .average_time_ms()
        .map(|ms| format!("{:.4}", ms))
        .unwrap_or_else(|| "<span class=\"error\">failed</span>".to_string());

    let _ = writeln!(
        html,
        "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\"><pre>{}</pre></td></tr>",
        escape_html(&case.name),
        time,
        case.complexity_score,
        pretty(&case.rule),
    );

    let _ = write!(
        html,
        "<tr><td colspan=\"4\"><details{}><summary>Data &amp; Results</summary>",
        if open { " open" } else { "" }
    );

    if let Some(failure) = &case.failure {
        let _ = write!(
            html,
            "<p class=\"error\">{}: {}</p>",
            escape_html(&failure.evaluator),
            escape_html(&failure.message)
        );
    } else {
        html.push_str("<table class=\"nested\"><thead><tr><th>Data</th><th>Result</th></tr></thead><tbody>");
        for row in &case.detail {
            let _ = write!(
                html,
                "<tr><td><pre>{}</pre></td><td><pre>{}</pre></td></tr>",
                pretty(&row.input),
                pretty(&row.output)
            );
        }
        html.push_str("</tbody></table>");
    }

    html.push_str("</details></td></tr>\n");
}
