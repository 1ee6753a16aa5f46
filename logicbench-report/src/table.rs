//! Terminal Results Table
//!
//! One row per case with its timing, complexity score and rule. Rows whose
//! detail panel is expanded list their leading (input, output) pairs.

use crate::report::CaseReport;
use crate::view::Expansion;
use std::fmt::Write as _;

const HEADERS: [&str; 4] = ["Test Case", "Avg. Time (ms)", "Rule Complexity", "Rule"];

fn time_cell(case: &CaseReport) -> String {
    match case.average_time_ms() {
        Some(ms) => format!("{:.4}", ms),
        None => "failed".to_string(),
    }
}

pub fn render_table(results: &[CaseReport], expansion: &Expansion) -> String {
    let rows: Vec<([String; 3], Vec<String>)> = results
        .iter()
        .enumerate()
        .map(|(i, case)| {
            let marker = if expansion.is_expanded(i) { 'v' } else { '>' };
            let cells = [
                format!("{} {}", marker, case.name),
                time_cell(case),
                case.complexity_score.to_string(),
            ];
            (cells, rule_lines(&case.rule))
        })
        .collect();

    let mut widths = [HEADERS[0].len(), HEADERS[1].len(), HEADERS[2].len()];
    for (cells, _) in &rows {
        for (w, cell) in widths.iter_mut().zip(cells.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let rule_width = rows
        .iter()
        .flat_map(|(_, lines)| lines.iter().map(|l| l.chars().count()))
        .fold(HEADERS[3].len(), usize::max);

    let mut out = String::new();
    let header = [HEADERS[0], HEADERS[1], HEADERS[2]].map(String::from);
    write_row(&mut out, &header, HEADERS[3], &widths);
    let mut separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    separator.push("-".repeat(rule_width));
    let _ = writeln!(out, "{}", separator.join("-+-"));

    let blank = [String::new(), String::new(), String::new()];
    for (i, ((cells, lines), case)) in rows.iter().zip(results).enumerate() {
        for (n, line) in lines.iter().enumerate() {
            // Rule text continues below the first line with the other cells empty
            let cells = if n == 0 { cells } else { &blank };
            write_row(&mut out, cells, line, &widths);
        }
        if expansion.is_expanded(i) {
            write_detail(&mut out, case);
        }
    }

    out
}

/// Pretty-printed rule, one entry per line
fn rule_lines(rule: &serde_json::Value) -> Vec<String> {
    serde_json::to_string_pretty(rule)
        .unwrap_or_else(|_| rule.to_string())
        .lines()
        .map(String::from)
        .collect()
}

fn write_row(out: &mut String, cells: &[String; 3], rule: &str, widths: &[usize; 3]) {
    let mut padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(col, (cell, w))| {
            // Numeric columns are right-aligned
            if col == 0 {
                format!("{:<w$}", cell, w = *w)
            } else {
                format!("{:>w$}", cell, w = *w)
            }
        })
        .collect();
    padded.push(rule.to_string());
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

fn write_detail(out: &mut String, case: &CaseReport) {
    if let Some(failure) = &case.failure {
        let _ = writeln!(out, "    error ({}): {}", failure.evaluator, failure.message);
        return;
    }

    let total = case.metrics.as_ref().map_or(case.detail.len(), |m| m.inputs);
    let _ = writeln!(
        out,
        "    showing {} of {} inputs",
        case.detail.len(),
        total
    );
    for (idx, row) in case.detail.iter().enumerate() {
        let _ = writeln!(out, "    [{:>3}] {} => {}", idx, row.input, row.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;
    use crate::view::{ViewEvent, ViewState};

    fn view(results: Vec<CaseReport>) -> ViewState {
        let mut view = ViewState::new();
        view.apply(ViewEvent::RunCompleted(results));
        view
    }

    #[test]
    fn test_collapsed_rows_hide_detail() {
        let view = view(vec![fixtures::passed("Nested Logic", 0.1234)]);
        let table = render_table(view.results(), view.expansion());

        assert!(table.lines().next().unwrap().starts_with("Test Case"));
        assert!(table.contains("> Nested Logic"));
        assert!(table.contains("0.1234"));
        assert!(!table.contains("=>"));
    }

    #[test]
    fn test_rule_is_pretty_printed() {
        let view = view(vec![fixtures::passed("Nested Logic", 0.5)]);
        let table = render_table(view.results(), view.expansion());
        let lines: Vec<&str> = table.lines().collect();

        // header, separator, then one line per line of the pretty rule
        assert_eq!(lines.len(), 2 + 8);
        assert!(lines[2].starts_with("> Nested Logic"));
        assert!(lines[2].ends_with("| {"));
        assert!(lines[3].ends_with(r#"|   ">=": ["#));
        assert!(lines[5].ends_with(r#"|       "var": "temp""#));
        assert!(lines[3].trim_start().starts_with('|'));
    }

    #[test]
    fn test_expanded_row_shows_pairs() {
        let mut view = view(vec![fixtures::passed("a", 1.0), fixtures::passed("b", 2.0)]);
        view.toggle(1);
        let table = render_table(view.results(), view.expansion());

        assert!(table.contains("> a"));
        assert!(table.contains("v b"));
        assert_eq!(table.matches("showing 2 of 2 inputs").count(), 1);
        assert!(table.contains(r#"[  0] {"temp":25} => true"#));
        assert!(table.contains(r#"[  1] {"temp":5} => false"#));
    }

    #[test]
    fn test_failed_row() {
        let mut view = view(vec![fixtures::failed("broken")]);
        view.toggle(0);
        let table = render_table(view.results(), view.expansion());

        assert!(table.contains("failed"));
        assert!(table.contains("error (test): unknown operator"));
    }
}
