//! CSV Report Generation
//!
//! One row per case, in run order.

use crate::report::{CaseStatus, Report};

/// Generate a CSV report
///
/// # CSV Columns
/// - `name` - Test case name
/// - `status` - passed/failed
/// - `average_time_ms` - Mean wall-clock time of one pass
/// - `complexity_score` - Length of the rule's compact JSON text
/// - `iterations` / `inputs` - Pass count and evaluator calls per pass
/// - `median_ms` / `min_ms` / `max_ms` / `std_dev_ms` - Spread over passes
/// - `error` - Evaluator message for failed cases
pub fn generate_csv_report(report: &Report) -> String {
    let mut csv = String::new();

    csv.push_str("name,status,average_time_ms,complexity_score,iterations,inputs,median_ms,min_ms,max_ms,std_dev_ms,error\n");

    for result in &report.results {
        let status = match result.status {
            CaseStatus::Passed => "passed",
            CaseStatus::Failed => "failed",
        };

        match &result.metrics {
            Some(metrics) => {
                let spread = match &metrics.passes {
                    Some(p) => format!(
                        "{:.6},{:.6},{:.6},{:.6}",
                        p.median_ms, p.min_ms, p.max_ms, p.std_dev_ms
                    ),
                    None => ",,,".to_string(),
                };
                csv.push_str(&format!(
                    "{},{},{:.6},{},{},{},{},\n",
                    escape_field(&result.name),
                    status,
                    metrics.average_time_ms,
                    result.complexity_score,
                    metrics.iterations,
                    metrics.inputs,
                    spread,
                ));
            }
            None => {
                let error = result
                    .failure
                    .as_ref()
                    .map(|f| escape_field(&f.message))
                    .unwrap_or_default();
                csv.push_str(&format!(
                    "{},{},,{},,,,,,,{}\n",
                    escape_field(&result.name),
                    status,
                    result.complexity_score,
                    error,
                ));
            }
        }
    }

    csv
}

/// Quote a field when it contains a separator, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
