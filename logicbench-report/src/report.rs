//! Report Data Model

use chrono::{DateTime, Utc};
use logicbench_core::{CaseResult, TimingSummary};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub results: Vec<CaseReport>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// LogicBench version
    pub version: String,
    /// Evaluator under test
    pub evaluator: String,
    pub timestamp: DateTime<Utc>,
    /// Seed for generated inputs; absent when cases came from a file
    pub seed: Option<u64>,
    pub system: SystemInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cpu_cores: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
}

/// One row of the report, in run order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub name: String,
    pub status: CaseStatus,
    pub rule: Value,
    pub complexity_score: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<CaseMetrics>,
    /// Leading (input, output) pairs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail: Vec<DetailRow>,
    /// Every evaluator output, aligned with the case inputs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMetrics {
    pub average_time_ms: f64,
    pub iterations: u64,
    pub inputs: usize,
    /// Spread over the individual passes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passes: Option<TimingSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub input: Value,
    pub output: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    pub evaluator: String,
    pub message: String,
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_cases: usize,
    pub passed: usize,
    pub failed: usize,
    /// The run stopped before every case ran
    pub aborted: bool,
    pub total_duration_ms: f64,
}

impl CaseReport {
    pub fn from_result(result: &CaseResult) -> Self {
        match result {
            Ok(record) => CaseReport {
                name: record.name.clone(),
                status: CaseStatus::Passed,
                rule: record.rule.clone(),
                complexity_score: record.complexity_score,
                metrics: Some(CaseMetrics {
                    average_time_ms: record.average_time_ms,
                    iterations: record.iterations,
                    inputs: record.input_count(),
                    passes: record.timing().ok(),
                }),
                detail: record
                    .detail_rows()
                    .map(|(input, output)| DetailRow {
                        input: input.clone(),
                        output: output.clone(),
                    })
                    .collect(),
                outputs: record.outputs.clone(),
                failure: None,
            },
            Err(failure) => CaseReport {
                name: failure.name.clone(),
                status: CaseStatus::Failed,
                rule: failure.rule.clone(),
                complexity_score: failure.complexity_score,
                metrics: None,
                detail: Vec::new(),
                outputs: Vec::new(),
                failure: Some(FailureInfo {
                    evaluator: failure.error.evaluator.clone(),
                    message: failure.error.message.clone(),
                }),
            },
        }
    }

    pub fn average_time_ms(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.average_time_ms)
    }
}

impl ReportSummary {
    pub fn from_cases(cases: &[CaseReport], aborted: bool, total_duration_ms: f64) -> Self {
        let passed = cases
            .iter()
            .filter(|c| c.status == CaseStatus::Passed)
            .count();
        ReportSummary {
            total_cases: cases.len(),
            passed,
            failed: cases.len() - passed,
            aborted,
            total_duration_ms,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    pub fn passed(name: &str, average_time_ms: f64) -> CaseReport {
        CaseReport {
            name: name.to_string(),
            status: CaseStatus::Passed,
            rule: json!({">=": [{"var": "temp"}, 20]}),
            complexity_score: 26,
            metrics: Some(CaseMetrics {
                average_time_ms,
                iterations: 3,
                inputs: 2,
                passes: None,
            }),
            detail: vec![
                DetailRow {
                    input: json!({"temp": 25}),
                    output: json!(true),
                },
                DetailRow {
                    input: json!({"temp": 5}),
                    output: json!(false),
                },
            ],
            outputs: vec![json!(true), json!(false)],
            failure: None,
        }
    }

    pub fn failed(name: &str) -> CaseReport {
        CaseReport {
            name: name.to_string(),
            status: CaseStatus::Failed,
            rule: json!({"bogus": []}),
            complexity_score: 12,
            metrics: None,
            detail: Vec::new(),
            outputs: Vec::new(),
            failure: Some(FailureInfo {
                evaluator: "test".to_string(),
                message: "unknown operator".to_string(),
            }),
        }
    }

    pub fn report(results: Vec<CaseReport>) -> Report {
        let summary = ReportSummary::from_cases(&results, false, 12.5);
        Report {
            meta: ReportMeta {
                version: "0.1.0".to_string(),
                evaluator: "jsonlogic-rs".to_string(),
                timestamp: Utc::now(),
                seed: Some(42),
                system: SystemInfo {
                    os: "linux".to_string(),
                    arch: "x86_64".to_string(),
                    cpu: "test".to_string(),
                    cpu_cores: 8,
                },
            },
            results,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logicbench_core::{CaseInput, EvalError, Evaluator, Harness, TestCase};
    use serde_json::json;

    struct Strict;

    impl Evaluator for Strict {
        fn name(&self) -> &str {
            "strict"
        }

        fn evaluate(&self, _rule: &Value, data: &Value) -> Result<Value, EvalError> {
            data.get("x")
                .cloned()
                .ok_or_else(|| EvalError::new("strict", "missing x"))
        }
    }

    #[test]
    fn test_from_passed_result() {
        let case = TestCase::new(
            "ok",
            json!({"var": "x"}),
            CaseInput::Sequence(vec![json!({"x": 1}), json!({"x": 2})]),
            2,
        )
        .unwrap();
        let result = Harness::new(Strict).run_case(&case);
        let report = CaseReport::from_result(&result);

        assert_eq!(report.status, CaseStatus::Passed);
        assert_eq!(report.outputs, vec![json!(1), json!(2)]);
        assert_eq!(report.detail.len(), 2);
        assert_eq!(report.detail[1].output, json!(2));
        let metrics = report.metrics.unwrap();
        assert_eq!(metrics.inputs, 2);
        assert_eq!(metrics.iterations, 2);
        assert_eq!(metrics.passes.unwrap().samples, 2);
        assert!(report.failure.is_none());
    }

    #[test]
    fn test_from_failed_result() {
        let case = TestCase::new("bad", json!({"var": "x"}), CaseInput::Single(json!({})), 1).unwrap();
        let report = CaseReport::from_result(&Harness::new(Strict).run_case(&case));

        assert_eq!(report.status, CaseStatus::Failed);
        assert!(report.metrics.is_none());
        assert_eq!(report.complexity_score, 11);
        let failure = report.failure.unwrap();
        assert_eq!(failure.evaluator, "strict");
        assert_eq!(failure.message, "missing x");
    }

    #[test]
    fn test_summary_counts() {
        let cases = vec![fixtures::passed("a", 1.0), fixtures::failed("b"), fixtures::passed("c", 2.0)];
        let summary = ReportSummary::from_cases(&cases, true, 3.0);
        assert_eq!(summary.total_cases, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.aborted);
    }

    #[test]
    fn test_report_survives_serde() {
        let report = fixtures::report(vec![fixtures::passed("a", 0.5), fixtures::failed("b")]);
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.results.len(), 2);
        assert_eq!(back.results[0].detail, report.results[0].detail);
        assert_eq!(back.results[1].status, CaseStatus::Failed);
    }
}
