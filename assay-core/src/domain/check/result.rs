// assay-core/src/domain/check/result.rs

use serde::Serialize;
use std::fmt::Write;

use crate::domain::check::scalar::{Row, Scalar, format_rows};

/// Outcome of one individual assertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub check_id: String,
    pub success: bool,
    pub observed: Scalar,
    pub expected: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl CheckResult {
    pub fn passed(check_id: impl Into<String>, observed: Scalar, expected: impl Into<String>) -> Self {
        Self {
            check_id: check_id.into(),
            success: true,
            observed,
            expected: expected.into(),
            message: String::new(),
        }
    }

    pub fn failed(
        check_id: impl Into<String>,
        observed: Scalar,
        expected: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check_id: check_id.into(),
            success: false,
            observed,
            expected: expected.into(),
            message: message.into(),
        }
    }

    pub fn new(
        check_id: impl Into<String>,
        success: bool,
        observed: Scalar,
        expected: impl Into<String>,
    ) -> Self {
        if success {
            Self::passed(check_id, observed, expected)
        } else {
            Self::failed(check_id, observed, expected, "")
        }
    }
}

/// The structured result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Kind of evaluation that produced the verdict, e.g. `column`.
    pub check: String,
    pub query: String,
    /// Rows as returned by the database, kept for the failure report.
    pub rows: Vec<Row>,
    pub results: Vec<CheckResult>,
}

impl Verdict {
    pub fn new(check: impl Into<String>, query: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            check: check.into(),
            query: query.into(),
            rows,
            results: Vec::new(),
        }
    }

    pub fn with_results(mut self, results: Vec<CheckResult>) -> Self {
        self.results = results;
        self
    }

    pub fn overall_success(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures().map(|r| r.check_id.as_str()).collect()
    }

    /// Human readable report listing every failing assertion.
    pub fn failure_report(&self) -> String {
        let mut out = String::from("Test failed.\n");
        let _ = writeln!(out, "Query:\n{}", self.query);
        let _ = writeln!(out, "Results:\n{}", format_rows(&self.rows));
        out.push_str("The following tests have failed:\n");
        for failure in self.failures() {
            let _ = writeln!(out, "\tCheck: {},", failure.check_id);
            let _ = writeln!(out, "\tObserved: {},", failure.observed);
            let _ = write!(out, "\tExpected: {}", failure.expected);
            if failure.message.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, ",\n\tMessage: {}", failure.message);
            }
        }
        out
    }
}
