// assay-core/src/application/suite.rs

use chrono::NaiveDate;
use futures::StreamExt; // Extension trait for streams
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::application::branch::run_branch;
use crate::application::column_check::run_column_checks;
use crate::application::interval_check::run_interval_check;
use crate::application::ports::sink::MetadataSink;
use crate::application::sql_check::run_sql_check;
use crate::application::table_check::run_table_checks;
use crate::application::threshold_check::run_threshold_check;
use crate::application::value_check::run_value_check;
use crate::domain::check::branch::BranchDecision;
use crate::domain::check::result::Verdict;
use crate::domain::error::Disposition;
use crate::domain::suite::{CheckSpec, CheckSuite, SuiteCheck};
use crate::error::AssayError;
use crate::ports::connector::Connector;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Logical date of the run; interval checks compare this partition.
    pub ds: NaiveDate,
    /// Only run checks with these names. Empty means every check.
    pub select: Vec<String>,
    pub concurrency: usize,
}

impl RunOptions {
    pub fn new(ds: NaiveDate) -> Self {
        Self {
            ds,
            select: Vec::new(),
            concurrency: 4,
        }
    }

    fn selects(&self, check: &SuiteCheck) -> bool {
        self.select.is_empty() || self.select.iter().any(|s| s == &check.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    Branched,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub kind: &'static str,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u128,
}

impl CheckOutcome {
    pub fn is_failed(&self) -> bool {
        self.status == OutcomeStatus::Failed
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    pub fn success(&self) -> bool {
        !self.outcomes.iter().any(CheckOutcome::is_failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// True when there is at least one failure and every failure is retryable.
    pub fn only_retryable_failures(&self) -> bool {
        let mut failures = self.failures().peekable();
        failures.peek().is_some()
            && failures.all(|o| o.disposition == Some(Disposition::Retryable))
    }
}

/// Runs every selected check of a suite, at most `concurrency` at a time.
///
/// Outcomes keep the declaration order of the suite regardless of completion order.
#[instrument(skip_all, fields(suite = %suite.name))]
pub async fn run_suite(
    connector: &dyn Connector,
    suite: &CheckSuite,
    options: &RunOptions,
    sink: &dyn MetadataSink,
) -> SuiteReport {
    let selected: Vec<&SuiteCheck> = suite.checks.iter().filter(|c| options.selects(c)).collect();
    info!(checks = selected.len(), "🚀 Running suite");

    let outcomes: Vec<CheckOutcome> = futures::stream::iter(selected)
        .map(|check| run_check(connector, check, options.ds, sink))
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let report = SuiteReport {
        suite: suite.name.clone(),
        outcomes,
    };
    if report.success() {
        info!("✅ Suite passed");
    } else {
        warn!(failed = report.failures().count(), "❌ Suite failed");
    }
    report
}

/// Evaluates one check and folds its result or error into an outcome.
pub async fn run_check(
    connector: &dyn Connector,
    check: &SuiteCheck,
    ds: NaiveDate,
    sink: &dyn MetadataSink,
) -> CheckOutcome {
    let start = Instant::now();
    let on_failure = check.on_failure;

    let result: Result<Evaluation, AssayError> = match &check.spec {
        CheckSpec::Column(spec) => run_column_checks(connector, spec, on_failure)
            .await
            .map(Evaluation::Verdict),
        CheckSpec::Table(spec) => run_table_checks(connector, spec, on_failure)
            .await
            .map(Evaluation::Verdict),
        CheckSpec::Value(spec) => run_value_check(connector, spec, on_failure)
            .await
            .map(Evaluation::Verdict),
        CheckSpec::Threshold(spec) => {
            run_threshold_check(connector, &check.name, spec, sink, on_failure)
                .await
                .map(Evaluation::Verdict)
        }
        CheckSpec::Interval(spec) => run_interval_check(connector, spec, ds, on_failure)
            .await
            .map(Evaluation::Verdict),
        CheckSpec::Sql(spec) => run_sql_check(connector, spec, on_failure)
            .await
            .map(Evaluation::Verdict),
        CheckSpec::Branch(spec) => run_branch(connector, spec, on_failure)
            .await
            .map(Evaluation::Branch),
    };

    let mut outcome = CheckOutcome {
        name: check.name.clone(),
        kind: check.spec.kind(),
        status: OutcomeStatus::Passed,
        disposition: None,
        verdict: None,
        branch: None,
        error: None,
        duration_ms: 0,
    };

    match result {
        Ok(Evaluation::Verdict(verdict)) => outcome.verdict = Some(verdict),
        Ok(Evaluation::Branch(decision)) => {
            outcome.status = OutcomeStatus::Branched;
            outcome.branch = Some(decision);
        }
        Err(e) => {
            error!(check = %check.name, disposition = %e.disposition(), "{}", e);
            outcome.status = OutcomeStatus::Failed;
            outcome.disposition = Some(e.disposition());
            outcome.verdict = e.domain().and_then(|d| d.verdict()).cloned();
            outcome.error = Some(e.to_string());
        }
    }
    outcome.duration_ms = start.elapsed().as_millis();
    outcome
}

enum Evaluation {
    Verdict(Verdict),
    Branch(BranchDecision),
}
