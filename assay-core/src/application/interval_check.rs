// assay-core/src/application/interval_check.rs

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::application::engine::{conclude, fetch_optional_row, require_row};
use crate::domain::check::interval::IntervalCheck;
use crate::domain::check::result::{CheckResult, Verdict};
use crate::domain::check::scalar::{Row, Scalar};
use crate::domain::compiler::CheckQueryBuilder;
use crate::domain::error::{Disposition, DomainError};
use crate::error::AssayError;
use crate::ports::connector::Connector;

/// Compares metrics for `ds` against the partition `days_back` days earlier.
///
/// Runs exactly two queries: the reference partition first, then the current one.
#[instrument(skip(connector, check), fields(table = %check.table, formula = %check.ratio_formula))]
pub async fn run_interval_check(
    connector: &dyn Connector,
    check: &IntervalCheck,
    ds: NaiveDate,
    on_failure: Disposition,
) -> Result<Verdict, AssayError> {
    let reference_ds = check.reference_date(ds).ok_or_else(|| {
        DomainError::conversion(format!("{} {} days is out of range", ds, check.days_back))
    })?;
    let current_sql = CheckQueryBuilder::interval_sql(check, ds);
    let reference_sql = CheckQueryBuilder::interval_sql(check, reference_ds);

    // Both partitions are queried before either result is checked.
    let reference_row = fetch_optional_row(connector, &reference_sql, &[]).await?;
    let current_row = fetch_optional_row(connector, &current_sql, &[]).await?;
    let reference_row = require_row(reference_row, &reference_sql, on_failure)?;
    let current_row = require_row(current_row, &current_sql, on_failure)?;

    let reference = numeric_metrics(check, &reference_row, &reference_sql)?;
    let current = numeric_metrics(check, &current_row, &current_sql)?;

    let mut results = Vec::with_capacity(reference.len());
    for (&(metric, cur), &(_, past)) in current.iter().zip(reference.iter()) {
        let cmp = check.compare(metric, cur, past);
        info!(
            metric = %cmp.metric,
            current = cmp.current,
            past = cmp.reference,
            ratio = ?cmp.ratio,
            threshold = cmp.threshold,
            "Interval metric"
        );

        let observed = cmp.ratio.map(Scalar::Float).unwrap_or(Scalar::Null);
        let expected = format!("ratio < {:?}", cmp.threshold);
        let result = if cmp.success {
            CheckResult::passed(metric, observed, expected)
        } else {
            let ratio = cmp
                .ratio
                .map(|r| r.to_string())
                .unwrap_or_else(|| "None".to_string());
            warn!("'{}' check failed. {} is above {}", metric, ratio, cmp.threshold);
            CheckResult::failed(
                metric,
                observed,
                expected,
                format!("'{}' check failed. {} is above {:?}", metric, ratio, cmp.threshold),
            )
        };
        results.push(result);
    }

    let verdict = Verdict::new(
        "interval",
        format!("{};\n{}", reference_sql, current_sql),
        vec![reference_row, current_row],
    )
    .with_results(results);

    let failed = verdict.failed_ids().len();
    if failed > 0 {
        warn!("The following {} tests out of {} failed", failed, check.metrics_thresholds.len());
    }
    conclude(verdict, on_failure)
}

/// Zips a returned row with the sorted metric names; every metric must be numeric.
fn numeric_metrics<'a>(
    check: &'a IntervalCheck,
    row: &Row,
    sql: &str,
) -> Result<Vec<(&'a str, f64)>, DomainError> {
    if row.len() < check.metrics_thresholds.len() {
        return Err(DomainError::conversion(format!(
            "query returned {} values for {} metrics: {}",
            row.len(),
            check.metrics_thresholds.len(),
            sql
        )));
    }
    check
        .metrics()
        .zip(row.iter())
        .map(|(metric, value)| {
            value.as_f64().map(|v| (metric, v)).ok_or_else(|| {
                DomainError::conversion(format!(
                    "metric {} returned '{}', expected a number",
                    metric, value
                ))
            })
        })
        .collect()
}
