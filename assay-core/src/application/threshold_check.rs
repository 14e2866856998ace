// assay-core/src/application/threshold_check.rs

use tracing::{info, instrument};

use crate::application::engine::{conclude, fetch_first_row};
use crate::application::ports::sink::MetadataSink;
use crate::domain::check::result::{CheckResult, Verdict};
use crate::domain::check::scalar::Scalar;
use crate::domain::check::threshold::{Threshold, ThresholdCheck, ThresholdRecord};
use crate::domain::error::{Disposition, DomainError};
use crate::error::AssayError;
use crate::ports::connector::Connector;

/// Checks that the first value of a query lies within `[min_threshold, max_threshold]`.
///
/// SQL-valued bounds cost one extra query each. The observation is handed to `sink`
/// whether or not it passes.
#[instrument(skip(connector, check, sink))]
pub async fn run_threshold_check(
    connector: &dyn Connector,
    name: &str,
    check: &ThresholdCheck,
    sink: &dyn MetadataSink,
    on_failure: Disposition,
) -> Result<Verdict, AssayError> {
    let row = fetch_first_row(connector, &check.sql, &[], on_failure).await?;
    let Some(observed) = row.first().cloned() else {
        return Err(DomainError::empty_result(check.sql.clone(), on_failure).into());
    };
    let result = match &observed {
        Scalar::Null => None,
        value => Some(value.as_f64().ok_or_else(|| {
            DomainError::conversion(format!("threshold result '{}' is not numeric", value))
        })?),
    };

    let lower = resolve_bound(connector, &check.min_threshold, on_failure).await?;
    let upper = resolve_bound(connector, &check.max_threshold, on_failure).await?;

    let record = ThresholdRecord::evaluate(name, result, lower, upper);
    sink.record(&record);

    let expected = format!("between {:?} and {:?}", lower, upper);
    let outcome = if record.within_threshold {
        info!("Test {} Successful.", name);
        CheckResult::passed(name, observed, expected)
    } else {
        CheckResult::failed(name, observed, expected, record.failure_message())
    };

    conclude(
        Verdict::new("threshold", check.sql.clone(), vec![row]).with_results(vec![outcome]),
        on_failure,
    )
}

async fn resolve_bound(
    connector: &dyn Connector,
    threshold: &Threshold,
    on_failure: Disposition,
) -> Result<f64, AssayError> {
    match threshold {
        Threshold::Literal(value) => Ok(*value),
        Threshold::Query(sql) => {
            let row = fetch_first_row(connector, sql, &[], on_failure).await?;
            let value = row.first().cloned().unwrap_or(Scalar::Null);
            value.as_f64().ok_or_else(|| {
                DomainError::conversion(format!(
                    "threshold query '{}' returned '{}', expected a number",
                    sql, value
                ))
                .into()
            })
        }
    }
}
