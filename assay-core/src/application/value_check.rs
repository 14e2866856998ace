// assay-core/src/application/value_check.rs

use tracing::{info, instrument};

use crate::application::engine::{conclude, fetch_first_row};
use crate::domain::check::result::{CheckResult, Verdict};
use crate::domain::check::value::ValueCheck;
use crate::domain::error::Disposition;
use crate::error::AssayError;
use crate::ports::connector::Connector;

/// Compares every value of the first row against the pass value.
#[instrument(skip(connector, check), fields(pass_value = %check.pass_value))]
pub async fn run_value_check(
    connector: &dyn Connector,
    check: &ValueCheck,
    on_failure: Disposition,
) -> Result<Verdict, AssayError> {
    let row = fetch_first_row(connector, &check.sql, &check.params, on_failure).await?;
    info!("Record: {:?}", row);

    let expected = check.expected();
    let mut results = Vec::with_capacity(row.len());
    for (idx, value) in row.iter().enumerate() {
        let success = check.pass_value.matches(value, check.tolerance)?;
        results.push(CheckResult::new(
            format!("value.{}", idx),
            success,
            value.clone(),
            expected.clone(),
        ));
    }

    conclude(
        Verdict::new("value", check.sql.clone(), vec![row]).with_results(results),
        on_failure,
    )
}
