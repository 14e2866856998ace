// assay-core/src/application/sql_check.rs

use tracing::{info, instrument};

use crate::application::engine::{conclude, fetch_first_row};
use crate::domain::check::result::{CheckResult, Verdict};
use crate::domain::check::sql_check::SqlCheck;
use crate::domain::error::Disposition;
use crate::error::AssayError;
use crate::ports::connector::Connector;

/// Fails when any value of the first row is falsy (NULL, false, 0, empty).
#[instrument(skip(connector, check))]
pub async fn run_sql_check(
    connector: &dyn Connector,
    check: &SqlCheck,
    on_failure: Disposition,
) -> Result<Verdict, AssayError> {
    let row = fetch_first_row(connector, &check.sql, &check.params, on_failure).await?;
    info!("Record: {:?}", row);

    let results = row
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            CheckResult::new(format!("value.{}", idx), value.is_truthy(), value.clone(), "truthy")
        })
        .collect();

    conclude(
        Verdict::new("sql", check.sql.clone(), vec![row]).with_results(results),
        on_failure,
    )
}
