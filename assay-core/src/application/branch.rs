// assay-core/src/application/branch.rs

use tracing::{info, instrument};

use crate::application::engine::fetch_first_row;
use crate::domain::check::branch::{BranchCheck, BranchDecision, evaluate_branch};
use crate::domain::check::scalar::Scalar;
use crate::domain::error::Disposition;
use crate::error::AssayError;
use crate::ports::connector::Connector;

/// Runs the branch query and picks which downstream ids to follow.
#[instrument(skip(connector, check))]
pub async fn run_branch(
    connector: &dyn Connector,
    check: &BranchCheck,
    on_failure: Disposition,
) -> Result<BranchDecision, AssayError> {
    info!("Executing: {} (with parameters {:?})", check.sql, check.params);
    let row = fetch_first_row(connector, &check.sql, &check.params, on_failure).await?;

    let value = row.first().cloned().unwrap_or(Scalar::Null);
    info!("Query returns {}, type '{}'", value, value.type_name());

    let decision = check.decide(evaluate_branch(&value)?);
    info!(outcome = decision.outcome, follow = ?decision.follow, "Branch decided");
    Ok(decision)
}
