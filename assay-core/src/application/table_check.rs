// assay-core/src/application/table_check.rs

use std::collections::HashMap;
use tracing::{info, instrument};

use crate::application::engine::{conclude, fetch_rows};
use crate::domain::check::boolean::parse_loose_boolean;
use crate::domain::check::result::{CheckResult, Verdict};
use crate::domain::check::scalar::Scalar;
use crate::domain::check::table::TableChecks;
use crate::domain::compiler::CheckQueryBuilder;
use crate::domain::error::{Disposition, DomainError};
use crate::error::AssayError;
use crate::ports::connector::Connector;

/// Evaluates named row predicates with a single query.
#[instrument(skip(connector, checks), fields(table = %checks.table, checks = checks.len()))]
pub async fn run_table_checks(
    connector: &dyn Connector,
    checks: &TableChecks,
    on_failure: Disposition,
) -> Result<Verdict, AssayError> {
    // 1. Build
    let sql = CheckQueryBuilder::table_checks_sql(checks);

    // 2. Execute
    let rows = fetch_rows(connector, &sql, &[]).await?;
    if rows.is_empty() {
        return Err(DomainError::empty_result(sql, on_failure).into());
    }
    info!("Record: {:?}", rows);

    // 3. Evaluate
    let mut observed: HashMap<String, Scalar> = HashMap::new();
    for row in &rows {
        let [name, result] = row.as_slice() else {
            return Err(DomainError::conversion(format!(
                "table check rows have 2 values, got {}",
                row.len()
            ))
            .into());
        };
        observed.insert(name.to_string(), result.clone());
    }

    let mut results = Vec::with_capacity(checks.len());
    for (name, check) in checks.iter() {
        let expected = check.check_statement.clone();
        let result = match observed.remove(name) {
            None => CheckResult::failed(name, Scalar::Null, expected, "no result returned"),
            Some(value) => {
                let success = parse_loose_boolean(&value.to_string())?;
                CheckResult::new(name, success, value, expected)
            }
        };
        results.push(result);
    }

    // 4. Report
    conclude(Verdict::new("table", sql, rows).with_results(results), on_failure)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::check::table::TableCheck;
    use crate::ports::mock::MockConnector;
    use crate::row;

    fn checks() -> TableChecks {
        TableChecks::new(
            "people",
            [
                ("row_count", TableCheck::new("COUNT(*) = 3")),
                ("adults", TableCheck::new("age >= 18")),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_failing_predicate() {
        let connector = MockConnector::with_responses(vec![vec![
            row!["row_count", 1_i64],
            row!["adults", 0_i64],
        ]]);
        let err = run_table_checks(&connector, &checks(), Disposition::Fatal)
            .await
            .unwrap_err();
        let verdict = err.domain().and_then(|d| d.verdict()).unwrap();
        assert_eq!(verdict.failed_ids(), vec!["adults"]);
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_passing_predicates() {
        let connector = MockConnector::with_responses(vec![vec![
            row!["row_count", 1_i64],
            row!["adults", true],
        ]]);
        let verdict = run_table_checks(&connector, &checks(), Disposition::Fatal)
            .await
            .unwrap();
        assert!(verdict.overall_success());
    }

    #[tokio::test]
    async fn test_null_result_is_a_conversion_error() {
        let connector = MockConnector::with_responses(vec![vec![
            row!["row_count", Scalar::Null],
            row!["adults", 1_i64],
        ]]);
        let err = run_table_checks(&connector, &checks(), Disposition::Retryable)
            .await
            .unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::Conversion { .. })));
    }
}
