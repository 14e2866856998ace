// assay-core/src/application/column_check.rs

use std::collections::HashMap;
use tracing::{info, instrument};

use crate::application::engine::{conclude, fetch_rows};
use crate::domain::check::column::{ColumnChecks, column_check_id};
use crate::domain::check::result::{CheckResult, Verdict};
use crate::domain::check::scalar::Scalar;
use crate::domain::compiler::CheckQueryBuilder;
use crate::domain::error::{Disposition, DomainError};
use crate::error::AssayError;
use crate::ports::connector::Connector;

/// Evaluates every column check of a table with a single query.
#[instrument(skip(connector, checks), fields(table = %checks.table, checks = checks.len()))]
pub async fn run_column_checks(
    connector: &dyn Connector,
    checks: &ColumnChecks,
    on_failure: Disposition,
) -> Result<Verdict, AssayError> {
    // 1. Build
    let sql = CheckQueryBuilder::column_checks_sql(checks);

    // 2. Execute
    let rows = fetch_rows(connector, &sql, &[]).await?;
    if rows.is_empty() {
        return Err(DomainError::empty_result(sql, on_failure).into());
    }
    info!("Record: {:?}", rows);

    // 3. Evaluate: (col_name, check_type) -> check_result
    let mut observed: HashMap<(String, String), Scalar> = HashMap::new();
    for row in &rows {
        let [column, check, result] = row.as_slice() else {
            return Err(DomainError::conversion(format!(
                "column check rows have 3 values, got {}",
                row.len()
            ))
            .into());
        };
        observed.insert((column.to_string(), check.to_string()), result.clone());
    }

    let mut results = Vec::with_capacity(checks.len());
    for (column, check) in checks.iter() {
        let id = column_check_id(column, check.kind);
        let expected = check.expected();
        let key = (column.to_string(), check.kind.as_str().to_string());

        let result = match observed.remove(&key) {
            None => CheckResult::failed(id, Scalar::Null, expected, "no result returned"),
            Some(Scalar::Null) if checks.accept_none => {
                CheckResult::new(id, check.matches(0.0), Scalar::Null, expected)
            }
            Some(Scalar::Null) => {
                CheckResult::failed(id, Scalar::Null, expected, "NULL result with accept_none disabled")
            }
            Some(value) => {
                let numeric = value.as_f64().ok_or_else(|| {
                    DomainError::conversion(format!(
                        "check {} returned non-numeric value '{}'",
                        id, value
                    ))
                })?;
                CheckResult::new(id, check.matches(numeric), value, expected)
            }
        };
        results.push(result);
    }

    // 4. Report
    conclude(Verdict::new("column", sql, rows).with_results(results), on_failure)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::check::bounds::Bounds;
    use crate::domain::check::column::{ColumnCheck, ColumnCheckKind};
    use crate::ports::mock::MockConnector;
    use crate::row;

    fn age_checks() -> ColumnChecks {
        ColumnChecks::new(
            "people",
            [
                (
                    "age",
                    ColumnCheck::new(ColumnCheckKind::Min, Bounds::greater_than(0.0)).unwrap(),
                ),
                (
                    "age",
                    ColumnCheck::new(ColumnCheckKind::Max, Bounds::less_than(150.0)).unwrap(),
                ),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_failure_lists_failing_checks() {
        let connector = MockConnector::with_responses(vec![vec![
            row!["age", "min", -1_i64],
            row!["age", "max", 40_i64],
        ]]);

        let err = run_column_checks(&connector, &age_checks(), Disposition::Retryable)
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        let verdict = err.domain().and_then(|d| d.verdict()).unwrap();
        assert_eq!(verdict.failed_ids(), vec!["age.min"]);
        assert!(err.to_string().contains("Check: age.min"));
        assert_eq!(connector.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_all_passing() {
        let connector = MockConnector::with_responses(vec![vec![
            row!["age", "min", 18_i64],
            row!["age", "max", 99.5],
        ]]);
        let verdict = run_column_checks(&connector, &age_checks(), Disposition::Fatal)
            .await
            .unwrap();
        assert!(verdict.overall_success());
        assert_eq!(verdict.results.len(), 2);
    }

    #[tokio::test]
    async fn test_same_rows_same_verdict() {
        let rows = vec![row!["age", "min", 3_i64], row!["age", "max", 4_i64]];
        let connector = MockConnector::with_responses(vec![rows.clone(), rows]);
        let first = run_column_checks(&connector, &age_checks(), Disposition::Fatal)
            .await
            .unwrap();
        let second = run_column_checks(&connector, &age_checks(), Disposition::Fatal)
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_zero_rows_is_empty_result() {
        let connector = MockConnector::with_responses(vec![vec![]]);
        let err = run_column_checks(&connector, &age_checks(), Disposition::Fatal)
            .await
            .unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::EmptyResult { .. })));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_null_handling_follows_accept_none() {
        let checks = ColumnChecks::new(
            "people",
            [(
                "email",
                ColumnCheck::new(ColumnCheckKind::NullCheck, Bounds::equal_to(0.0)).unwrap(),
            )],
        )
        .unwrap();
        let null_row = vec![row!["email", "null_check", Scalar::Null]];

        let connector = MockConnector::with_responses(vec![null_row.clone()]);
        assert!(run_column_checks(&connector, &checks, Disposition::Fatal).await.is_ok());

        let strict = checks.with_accept_none(false);
        let connector = MockConnector::with_responses(vec![null_row]);
        assert!(run_column_checks(&connector, &strict, Disposition::Fatal).await.is_err());
    }

    #[tokio::test]
    async fn test_non_numeric_result_is_fatal() {
        let connector = MockConnector::with_responses(vec![vec![
            row!["age", "min", "abc"],
            row!["age", "max", 1_i64],
        ]]);
        let err = run_column_checks(&connector, &age_checks(), Disposition::Retryable)
            .await
            .unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::Conversion { .. })));
        assert!(!err.is_retryable());
    }
}
