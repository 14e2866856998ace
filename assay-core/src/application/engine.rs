// assay-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, info, instrument};

// Imports Hexagonaux corrects
use crate::domain::check::result::Verdict;
use crate::domain::check::scalar::{Row, Scalar, format_rows};
use crate::domain::compiler::split_statements;
use crate::domain::error::{Disposition, DomainError};
use crate::error::AssayError;
use crate::ports::connector::Connector;

/// Runs a query through the connector with instrumentation (logs + timing).
#[instrument(skip(connector, params), fields(engine = connector.engine_name(), query.len = query.len()))]
pub async fn fetch_rows(
    connector: &dyn Connector,
    query: &str,
    params: &[Scalar],
) -> Result<Vec<Row>, AssayError> {
    let start = Instant::now();
    debug!("⚡ Executing Query: {}", query);

    match connector.fetch_all(query, params).await {
        Ok(rows) => {
            debug!(rows = rows.len(), "✅ Query finished in {:.2?}", start.elapsed());
            Ok(rows)
        }
        Err(e) => {
            // On log l'erreur ici pour avoir le contexte de temps
            error!("❌ Query failed after {:.2?}: {}", start.elapsed(), e);
            Err(e)
        }
    }
}

/// First row of a query, `None` when it returns nothing.
pub async fn fetch_optional_row(
    connector: &dyn Connector,
    query: &str,
    params: &[Scalar],
) -> Result<Option<Row>, AssayError> {
    let start = Instant::now();
    debug!("⚡ Executing Query: {}", query);

    let row = connector.fetch_first(query, params).await.inspect_err(|e| {
        error!("❌ Query failed after {:.2?}: {}", start.elapsed(), e);
    })?;
    debug!("✅ Query finished in {:.2?}", start.elapsed());
    Ok(row)
}

/// First row of a query; no row at all, or a row without values, is an `EmptyResult`
/// classified by `on_failure`.
pub async fn fetch_first_row(
    connector: &dyn Connector,
    query: &str,
    params: &[Scalar],
    on_failure: Disposition,
) -> Result<Row, AssayError> {
    let row = fetch_optional_row(connector, query, params).await?;
    require_row(row, query, on_failure)
}

pub fn require_row(row: Option<Row>, query: &str, on_failure: Disposition) -> Result<Row, AssayError> {
    match row {
        Some(row) if !row.is_empty() => Ok(row),
        _ => Err(DomainError::empty_result(query, on_failure).into()),
    }
}

/// Turns a verdict into the evaluator's return value: the verdict itself when every
/// assertion held, a `ValidationFailure` carrying it otherwise.
pub fn conclude(verdict: Verdict, on_failure: Disposition) -> Result<Verdict, AssayError> {
    if verdict.overall_success() {
        info!(check = %verdict.check, "All tests have passed");
        return Ok(verdict);
    }
    let report = verdict.failure_report();
    Err(DomainError::ValidationFailure {
        verdict: Box::new(verdict),
        report,
        disposition: on_failure,
    }
    .into())
}

// --- RAW QUERY EXECUTION ---

#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// Run each `;`-separated statement on its own.
    pub split_statements: bool,
    /// Keep only the result set of the last statement.
    pub return_last: bool,
    pub show_return_value_in_logs: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            split_statements: false,
            return_last: true,
            show_return_value_in_logs: false,
        }
    }
}

/// One result set per statement executed.
pub type QueryOutput = Vec<Vec<Row>>;

pub fn default_output_processor(output: QueryOutput) -> QueryOutput {
    output
}

/// Executes SQL and hands the result sets to `output_processor`.
///
/// Hosts that need to post-process rows pass their own processor instead of
/// `default_output_processor`.
#[instrument(skip_all, fields(engine = connector.engine_name()))]
pub async fn execute_query<T, F>(
    connector: &dyn Connector,
    sql: &str,
    params: &[Scalar],
    options: QueryOptions,
    output_processor: F,
) -> Result<T, AssayError>
where
    F: FnOnce(QueryOutput) -> T,
{
    let statements = if options.split_statements {
        split_statements(sql)?
    } else {
        vec![sql.to_string()]
    };

    let mut output: QueryOutput = Vec::with_capacity(statements.len());
    for statement in &statements {
        output.push(fetch_rows(connector, statement, params).await?);
    }

    if options.return_last && output.len() > 1 {
        output = output.split_off(output.len() - 1);
    }

    if options.show_return_value_in_logs {
        for rows in &output {
            info!("Query returned: {}", format_rows(rows));
        }
    }

    Ok(output_processor(output))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::check::result::CheckResult;
    use crate::ports::mock::MockConnector;
    use crate::row;

    #[tokio::test]
    async fn test_execute_query_default_processor() {
        let connector = MockConnector::with_responses(vec![vec![row![1_i64, "a"]]]);

        let output = execute_query(
            &connector,
            "SELECT 1, 'a'",
            &[],
            QueryOptions::default(),
            default_output_processor,
        )
        .await
        .unwrap();

        assert_eq!(output, vec![vec![row![1_i64, "a"]]]);
        assert_eq!(connector.queries(), vec!["SELECT 1, 'a'"]);
    }

    #[tokio::test]
    async fn test_split_statements_with_custom_processor() {
        let connector = MockConnector::with_responses(vec![
            vec![],
            vec![row![3_i64]],
        ]);
        let options = QueryOptions {
            split_statements: true,
            ..QueryOptions::default()
        };

        let count = execute_query(
            &connector,
            "INSERT INTO t VALUES (1); SELECT COUNT(*) FROM t;",
            &[],
            options,
            |output| output.iter().map(Vec::len).sum::<usize>(),
        )
        .await
        .unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            connector.queries(),
            vec!["INSERT INTO t VALUES (1)", "SELECT COUNT(*) FROM t"]
        );
    }

    #[tokio::test]
    async fn test_all_result_sets_when_not_return_last() {
        let connector = MockConnector::with_responses(vec![vec![row![1_i64]], vec![row![2_i64]]]);
        let options = QueryOptions {
            split_statements: true,
            return_last: false,
            show_return_value_in_logs: true,
        };
        let output = execute_query(&connector, "SELECT 1; SELECT 2", &[], options, default_output_processor)
            .await
            .unwrap();
        assert_eq!(output.len(), 2);
    }

    #[tokio::test]
    async fn test_first_row_missing_is_empty_result() {
        let connector = MockConnector::new();
        let err = fetch_first_row(&connector, "SELECT 1", &[], Disposition::Fatal)
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "The following query returned zero rows: SELECT 1");
    }

    #[tokio::test]
    async fn test_row_without_values_is_empty_result() {
        let connector = MockConnector::with_responses(vec![vec![vec![]]]);
        let err = fetch_first_row(&connector, "SELECT", &[], Disposition::Retryable)
            .await
            .unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::EmptyResult { .. })));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_conclude() {
        let ok = Verdict::new("sql", "SELECT 1", vec![])
            .with_results(vec![CheckResult::new("sql", true, Scalar::Int(1), "truthy")]);
        assert!(conclude(ok, Disposition::Fatal).is_ok());

        let failed = Verdict::new("sql", "SELECT 0", vec![])
            .with_results(vec![CheckResult::new("sql", false, Scalar::Int(0), "truthy")]);
        let err = conclude(failed, Disposition::Retryable).unwrap_err();
        assert!(err.is_retryable());
        let verdict = err.domain().and_then(|d| d.verdict()).unwrap();
        assert_eq!(verdict.failed_ids(), vec!["sql"]);
    }
}
