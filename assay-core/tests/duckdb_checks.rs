//! End-to-end evaluation of checks against an in-memory DuckDB.

use anyhow::Result;
use chrono::NaiveDate;

use assay_core::application::{
    MemorySink, QueryOptions, RunOptions, default_output_processor, execute_query, run_branch,
    run_column_checks, run_interval_check, run_suite, run_table_checks, run_threshold_check,
    run_value_check,
};
use assay_core::domain::check::{
    Bounds, BranchCheck, ColumnCheck, ColumnCheckKind, ColumnChecks, IntervalCheck,
    PartitionClause, PassValue, Scalar, TableCheck, TableChecks, Threshold, ThresholdCheck,
    ValueCheck,
};
use assay_core::domain::{CheckSpec, CheckSuite, Disposition, DomainError, SuiteCheck};
use assay_core::infrastructure::DuckDBConnector;
use assay_core::ports::Connector;

async fn people() -> Result<DuckDBConnector> {
    let connector = DuckDBConnector::new(":memory:")?;
    connector
        .execute(
            "CREATE TABLE people (id INTEGER, name VARCHAR, age INTEGER, ds DATE);
             INSERT INTO people VALUES
                (1, 'ada', 36, DATE '2024-01-08'),
                (2, 'alan', 41, DATE '2024-01-08'),
                (3, 'grace', -1, DATE '2024-01-01');",
        )
        .await?;
    Ok(connector)
}

fn ds() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
}

#[tokio::test]
async fn test_column_checks_report_failing_aggregate() -> Result<()> {
    let conn = people().await?;
    let checks = ColumnChecks::new(
        "people",
        [
            ("age", ColumnCheck::new(ColumnCheckKind::Min, Bounds::greater_than(0.0))?),
            ("age", ColumnCheck::new(ColumnCheckKind::Max, Bounds::less_than(150.0))?),
            ("name", ColumnCheck::new(ColumnCheckKind::NullCheck, Bounds::equal_to(0.0))?),
        ],
    )?;

    let err = run_column_checks(&conn, &checks, Disposition::Fatal)
        .await
        .unwrap_err();
    assert_eq!(err.disposition(), Disposition::Fatal);
    match err.domain() {
        Some(DomainError::ValidationFailure { verdict, report, .. }) => {
            assert_eq!(verdict.failed_ids(), vec!["age.min"]);
            assert!(report.contains("Check: age.min"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_partition_clause_narrows_column_checks() -> Result<()> {
    let conn = people().await?;
    let checks = ColumnChecks::new(
        "people",
        [("age", ColumnCheck::new(ColumnCheckKind::Min, Bounds::greater_than(0.0))?)],
    )?
    .with_partition_clause(Some(PartitionClause::new("ds = DATE '2024-01-08'")?));

    let verdict = run_column_checks(&conn, &checks, Disposition::Fatal).await?;
    assert!(verdict.overall_success());
    Ok(())
}

#[tokio::test]
async fn test_table_checks() -> Result<()> {
    let conn = people().await?;
    let checks = TableChecks::new(
        "people",
        [
            ("row_count", TableCheck::new("COUNT(*) = 3")),
            ("ids_unique", TableCheck::new("COUNT(DISTINCT id) = COUNT(*)")),
        ],
    )?;

    let verdict = run_table_checks(&conn, &checks, Disposition::Fatal).await?;
    assert_eq!(verdict.results.len(), 2);
    assert!(verdict.overall_success());

    let failing = TableChecks::new("people", [("adults", TableCheck::new("MIN(age) >= 18"))])?;
    let err = run_table_checks(&conn, &failing, Disposition::Retryable)
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    Ok(())
}

#[tokio::test]
async fn test_value_check_with_params_and_tolerance() -> Result<()> {
    let conn = people().await?;
    let check = ValueCheck::new(
        "SELECT AVG(age) FROM people WHERE age > ?",
        PassValue::Numeric(40.0),
    )
    .with_params(vec![Scalar::Int(0)])
    .with_tolerance(0.1);

    let verdict = run_value_check(&conn, &check, Disposition::Fatal).await?;
    assert!(verdict.overall_success());

    let text = ValueCheck::new("SELECT name FROM people WHERE id = 1", PassValue::parse("ada"));
    assert!(run_value_check(&conn, &text, Disposition::Fatal).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn test_threshold_with_sql_bound_records_metadata() -> Result<()> {
    let conn = people().await?;
    let sink = MemorySink::new();
    let check = ThresholdCheck {
        sql: "SELECT COUNT(*) FROM people".into(),
        min_threshold: Threshold::Literal(1.0),
        max_threshold: Threshold::Query("SELECT MAX(id) - 1 FROM people".into()),
    };

    let err = run_threshold_check(&conn, "people_count", &check, &sink, Disposition::Fatal)
        .await
        .unwrap_err();
    assert!(!err.is_retryable());

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].result, Some(3.0));
    assert_eq!(records[0].max_threshold, 2.0);
    assert!(!records[0].within_threshold);
    Ok(())
}

#[tokio::test]
async fn test_interval_check_compares_against_past_partition() -> Result<()> {
    let conn = people().await?;

    let strict = IntervalCheck::new("people", [("COUNT(*)", 1.5)])?;
    let err = run_interval_check(&conn, &strict, ds(), Disposition::Fatal)
        .await
        .unwrap_err();
    match err.domain() {
        Some(DomainError::ValidationFailure { verdict, .. }) => {
            assert_eq!(verdict.failed_ids(), vec!["COUNT(*)"]);
            assert_eq!(verdict.results[0].observed, Scalar::Float(2.0));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let loose = IntervalCheck::new("people", [("COUNT(*)", 2.5)])?;
    let verdict = run_interval_check(&conn, &loose, ds(), Disposition::Fatal).await?;
    assert!(verdict.overall_success());
    Ok(())
}

#[tokio::test]
async fn test_branch_follows_query_result() -> Result<()> {
    let conn = people().await?;
    let check = BranchCheck::new(
        "SELECT COUNT(*) > 2 FROM people",
        vec!["load".into()],
        vec!["skip".into(), "alert".into()],
    );

    let decision = run_branch(&conn, &check, Disposition::Fatal).await?;
    assert!(decision.outcome);
    assert_eq!(decision.follow, vec!["load"]);
    Ok(())
}

#[tokio::test]
async fn test_execute_query_splits_statements() -> Result<()> {
    let conn = people().await?;
    let options = QueryOptions {
        split_statements: true,
        ..QueryOptions::default()
    };

    let output = execute_query(
        &conn,
        "INSERT INTO people VALUES (4, 'edsger', 72, DATE '2024-01-08'); SELECT COUNT(*) FROM people;",
        &[],
        options,
        default_output_processor,
    )
    .await?;
    assert_eq!(output, vec![vec![vec![Scalar::Int(4)]]]);
    Ok(())
}

#[tokio::test]
async fn test_suite_isolates_failures() -> Result<()> {
    let conn = people().await?;
    let suite = CheckSuite {
        name: "people".into(),
        checks: vec![
            SuiteCheck {
                name: "missing_table".into(),
                on_failure: Disposition::Retryable,
                spec: CheckSpec::Table(TableChecks::new(
                    "nowhere",
                    [("count", TableCheck::new("COUNT(*) > 0"))],
                )?),
            },
            SuiteCheck {
                name: "row_count".into(),
                on_failure: Disposition::Fatal,
                spec: CheckSpec::Value(ValueCheck::new(
                    "SELECT COUNT(*) FROM people",
                    PassValue::Numeric(3.0),
                )),
            },
        ],
    };

    let report = run_suite(&conn, &suite, &RunOptions::new(ds()), &MemorySink::new()).await;
    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes[0].is_failed());
    assert!(report.outcomes[0].error.is_some());
    assert!(!report.outcomes[1].is_failed());
    assert!(report.only_retryable_failures());
    Ok(())
}
