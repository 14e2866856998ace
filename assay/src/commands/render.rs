// assay/src/commands/render.rs
//
// USE CASE: Show the SQL of each check (dry run).

use chrono::NaiveDate;
use std::path::PathBuf;

use assay_core::domain::compiler::CheckQueryBuilder;
use assay_core::domain::{CheckSpec, CheckSuite};
use assay_core::infrastructure::config::discover_suites;

pub fn execute(suite: PathBuf, ds: Option<NaiveDate>) -> anyhow::Result<()> {
    let ds = ds.unwrap_or_else(|| chrono::Local::now().date_naive());
    let suites =
        discover_suites(&suite).map_err(|e| anyhow::anyhow!("{:?}", miette::Report::new(e)))?;

    for suite in &suites {
        print!("{}", render_suite(suite, ds));
    }
    Ok(())
}

pub fn render_suite(suite: &CheckSuite, ds: NaiveDate) -> String {
    let mut out = format!("-- suite: {}\n", suite.name);
    for check in &suite.checks {
        out.push_str(&format!(
            "\n-- check: {} ({}, on failure: {})\n",
            check.name,
            check.spec.kind(),
            check.on_failure
        ));
        for sql in check_sql(&check.spec, ds) {
            out.push_str(sql.trim_end_matches(';'));
            out.push_str(";\n");
        }
    }
    out
}

/// Every statement a check issues, in execution order.
fn check_sql(spec: &CheckSpec, ds: NaiveDate) -> Vec<String> {
    match spec {
        CheckSpec::Column(checks) => vec![CheckQueryBuilder::column_checks_sql(checks)],
        CheckSpec::Table(checks) => vec![CheckQueryBuilder::table_checks_sql(checks)],
        CheckSpec::Value(check) => vec![check.sql.clone()],
        CheckSpec::Sql(check) => vec![check.sql.clone()],
        CheckSpec::Branch(check) => vec![check.sql.clone()],
        CheckSpec::Threshold(check) => {
            let mut sql = vec![check.sql.clone()];
            sql.extend(check.min_threshold.query().map(str::to_string));
            sql.extend(check.max_threshold.query().map(str::to_string));
            sql
        }
        CheckSpec::Interval(check) => match check.reference_date(ds) {
            Some(reference) => vec![
                CheckQueryBuilder::interval_sql(check, reference),
                CheckQueryBuilder::interval_sql(check, ds),
            ],
            None => vec![CheckQueryBuilder::interval_sql(check, ds)],
        },
    }
}
