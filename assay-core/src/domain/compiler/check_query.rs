// assay-core/src/domain/compiler/check_query.rs
//
// Turns check sets into the single SQL statement that computes all of their results.
// Identifiers and statements are inserted verbatim.

use chrono::NaiveDate;

use crate::domain::check::column::ColumnChecks;
use crate::domain::check::interval::IntervalCheck;
use crate::domain::check::partition::where_clause;
use crate::domain::check::table::TableChecks;

pub struct CheckQueryBuilder;

impl CheckQueryBuilder {
    /// One `UNION ALL` branch per (column, check), returning `(col_name, check_type, check_result)`.
    pub fn column_checks_sql(checks: &ColumnChecks) -> String {
        let fragments: Vec<String> = checks
            .iter()
            .map(|(column, check)| {
                let alias = format!("{}_{}", column, check.kind);
                let filter = where_clause(
                    checks.partition_clause.as_ref(),
                    check.partition_clause.as_ref(),
                );
                format!(
                    "SELECT '{column}' AS col_name, '{kind}' AS check_type, {alias} AS check_result \
                     FROM (SELECT {agg} AS {alias} FROM {table}{filter}) AS sq",
                    kind = check.kind,
                    agg = check.kind.aggregate(column),
                    table = checks.table,
                )
            })
            .collect();

        format!(
            "SELECT col_name, check_type, check_result FROM ({}) AS check_columns",
            fragments.join(" UNION ALL ")
        )
    }

    /// One `UNION ALL` branch per named predicate, returning `(check_name, check_result)`.
    ///
    /// `check_result` is 1 when the predicate holds on every row in scope.
    pub fn table_checks_sql(checks: &TableChecks) -> String {
        let fragments: Vec<String> = checks
            .iter()
            .map(|(name, check)| {
                let filter = where_clause(
                    checks.partition_clause.as_ref(),
                    check.partition_clause.as_ref(),
                );
                format!(
                    "SELECT '{name}' AS check_name, MIN({name}) AS check_result \
                     FROM (SELECT CASE WHEN {stmt} THEN 1 ELSE 0 END AS {name} FROM {table}{filter}) AS sq",
                    stmt = check.check_statement,
                    table = checks.table,
                )
            })
            .collect();

        format!(
            "SELECT check_name, check_result FROM ({}) AS check_table",
            fragments.join(" UNION ALL ")
        )
    }

    /// Selects every metric, in sorted order, for one date partition.
    pub fn interval_sql(check: &IntervalCheck, ds: NaiveDate) -> String {
        let metrics: Vec<&str> = check.metrics().collect();
        format!(
            "SELECT {} FROM {} WHERE {}='{}'",
            metrics.join(", "),
            check.table,
            check.date_filter_column,
            ds.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::check::bounds::Bounds;
    use crate::domain::check::column::{ColumnCheck, ColumnCheckKind};
    use crate::domain::check::partition::PartitionClause;
    use crate::domain::check::table::TableCheck;
    use sqlparser::dialect::GenericDialect;
    use sqlparser::parser::Parser;

    fn assert_parses(sql: &str) {
        let parsed = Parser::parse_sql(&GenericDialect {}, sql);
        assert!(parsed.is_ok(), "generated SQL does not parse: {:?}\n{}", parsed, sql);
    }

    fn people_checks() -> ColumnChecks {
        ColumnChecks::new(
            "people",
            [
                (
                    "age",
                    ColumnCheck::new(ColumnCheckKind::Min, Bounds::greater_than(0.0)).unwrap(),
                ),
                (
                    "age",
                    ColumnCheck::new(ColumnCheckKind::NullCheck, Bounds::equal_to(0.0))
                        .unwrap()
                        .with_partition_clause(PartitionClause::new("id > 0").unwrap()),
                ),
                (
                    "name",
                    ColumnCheck::new(ColumnCheckKind::DistinctCheck, Bounds::geq_to(1.0)).unwrap(),
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_single_column_check() {
        let checks = ColumnChecks::new(
            "people",
            [(
                "age",
                ColumnCheck::new(ColumnCheckKind::Min, Bounds::greater_than(0.0)).unwrap(),
            )],
        )
        .unwrap();

        insta::assert_snapshot!(
            CheckQueryBuilder::column_checks_sql(&checks),
            @"SELECT col_name, check_type, check_result FROM (SELECT 'age' AS col_name, 'min' AS check_type, age_min AS check_result FROM (SELECT MIN(age) AS age_min FROM people) AS sq) AS check_columns"
        );
    }

    #[test]
    fn test_one_branch_per_column_check() {
        let sql = CheckQueryBuilder::column_checks_sql(&people_checks());
        assert_eq!(sql.matches(" UNION ALL ").count(), 2);
        assert!(sql.contains("SUM(CASE WHEN age IS NULL THEN 1 ELSE 0 END) AS age_null_check FROM people WHERE id > 0"));
        assert!(sql.contains("COUNT(DISTINCT(name)) AS name_distinct_check FROM people) AS sq"));
        assert_parses(&sql);
    }

    #[test]
    fn test_global_and_local_partitions_are_conjoined() {
        let checks = people_checks()
            .with_partition_clause(Some(PartitionClause::new("ds = '2024-01-01'").unwrap()));
        let sql = CheckQueryBuilder::column_checks_sql(&checks);

        assert!(sql.contains("FROM people WHERE ds = '2024-01-01' AND id > 0"));
        assert_eq!(sql.matches("WHERE ds = '2024-01-01'").count(), 3);
        assert_parses(&sql);
    }

    #[test]
    fn test_table_checks() {
        let checks = TableChecks::new(
            "people",
            [
                ("row_count", TableCheck::new("COUNT(*) = 3")),
                (
                    "adults",
                    TableCheck::new("age >= 18")
                        .with_partition_clause(PartitionClause::new("age IS NOT NULL").unwrap()),
                ),
            ],
        )
        .unwrap();

        insta::assert_snapshot!(
            CheckQueryBuilder::table_checks_sql(&checks),
            @"SELECT check_name, check_result FROM (SELECT 'row_count' AS check_name, MIN(row_count) AS check_result FROM (SELECT CASE WHEN COUNT(*) = 3 THEN 1 ELSE 0 END AS row_count FROM people) AS sq UNION ALL SELECT 'adults' AS check_name, MIN(adults) AS check_result FROM (SELECT CASE WHEN age >= 18 THEN 1 ELSE 0 END AS adults FROM people WHERE age IS NOT NULL) AS sq) AS check_table"
        );
    }

    #[test]
    fn test_interval_queries() {
        let check = IntervalCheck::new("events", [("COUNT(*)", 1.5), ("AVG(amount)", 0.5)])
            .unwrap()
            .with_date_filter_column("event_date");
        let ds = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

        let sql = CheckQueryBuilder::interval_sql(&check, ds);
        assert_eq!(
            sql,
            "SELECT AVG(amount), COUNT(*) FROM events WHERE event_date='2024-01-08'"
        );
        assert_parses(&sql);
    }
}
