// assay/src/commands/query.rs
//
// USE CASE: Execute a raw SQL query (ad-hoc).

use anyhow::Context;
use comfy_table::{Table, presets::UTF8_FULL};

use assay_core::application::{QueryOptions, QueryOutput, execute_query};
use assay_core::domain::check::Row;
use assay_core::infrastructure::adapters::DuckDBConnector;

pub async fn execute(query: String, db_path: String, split_statements: bool) -> anyhow::Result<()> {
    let connector = DuckDBConnector::new(&db_path)
        .with_context(|| format!("Failed to initialize DuckDB at {}", db_path))?;

    let options = QueryOptions {
        split_statements,
        return_last: !split_statements,
        show_return_value_in_logs: true,
    };
    let tables = execute_query(&connector, &query, &[], options, render_tables)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", miette::Report::new(e)))?;

    for table in tables {
        println!("{table}");
    }
    Ok(())
}

/// One table per result set. Columns are positional, the connector returns no names.
fn render_tables(output: QueryOutput) -> Vec<Table> {
    output.iter().map(|rows| render_rows(rows)).collect()
}

fn render_rows(rows: &[Row]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width > 0 {
        table.set_header((0..width).map(|i| format!("#{}", i)).collect::<Vec<_>>());
    }
    for row in rows {
        table.add_row(row.iter().map(|v| v.to_string()).collect::<Vec<_>>());
    }
    table
}
