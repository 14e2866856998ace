// assay/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assay")]
#[command(about = "Declarative SQL data-quality checks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Debug logs on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs check suites against a DuckDB database
    Run {
        /// Suite file, or directory searched recursively for *.yml / *.yaml
        #[arg(long)]
        suite: PathBuf,

        #[arg(long, default_value = "assay.duckdb", env = "ASSAY_DB_PATH")]
        db_path: String,

        /// Logical date (YYYY-MM-DD) for interval checks. Defaults to today.
        #[arg(long)]
        ds: Option<NaiveDate>,

        /// Run only the named checks (repeatable)
        #[arg(long, short)]
        select: Vec<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also write the JSON report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Checks evaluated at the same time
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },

    /// 🧾 Prints the SQL each check would run, without touching a database
    Render {
        #[arg(long)]
        suite: PathBuf,

        #[arg(long)]
        ds: Option<NaiveDate>,
    },

    /// ⚡ Executes a raw SQL query (Ad-hoc)
    Query {
        query: String,

        #[arg(long, default_value = "assay.duckdb", env = "ASSAY_DB_PATH")]
        db_path: String,

        /// Run each `;`-separated statement and print every result set
        #[arg(long)]
        split_statements: bool,
    },
}
