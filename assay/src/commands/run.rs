// assay/src/commands/run.rs
//
// USE CASE: Run check suites and report.

use anyhow::Context;
use chrono::NaiveDate;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::path::PathBuf;

use assay_core::AssayError;
use assay_core::application::{LogSink, OutcomeStatus, RunOptions, SuiteReport, run_suite};
use assay_core::infrastructure::adapters::DuckDBConnector;
use assay_core::infrastructure::config::discover_suites;
use assay_core::infrastructure::report::write_json_report;

use crate::cli::OutputFormat;

/// `EX_TEMPFAIL`: every failure may pass on a retry.
pub const EXIT_RETRYABLE: i32 = 75;
pub const EXIT_FATAL: i32 = 1;

pub struct RunArgs {
    pub suite: PathBuf,
    pub db_path: String,
    pub ds: Option<NaiveDate>,
    pub select: Vec<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub concurrency: usize,
}

pub async fn execute(args: RunArgs) -> anyhow::Result<i32> {
    let start = std::time::Instant::now();

    // A. Load the suites (Infra). Construction errors surface before any query runs.
    let suites = match discover_suites(&args.suite) {
        Ok(suites) => suites,
        Err(e) => return Ok(report_error(e)),
    };

    // B. Instantiate the DB Adapter
    let connector = DuckDBConnector::new(&args.db_path)
        .with_context(|| format!("Failed to initialize DuckDB at {}", args.db_path))?;

    // C. Run every suite (Application Layer)
    let options = RunOptions {
        ds: args.ds.unwrap_or_else(|| chrono::Local::now().date_naive()),
        select: args.select,
        concurrency: args.concurrency,
    };
    let mut reports = Vec::with_capacity(suites.len());
    for suite in &suites {
        reports.push(run_suite(&connector, suite, &options, &LogSink).await);
    }

    // D. Report
    if let Some(path) = &args.output {
        write_json_report(path, &reports)
            .with_context(|| format!("Failed to write report to {:?}", path))?;
    }
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Table => {
            println!("{}", render_table(&reports));
            let failed: usize = reports.iter().map(|r| r.failures().count()).sum();
            if failed == 0 {
                println!("\n✨ SUCCESS! Checks finished in {:.2?}", start.elapsed());
            } else {
                println!("\n❌ FAILURE. {} checks failed.", failed);
            }
        }
    }

    Ok(exit_code(&reports))
}

fn report_error(err: AssayError) -> i32 {
    let code = if err.is_retryable() {
        EXIT_RETRYABLE
    } else {
        EXIT_FATAL
    };
    eprintln!("{:?}", miette::Report::new(err));
    code
}

/// 0 when every suite passed, 75 when all failures are retryable, 1 otherwise.
pub fn exit_code(reports: &[SuiteReport]) -> i32 {
    if reports.iter().all(SuiteReport::success) {
        return 0;
    }
    let all_retryable = reports
        .iter()
        .filter(|r| !r.success())
        .all(SuiteReport::only_retryable_failures);
    if all_retryable {
        EXIT_RETRYABLE
    } else {
        EXIT_FATAL
    }
}

fn render_table(reports: &[SuiteReport]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Suite", "Check", "Kind", "Status", "Details"]);

    for report in reports {
        for outcome in &report.outcomes {
            let status = match outcome.status {
                OutcomeStatus::Passed => "✅ passed".to_string(),
                OutcomeStatus::Branched => "🔀 branched".to_string(),
                OutcomeStatus::Failed => match outcome.disposition {
                    Some(disposition) => format!("❌ failed ({})", disposition),
                    None => "❌ failed".to_string(),
                },
            };
            let details = match (&outcome.branch, &outcome.verdict, &outcome.error) {
                (Some(branch), _, _) => format!("follow: {}", branch.follow.join(", ")),
                (_, Some(verdict), Some(_)) => {
                    format!("failed: {}", verdict.failed_ids().join(", "))
                }
                (_, _, Some(error)) => error.lines().next().unwrap_or_default().to_string(),
                (_, Some(verdict), None) => format!("{} assertions", verdict.results.len()),
                (None, None, None) => String::new(),
            };
            table.add_row(vec![
                report.suite.clone(),
                outcome.name.clone(),
                outcome.kind.to_string(),
                status,
                details,
            ]);
        }
    }
    table
}
