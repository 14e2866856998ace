// assay/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Setup Logging (Tracing) on stderr, so JSON on stdout stays parseable
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            suite,
            db_path,
            ds,
            select,
            format,
            output,
            concurrency,
        } => {
            let args = commands::run::RunArgs {
                suite,
                db_path,
                ds,
                select,
                format,
                output,
                concurrency,
            };
            let code = commands::run::execute(args).await?;
            if code != 0 {
                // Exit with error code for CI/CD
                std::process::exit(code);
            }
        }
        Commands::Render { suite, ds } => commands::render::execute(suite, ds)?,
        Commands::Query {
            query,
            db_path,
            split_statements,
        } => commands::query::execute(query, db_path, split_statements).await?,
    }

    Ok(())
}
