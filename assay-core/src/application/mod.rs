// assay-core/src/application/mod.rs

pub mod branch;
pub mod column_check;
pub mod engine;
pub mod interval_check;
pub mod ports;
pub mod sql_check;
pub mod suite;
pub mod table_check;
pub mod threshold_check;
pub mod value_check;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI peut faire `use assay_core::application::{run_suite, execute_query};`
// sans connaître la structure interne des fichiers.

pub use branch::run_branch;
pub use column_check::run_column_checks;
pub use engine::{QueryOptions, QueryOutput, default_output_processor, execute_query};
pub use interval_check::run_interval_check;
pub use ports::{LogSink, MemorySink, MetadataSink};
pub use sql_check::run_sql_check;
pub use suite::{CheckOutcome, OutcomeStatus, RunOptions, SuiteReport, run_check, run_suite};
pub use table_check::run_table_checks;
pub use threshold_check::run_threshold_check;
pub use value_check::run_value_check;
