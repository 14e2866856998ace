pub mod suite;

pub use suite::{CheckConfig, SuiteConfig, discover_suites, load_suite, read_suite_config};
