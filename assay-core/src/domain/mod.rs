pub mod check;
pub mod compiler;
pub mod error;
pub mod suite;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::{ConfigError, Disposition, DomainError};
pub use suite::{CheckSpec, CheckSuite, SuiteCheck};
