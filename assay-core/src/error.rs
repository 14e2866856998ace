// assay-core/src/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::error::{ConfigError, Disposition, DomainError};
use crate::infrastructure::error::InfrastructureError;

#[derive(Error, Debug, Diagnostic)]
pub enum AssayError {
    // --- ERREURS DU DOMAINE (Specs, Verdicts) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing, Database) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl AssayError {
    /// Whether the host should retry the evaluation or give up.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::Domain(e) => e.disposition(),
            Self::Infrastructure(e) => e.disposition(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.disposition() == Disposition::Retryable
    }

    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for AssayError {
    fn from(err: ConfigError) -> Self {
        AssayError::Domain(DomainError::Configuration(err))
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for AssayError {
    fn from(err: std::io::Error) -> Self {
        AssayError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for AssayError {
    fn from(err: duckdb::Error) -> Self {
        AssayError::Infrastructure(InfrastructureError::from(err))
    }
}
