// assay-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::error::Disposition;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(assay::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(assay::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(assay::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Suite configuration not found at '{0}'")]
    #[diagnostic(code(assay::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Invalid suite '{path}': {source}")]
    #[diagnostic(
        code(assay::infra::invalid_suite),
        help("A suite needs a non-empty name and at least one check.")
    )]
    InvalidSuite {
        path: String,
        #[source]
        source: validator::ValidationErrors,
    },

    // --- REPORTS ---
    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(assay::infra::json))]
    Json(#[from] serde_json::Error),
}

impl InfrastructureError {
    /// Database and IO trouble may go away on a retry; a broken configuration will not.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::Database(_) | Self::Io(_) => Disposition::Retryable,
            Self::YamlError(_)
            | Self::ConfigError(_)
            | Self::ConfigNotFound(_)
            | Self::InvalidSuite { .. }
            | Self::Json(_) => Disposition::Fatal,
        }
    }
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
