// assay-core/src/domain/error.rs

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::check::result::Verdict;

/// How a failed evaluation is surfaced to the host.
///
/// Driven by the caller's `retry_on_failure` flag. It never changes what an evaluator
/// computes, only how the failure is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    #[default]
    Retryable,
    Fatal,
}

impl Disposition {
    pub fn from_retry_flag(retry_on_failure: bool) -> Self {
        if retry_on_failure {
            Self::Retryable
        } else {
            Self::Fatal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retryable => "retryable",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Invalid check definition. Raised while building a check, before any query runs.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid column check: {0}.")]
    #[diagnostic(
        code(assay::config::unsupported_check),
        help("Supported column checks are: null_check, distinct_check, unique_check, min, max.")
    )]
    UnsupportedColumnCheck(String),

    #[error(
        "Please provide one or more of: less_than, leq_to, greater_than, geq_to, or equal_to in the check '{0}'."
    )]
    #[diagnostic(code(assay::config::missing_comparison))]
    MissingComparison(String),

    #[error("Only supply one of greater_than or geq_to (check '{0}').")]
    #[diagnostic(code(assay::config::conflicting_lower_bounds))]
    ConflictingLowerBounds(String),

    #[error("Only supply one of less_than or leq_to (check '{0}').")]
    #[diagnostic(code(assay::config::conflicting_upper_bounds))]
    ConflictingUpperBounds(String),

    #[error(
        "equal_to cannot be passed with a greater or less than function (check '{0}')."
    )]
    #[diagnostic(
        code(assay::config::equal_to_with_bounds),
        help("To specify 'greater than or equal to' or 'less than or equal to', use geq_to or leq_to.")
    )]
    EqualToWithBounds(String),

    #[error("Inverted bounds in check '{check}': {detail}")]
    #[diagnostic(code(assay::config::inverted_bounds))]
    InvertedBounds { check: String, detail: String },

    #[error("Invalid partition_clause '{0}': semicolons (;) not allowed.")]
    #[diagnostic(code(assay::config::partition_clause))]
    InvalidPartitionClause(String),

    #[error("Invalid ratio formula: {0}. Supported formulas are: max_over_min, relative_diff")]
    #[diagnostic(code(assay::config::ratio_formula))]
    InvalidRatioFormula(String),

    #[error("Column check '{check}' is declared more than once for column '{column}'")]
    #[diagnostic(code(assay::config::duplicate_column_check))]
    DuplicateColumnCheck { column: String, check: String },

    #[error("Check set '{0}' is empty")]
    #[diagnostic(code(assay::config::empty_check_set))]
    EmptyCheckSet(String),
}

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigError),

    #[error("The following query returned zero rows: {query}")]
    #[diagnostic(code(assay::domain::empty_result))]
    EmptyResult {
        query: String,
        disposition: Disposition,
    },

    #[error("{report}")]
    #[diagnostic(code(assay::domain::validation_failure))]
    ValidationFailure {
        verdict: Box<Verdict>,
        report: String,
        disposition: Disposition,
    },

    #[error("Conversion failed: {detail}")]
    #[diagnostic(
        code(assay::domain::conversion),
        help("The query returned a value the check cannot interpret.")
    )]
    Conversion { detail: String },

    #[error("Unexpected query return result '{value}' type '{type_name}'")]
    #[diagnostic(
        code(assay::domain::branch_type),
        help("A branch query must return a boolean, an integer or a boolean-like string.")
    )]
    UnexpectedBranchResult { value: String, type_name: String },
}

impl DomainError {
    pub fn empty_result(query: impl Into<String>, disposition: Disposition) -> Self {
        Self::EmptyResult {
            query: query.into(),
            disposition,
        }
    }

    pub fn conversion(detail: impl Into<String>) -> Self {
        Self::Conversion {
            detail: detail.into(),
        }
    }

    /// Configuration, conversion and branch type errors are always fatal.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::EmptyResult { disposition, .. } | Self::ValidationFailure { disposition, .. } => {
                *disposition
            }
            Self::Configuration(_) | Self::Conversion { .. } | Self::UnexpectedBranchResult { .. } => {
                Disposition::Fatal
            }
        }
    }

    /// The verdict attached to a validation failure, if any.
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            Self::ValidationFailure { verdict, .. } => Some(verdict),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_from_retry_flag() {
        assert_eq!(Disposition::from_retry_flag(true), Disposition::Retryable);
        assert_eq!(Disposition::from_retry_flag(false), Disposition::Fatal);
    }

    #[test]
    fn test_empty_result_follows_caller_policy() {
        let retry = DomainError::empty_result("SELECT 1", Disposition::Retryable);
        let fatal = DomainError::empty_result("SELECT 1", Disposition::Fatal);
        assert_eq!(retry.disposition(), Disposition::Retryable);
        assert_eq!(fatal.disposition(), Disposition::Fatal);
        assert_eq!(
            retry.to_string(),
            "The following query returned zero rows: SELECT 1"
        );
    }

    #[test]
    fn test_config_and_conversion_errors_are_always_fatal() {
        let config: DomainError = ConfigError::InvalidRatioFormula("median".into()).into();
        assert_eq!(config.disposition(), Disposition::Fatal);
        assert_eq!(
            DomainError::conversion("not a number").disposition(),
            Disposition::Fatal
        );
        let branch = DomainError::UnexpectedBranchResult {
            value: "NULL".into(),
            type_name: "null".into(),
        };
        assert_eq!(branch.disposition(), Disposition::Fatal);
    }
}
