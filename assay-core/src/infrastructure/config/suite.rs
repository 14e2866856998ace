// assay-core/src/infrastructure/config/suite.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use validator::Validate;
use walkdir::WalkDir;

use crate::domain::check::boolean::parse_loose_boolean;
use crate::domain::check::{
    Bounds, BranchCheck, ColumnCheck, ColumnChecks, IntervalCheck, PartitionClause, PassValue,
    Scalar, SqlCheck, TableCheck, TableChecks, Threshold, ThresholdCheck, ValueCheck,
};
use crate::domain::error::{ConfigError, Disposition};
use crate::domain::suite::{CheckSpec, CheckSuite, SuiteCheck};
use crate::error::AssayError;
use crate::infrastructure::error::InfrastructureError;

pub const RETRY_ENV_VAR: &str = "ASSAY_RETRY_ON_FAILURE";
const SUPPORTED_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

// --- 1. DÉFINITIONS DES STRUCTS (DTOs) ---

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct SuiteConfig {
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default = "default_true")]
    pub retry_on_failure: bool,

    #[validate(length(min = 1), nested)]
    pub checks: Vec<CheckConfig>,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct CheckConfig {
    #[validate(length(min = 1))]
    pub name: String,

    /// Overrides the suite-level flag for this check only.
    #[serde(default)]
    pub retry_on_failure: Option<bool>,

    #[serde(flatten)]
    pub kind: CheckKindConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckKindConfig {
    Column {
        table: String,
        #[serde(default)]
        partition_clause: Option<String>,
        #[serde(default = "default_true")]
        accept_none: bool,
        column_mapping: IndexMap<String, IndexMap<String, ColumnCheckConfig>>,
    },
    Table {
        table: String,
        #[serde(default)]
        partition_clause: Option<String>,
        checks: IndexMap<String, TableCheckConfig>,
    },
    Value {
        sql: String,
        #[serde(default)]
        params: Vec<Scalar>,
        pass_value: Scalar,
        #[serde(default)]
        tolerance: Option<f64>,
    },
    Threshold {
        sql: String,
        min_threshold: Scalar,
        max_threshold: Scalar,
    },
    Interval {
        table: String,
        metrics_thresholds: IndexMap<String, f64>,
        #[serde(default)]
        days_back: Option<i64>,
        #[serde(default)]
        ratio_formula: Option<String>,
        #[serde(default)]
        ignore_zero: Option<bool>,
        #[serde(default)]
        date_filter_column: Option<String>,
    },
    Sql {
        sql: String,
        #[serde(default)]
        params: Vec<Scalar>,
    },
    Branch {
        sql: String,
        #[serde(default)]
        params: Vec<Scalar>,
        follow_if_true: OneOrMany,
        follow_if_false: OneOrMany,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ColumnCheckConfig {
    #[serde(flatten)]
    pub bounds: Bounds,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub partition_clause: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TableCheckConfig {
    pub check_statement: String,
    #[serde(default)]
    pub partition_clause: Option<String>,
}

/// A branch target list written either as one id or as a sequence.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

// --- 2. CONVERSION VERS LE DOMAINE ---

impl SuiteConfig {
    pub fn into_suite(self) -> Result<CheckSuite, ConfigError> {
        let suite_default = self.retry_on_failure;
        let checks = self
            .checks
            .into_iter()
            .map(|check| {
                let retry = check.retry_on_failure.unwrap_or(suite_default);
                Ok(SuiteCheck {
                    spec: check.kind.into_spec(&check.name)?,
                    on_failure: Disposition::from_retry_flag(retry),
                    name: check.name,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(CheckSuite {
            name: self.name,
            checks,
        })
    }
}

impl CheckKindConfig {
    /// Builds the domain spec; every construction-time rule is enforced here.
    pub fn into_spec(self, name: &str) -> Result<CheckSpec, ConfigError> {
        let spec = match self {
            Self::Column {
                table,
                partition_clause,
                accept_none,
                column_mapping,
            } => {
                let mut checks = Vec::new();
                for (column, mapping) in column_mapping {
                    for (kind, raw) in mapping {
                        let mut check = ColumnCheck::new(kind.parse()?, raw.bounds)?;
                        if let Some(tol) = raw.tolerance {
                            check = check.with_tolerance(tol);
                        }
                        if let Some(clause) = PartitionClause::parse_optional(raw.partition_clause.as_deref())? {
                            check = check.with_partition_clause(clause);
                        }
                        checks.push((column.clone(), check));
                    }
                }
                CheckSpec::Column(
                    ColumnChecks::new(table, checks)?
                        .with_partition_clause(PartitionClause::parse_optional(
                            partition_clause.as_deref(),
                        )?)
                        .with_accept_none(accept_none),
                )
            }
            Self::Table {
                table,
                partition_clause,
                checks,
            } => {
                let mut built = Vec::new();
                for (check_name, raw) in checks {
                    let mut check = TableCheck::new(raw.check_statement);
                    if let Some(clause) = PartitionClause::parse_optional(raw.partition_clause.as_deref())? {
                        check = check.with_partition_clause(clause);
                    }
                    built.push((check_name, check));
                }
                CheckSpec::Table(
                    TableChecks::new(table, built)?.with_partition_clause(
                        PartitionClause::parse_optional(partition_clause.as_deref())?,
                    ),
                )
            }
            Self::Value {
                sql,
                params,
                pass_value,
                tolerance,
            } => {
                let mut check =
                    ValueCheck::new(sql, PassValue::from_scalar(&pass_value)).with_params(params);
                if let Some(tol) = tolerance {
                    check = check.with_tolerance(tol);
                }
                CheckSpec::Value(check)
            }
            Self::Threshold {
                sql,
                min_threshold,
                max_threshold,
            } => CheckSpec::Threshold(ThresholdCheck::new(
                sql,
                Threshold::from_scalar(&min_threshold),
                Threshold::from_scalar(&max_threshold),
            )),
            Self::Interval {
                table,
                metrics_thresholds,
                days_back,
                ratio_formula,
                ignore_zero,
                date_filter_column,
            } => {
                let mut check = IntervalCheck::new(table, metrics_thresholds)?;
                if let Some(days) = days_back {
                    check = check.with_days_back(days);
                }
                if let Some(formula) = ratio_formula {
                    check = check.with_ratio_formula(formula.parse()?);
                }
                if let Some(ignore) = ignore_zero {
                    check = check.with_ignore_zero(ignore);
                }
                if let Some(column) = date_filter_column {
                    check = check.with_date_filter_column(column);
                }
                CheckSpec::Interval(check)
            }
            Self::Sql { sql, params } => CheckSpec::Sql(SqlCheck::new(sql).with_params(params)),
            Self::Branch {
                sql,
                params,
                follow_if_true,
                follow_if_false,
            } => CheckSpec::Branch(
                BranchCheck::new(sql, follow_if_true.into_vec(), follow_if_false.into_vec())
                    .with_params(params),
            ),
        };
        debug!(check = name, kind = spec.kind(), "Check configuration built");
        Ok(spec)
    }
}

// --- 3. FONCTIONS DE CHARGEMENT ---

/// Reads, parses and validates one suite file, without building domain specs.
pub fn read_suite_config(path: &Path) -> Result<SuiteConfig, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let mut config: SuiteConfig = serde_yaml::from_str(&content)?;
    config
        .validate()
        .map_err(|source| InfrastructureError::InvalidSuite {
            path: path.display().to_string(),
            source,
        })?;

    // Override via Variables d'Environnement (Pattern 'Layering')
    apply_env_overrides(&mut config)?;
    Ok(config)
}

#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_suite(path: &Path) -> Result<CheckSuite, AssayError> {
    let suite = read_suite_config(path)?.into_suite()?;
    info!(suite = %suite.name, checks = suite.checks.len(), "Suite loaded");
    Ok(suite)
}

/// Loads every YAML suite under `dir`, in path order. A file path loads just that file.
pub fn discover_suites(dir: &Path) -> Result<Vec<CheckSuite>, AssayError> {
    if dir.is_file() {
        return Ok(vec![load_suite(dir)?]);
    }
    if !dir.exists() {
        return Err(InfrastructureError::ConfigNotFound(dir.display().to_string()).into());
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| InfrastructureError::Io(std::io::Error::other(e)))?;
        let is_yaml = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
        if entry.file_type().is_file() && is_yaml {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    if paths.is_empty() {
        warn!(dir = %dir.display(), "No suite files found");
    }
    paths.iter().map(|p| load_suite(p)).collect()
}

fn apply_env_overrides(config: &mut SuiteConfig) -> Result<(), InfrastructureError> {
    if let Ok(val) = std::env::var(RETRY_ENV_VAR) {
        let retry = parse_loose_boolean(&val)
            .map_err(|e| InfrastructureError::ConfigError(format!("{}: {}", RETRY_ENV_VAR, e)))?;
        info!(old = config.retry_on_failure, new = retry, "Overriding retry_on_failure via ENV");
        config.retry_on_failure = retry;
    }
    Ok(())
}
