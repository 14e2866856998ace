// assay-core/src/domain/check/column.rs

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::check::bounds::Bounds;
use crate::domain::check::partition::PartitionClause;
use crate::domain::error::ConfigError;

/// The fixed set of per-column aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnCheckKind {
    NullCheck,
    DistinctCheck,
    UniqueCheck,
    Min,
    Max,
}

impl ColumnCheckKind {
    pub const ALL: [ColumnCheckKind; 5] = [
        Self::NullCheck,
        Self::DistinctCheck,
        Self::UniqueCheck,
        Self::Min,
        Self::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NullCheck => "null_check",
            Self::DistinctCheck => "distinct_check",
            Self::UniqueCheck => "unique_check",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// The aggregate expression computing this check over `column`.
    pub fn aggregate(&self, column: &str) -> String {
        match self {
            Self::NullCheck => format!("SUM(CASE WHEN {} IS NULL THEN 1 ELSE 0 END)", column),
            Self::DistinctCheck => format!("COUNT(DISTINCT({}))", column),
            Self::UniqueCheck => format!("COUNT({}) - COUNT(DISTINCT({}))", column, column),
            Self::Min => format!("MIN({})", column),
            Self::Max => format!("MAX({})", column),
        }
    }
}

impl fmt::Display for ColumnCheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnCheckKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnsupportedColumnCheck(s.to_string()))
    }
}

/// One assertion on one column aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCheck {
    pub kind: ColumnCheckKind,
    #[serde(flatten)]
    pub bounds: Bounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_clause: Option<PartitionClause>,
}

impl ColumnCheck {
    pub fn new(kind: ColumnCheckKind, bounds: Bounds) -> Result<Self, ConfigError> {
        bounds.validate(kind.as_str())?;
        Ok(Self {
            kind,
            bounds,
            tolerance: None,
            partition_clause: None,
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_partition_clause(mut self, clause: PartitionClause) -> Self {
        self.partition_clause = Some(clause);
        self
    }

    pub fn matches(&self, observed: f64) -> bool {
        self.bounds.matches(observed, self.tolerance)
    }

    pub fn expected(&self) -> String {
        self.bounds.describe(self.tolerance)
    }
}

/// Column checks against one table: column -> check kind -> check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnChecks {
    pub table: String,
    pub partition_clause: Option<PartitionClause>,
    /// Treat NULL aggregates as 0.
    pub accept_none: bool,
    columns: IndexMap<String, IndexMap<ColumnCheckKind, ColumnCheck>>,
}

impl ColumnChecks {
    pub fn new<I, S>(table: impl Into<String>, checks: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, ColumnCheck)>,
        S: Into<String>,
    {
        let table = table.into();
        let mut columns: IndexMap<String, IndexMap<ColumnCheckKind, ColumnCheck>> =
            IndexMap::new();
        for (column, check) in checks {
            let column: String = column.into();
            let kinds = columns.entry(column.clone()).or_default();
            if kinds.contains_key(&check.kind) {
                return Err(ConfigError::DuplicateColumnCheck {
                    column,
                    check: check.kind.to_string(),
                });
            }
            kinds.insert(check.kind, check);
        }
        if columns.is_empty() {
            return Err(ConfigError::EmptyCheckSet(table));
        }
        Ok(Self {
            table,
            partition_clause: None,
            accept_none: true,
            columns,
        })
    }

    pub fn with_partition_clause(mut self, clause: Option<PartitionClause>) -> Self {
        self.partition_clause = clause;
        self
    }

    pub fn with_accept_none(mut self, accept_none: bool) -> Self {
        self.accept_none = accept_none;
        self
    }

    pub fn get(&self, column: &str, kind: ColumnCheckKind) -> Option<&ColumnCheck> {
        self.columns.get(column).and_then(|checks| checks.get(&kind))
    }

    /// Every (column, check) pair, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnCheck)> {
        self.columns
            .iter()
            .flat_map(|(column, checks)| checks.values().map(move |c| (column.as_str(), c)))
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Identifier of a column check in results: `<column>.<check>`.
pub fn column_check_id(column: &str, kind: ColumnCheckKind) -> String {
    format!("{}.{}", column, kind)
}
