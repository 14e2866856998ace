// assay-core/src/domain/check/table.rs

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::check::partition::PartitionClause;
use crate::domain::error::ConfigError;

/// A named boolean SQL predicate that must hold on every row in scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCheck {
    pub check_statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_clause: Option<PartitionClause>,
}

impl TableCheck {
    pub fn new(check_statement: impl Into<String>) -> Self {
        Self {
            check_statement: check_statement.into(),
            partition_clause: None,
        }
    }

    pub fn with_partition_clause(mut self, clause: PartitionClause) -> Self {
        self.partition_clause = Some(clause);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableChecks {
    pub table: String,
    pub partition_clause: Option<PartitionClause>,
    checks: IndexMap<String, TableCheck>,
}

impl TableChecks {
    pub fn new<I, S>(table: impl Into<String>, checks: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, TableCheck)>,
        S: Into<String>,
    {
        let table = table.into();
        let checks: IndexMap<String, TableCheck> =
            checks.into_iter().map(|(name, c)| (name.into(), c)).collect();
        if checks.is_empty() {
            return Err(ConfigError::EmptyCheckSet(table));
        }
        Ok(Self {
            table,
            partition_clause: None,
            checks,
        })
    }

    pub fn with_partition_clause(mut self, clause: Option<PartitionClause>) -> Self {
        self.partition_clause = clause;
        self
    }

    pub fn get(&self, name: &str) -> Option<&TableCheck> {
        self.checks.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableCheck)> {
        self.checks.iter().map(|(name, c)| (name.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
