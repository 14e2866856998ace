// assay-core/src/domain/check/partition.rs

use serde::Serialize;
use std::fmt;

use crate::domain::error::ConfigError;

/// A `WHERE` fragment restricting the rows a check looks at.
///
/// Not escaped. The only guard is the rejection of `;`, which stops trivially chaining
/// a second statement through this field. It is not SQL injection protection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PartitionClause(String);

impl PartitionClause {
    pub fn new(clause: impl Into<String>) -> Result<Self, ConfigError> {
        let clause = clause.into();
        if clause.contains(';') {
            return Err(ConfigError::InvalidPartitionClause(clause));
        }
        Ok(Self(clause))
    }

    /// Accepts an optional raw clause, as found in configuration.
    pub fn parse_optional(clause: Option<&str>) -> Result<Option<Self>, ConfigError> {
        clause.map(Self::new).transpose()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Merges the table-wide clause with a check's own clause into a `WHERE` suffix.
///
/// Global only, check only, both conjoined with `AND`, or nothing at all.
pub fn where_clause(global: Option<&PartitionClause>, local: Option<&PartitionClause>) -> String {
    match (global, local) {
        (Some(g), None) => format!(" WHERE {}", g),
        (None, Some(l)) => format!(" WHERE {}", l),
        (Some(g), Some(l)) => format!(" WHERE {} AND {}", g, l),
        (None, None) => String::new(),
    }
}
