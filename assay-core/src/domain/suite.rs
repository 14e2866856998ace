// assay-core/src/domain/suite.rs

use serde::Serialize;

use crate::domain::check::{
    BranchCheck, ColumnChecks, IntervalCheck, SqlCheck, TableChecks, ThresholdCheck, ValueCheck,
};
use crate::domain::error::Disposition;

/// Any check the engine knows how to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckSpec {
    Column(ColumnChecks),
    Table(TableChecks),
    Value(ValueCheck),
    Threshold(ThresholdCheck),
    Interval(IntervalCheck),
    Sql(SqlCheck),
    Branch(BranchCheck),
}

impl CheckSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Column(_) => "column",
            Self::Table(_) => "table",
            Self::Value(_) => "value",
            Self::Threshold(_) => "threshold",
            Self::Interval(_) => "interval",
            Self::Sql(_) => "sql",
            Self::Branch(_) => "branch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteCheck {
    pub name: String,
    pub on_failure: Disposition,
    pub spec: CheckSpec,
}

/// A named, ordered collection of checks loaded from one suite file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSuite {
    pub name: String,
    pub checks: Vec<SuiteCheck>,
}

impl CheckSuite {
    pub fn get(&self, name: &str) -> Option<&SuiteCheck> {
        self.checks.iter().find(|c| c.name == name)
    }
}
