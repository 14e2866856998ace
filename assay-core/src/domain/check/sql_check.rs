// assay-core/src/domain/check/sql_check.rs

use serde::Serialize;

use crate::domain::check::scalar::Scalar;

/// Passes when every value of the first returned row is truthy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlCheck {
    pub sql: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Scalar>,
}

impl SqlCheck {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Scalar>) -> Self {
        self.params = params;
        self
    }
}
