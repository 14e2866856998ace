// assay-core/src/domain/check/value.rs

use serde::Serialize;
use std::fmt;

use crate::domain::check::scalar::Scalar;
use crate::domain::error::DomainError;

/// The value every column of a query's first row is compared against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PassValue {
    Numeric(f64),
    Text(String),
}

impl PassValue {
    /// Numeric iff the string form parses as a float.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Text(raw.to_string()),
        }
    }

    pub fn from_scalar(value: &Scalar) -> Self {
        Self::parse(&value.to_string())
    }

    /// Compares one returned value. Numeric pass values require every value to be numeric.
    pub fn matches(&self, value: &Scalar, tolerance: Option<f64>) -> Result<bool, DomainError> {
        match self {
            Self::Numeric(pass) => {
                let observed = value.as_f64().ok_or_else(|| {
                    DomainError::conversion(format!(
                        "could not convert {} value '{}' to float",
                        value.type_name(),
                        value
                    ))
                })?;
                Ok(match tolerance {
                    Some(tol) => pass * (1.0 - tol) <= observed && observed <= pass * (1.0 + tol),
                    None => observed == *pass,
                })
            }
            Self::Text(pass) => Ok(value.to_string() == *pass),
        }
    }
}

impl fmt::Display for PassValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The first row of `sql` must equal `pass_value`, column by column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCheck {
    pub sql: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Scalar>,
    pub pass_value: PassValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

impl ValueCheck {
    pub fn new(sql: impl Into<String>, pass_value: PassValue) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            pass_value,
            tolerance: None,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_params(mut self, params: Vec<Scalar>) -> Self {
        self.params = params;
        self
    }

    pub fn expected(&self) -> String {
        match self.tolerance {
            Some(tol) => format!("{} (tolerance {:?})", self.pass_value, tol),
            None => self.pass_value.to_string(),
        }
    }
}
