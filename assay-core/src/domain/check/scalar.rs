// assay-core/src/domain/check/scalar.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// One value returned by the database, independent of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Scalar>),
}

/// An ordered sequence of values, as returned by one result row.
pub type Row = Vec<Scalar>;

impl Scalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }

    /// Numeric view of the value. Text is accepted when it parses as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Null | Self::List(_) => None,
        }
    }

    /// Truthiness: NULL, false, zero, empty text and empty lists are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{}", s),
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Renders rows the way they appear in failure reports: `[(a, b), (c, d)]`.
pub fn format_rows(rows: &[Row]) -> String {
    let rendered: Vec<String> = rows.iter().map(|r| format_row(r)).collect();
    format!("[{}]", rendered.join(", "))
}

pub fn format_row(row: &[Scalar]) -> String {
    let values: Vec<String> = row
        .iter()
        .map(|v| match v {
            Scalar::Text(s) => format!("'{}'", s),
            other => other.to_string(),
        })
        .collect();
    format!("({})", values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_view() {
        assert_eq!(Scalar::Int(3).as_f64(), Some(3.0));
        assert_eq!(Scalar::from(" 2.5 ").as_f64(), Some(2.5));
        assert_eq!(Scalar::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Scalar::from("abc").as_f64(), None);
        assert_eq!(Scalar::Null.as_f64(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Scalar::Null.is_truthy());
        assert!(!Scalar::Int(0).is_truthy());
        assert!(!Scalar::from("").is_truthy());
        assert!(!Scalar::List(vec![]).is_truthy());
        assert!(Scalar::Float(0.1).is_truthy());
        assert!(Scalar::from("0").is_truthy());
    }

    #[test]
    fn test_format_rows() {
        let rows = vec![vec![Scalar::from("age"), Scalar::from("min"), Scalar::Int(-1)]];
        assert_eq!(format_rows(&rows), "[('age', 'min', -1)]");
        assert_eq!(Scalar::from(None::<i64>), Scalar::Null);
    }
}
