// assay-core/src/domain/check/threshold.rs

use serde::Serialize;
use std::fmt;

use crate::domain::check::scalar::Scalar;

/// One end of a threshold range: a literal number or SQL returning one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Threshold {
    Literal(f64),
    Query(String),
}

impl Threshold {
    /// A string that parses as a float is a literal; anything else is SQL.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) => Self::Literal(v),
            Err(_) => Self::Query(raw.to_string()),
        }
    }

    pub fn from_scalar(value: &Scalar) -> Self {
        match value {
            Scalar::Int(i) => Self::Literal(*i as f64),
            Scalar::Float(f) => Self::Literal(*f),
            other => Self::parse(&other.to_string()),
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Query(sql) => Some(sql),
            Self::Literal(_) => None,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => write!(f, "{:?}", v),
            Self::Query(sql) => f.write_str(sql),
        }
    }
}

/// `min_threshold <= result <= max_threshold`, inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdCheck {
    pub sql: String,
    pub min_threshold: Threshold,
    pub max_threshold: Threshold,
}

impl ThresholdCheck {
    pub fn new(sql: impl Into<String>, min_threshold: Threshold, max_threshold: Threshold) -> Self {
        Self {
            sql: sql.into(),
            min_threshold,
            max_threshold,
        }
    }
}

/// What a threshold evaluation observed, handed to a metadata sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdRecord {
    pub check: String,
    pub result: Option<f64>,
    pub min_threshold: f64,
    pub max_threshold: f64,
    pub within_threshold: bool,
}

impl ThresholdRecord {
    pub fn evaluate(check: impl Into<String>, result: Option<f64>, min: f64, max: f64) -> Self {
        let within_threshold = result.is_some_and(|r| min <= r && r <= max);
        Self {
            check: check.into(),
            result,
            min_threshold: min,
            max_threshold: max,
            within_threshold,
        }
    }

    pub fn failure_message(&self) -> String {
        let result = match self.result {
            Some(r) => format!("{:?}", (r * 100.0).round() / 100.0),
            None => "<None>".to_string(),
        };
        format!(
            "Result: {} is not within thresholds {:?} and {:?}",
            result, self.min_threshold, self.max_threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_parsing() {
        assert_eq!(Threshold::parse("5"), Threshold::Literal(5.0));
        assert_eq!(
            Threshold::parse("SELECT MAX(age) FROM people"),
            Threshold::Query("SELECT MAX(age) FROM people".into())
        );
        assert_eq!(Threshold::from_scalar(&Scalar::Int(10)), Threshold::Literal(10.0));
    }

    #[test]
    fn test_range_is_inclusive() {
        assert!(ThresholdRecord::evaluate("c", Some(5.0), 5.0, 10.0).within_threshold);
        assert!(ThresholdRecord::evaluate("c", Some(10.0), 5.0, 10.0).within_threshold);
        assert!(ThresholdRecord::evaluate("c", Some(7.0), 5.0, 10.0).within_threshold);
        assert!(!ThresholdRecord::evaluate("c", Some(12.0), 5.0, 10.0).within_threshold);
        assert!(!ThresholdRecord::evaluate("c", None, 5.0, 10.0).within_threshold);
    }

    #[test]
    fn test_failure_message() {
        let record = ThresholdRecord::evaluate("c", Some(12.3456), 5.0, 10.0);
        assert_eq!(
            record.failure_message(),
            "Result: 12.35 is not within thresholds 5.0 and 10.0"
        );
        let record = ThresholdRecord::evaluate("c", None, 5.0, 10.0);
        assert_eq!(
            record.failure_message(),
            "Result: <None> is not within thresholds 5.0 and 10.0"
        );
    }
}
