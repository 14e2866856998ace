// assay-core/src/domain/check/branch.rs

use serde::Serialize;

use crate::domain::check::boolean::parse_loose_boolean;
use crate::domain::check::scalar::Scalar;
use crate::domain::error::DomainError;

/// Chooses between two downstream branches from a boolean-like query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchCheck {
    pub sql: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Scalar>,
    pub follow_if_true: Vec<String>,
    pub follow_if_false: Vec<String>,
}

impl BranchCheck {
    pub fn new(
        sql: impl Into<String>,
        follow_if_true: Vec<String>,
        follow_if_false: Vec<String>,
    ) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            follow_if_true,
            follow_if_false,
        }
    }

    pub fn with_params(mut self, params: Vec<Scalar>) -> Self {
        self.params = params;
        self
    }

    pub fn decide(&self, outcome: bool) -> BranchDecision {
        let follow = if outcome {
            self.follow_if_true.clone()
        } else {
            self.follow_if_false.clone()
        };
        BranchDecision { outcome, follow }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchDecision {
    pub outcome: bool,
    pub follow: Vec<String>,
}

static NULL: Scalar = Scalar::Null;

/// Interprets the first value of a row as a branch outcome.
///
/// A nested list is unwrapped once. Booleans are taken as is, integers by truthiness and
/// strings through loose boolean parsing (a `Conversion` error when that fails). Every
/// other type is rejected.
pub fn evaluate_branch(value: &Scalar) -> Result<bool, DomainError> {
    let value = match value {
        Scalar::List(items) => items.first().unwrap_or(&NULL),
        other => other,
    };

    match value {
        Scalar::Bool(b) => Ok(*b),
        Scalar::Int(i) => Ok(*i != 0),
        Scalar::Text(s) => parse_loose_boolean(s),
        Scalar::Null | Scalar::Float(_) | Scalar::List(_) => {
            Err(DomainError::UnexpectedBranchResult {
                value: value.to_string(),
                type_name: value.type_name().to_string(),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_types() {
        assert!(evaluate_branch(&Scalar::Bool(true)).unwrap());
        assert!(evaluate_branch(&Scalar::Int(1)).unwrap());
        assert!(!evaluate_branch(&Scalar::Int(0)).unwrap());
        assert!(!evaluate_branch(&Scalar::from("no")).unwrap());
        assert!(evaluate_branch(&Scalar::from("ON")).unwrap());
    }

    #[test]
    fn test_nested_list_is_unwrapped_once() {
        assert!(evaluate_branch(&Scalar::List(vec![Scalar::Int(1)])).unwrap());
        let nested = Scalar::List(vec![Scalar::List(vec![Scalar::Int(1)])]);
        assert!(matches!(
            evaluate_branch(&nested),
            Err(DomainError::UnexpectedBranchResult { .. })
        ));
    }

    #[test]
    fn test_rejected_types() {
        for value in [Scalar::Null, Scalar::Float(1.0), Scalar::List(vec![])] {
            let err = evaluate_branch(&value).unwrap_err();
            assert!(matches!(err, DomainError::UnexpectedBranchResult { .. }));
        }
        let err = evaluate_branch(&Scalar::Null).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected query return result 'NULL' type 'null'");
    }

    #[test]
    fn test_unparseable_text_is_a_conversion_error() {
        let err = evaluate_branch(&Scalar::from("maybe")).unwrap_err();
        assert!(matches!(err, DomainError::Conversion { .. }));
        assert_eq!(err.disposition(), crate::domain::error::Disposition::Fatal);
    }

    #[test]
    fn test_decision_carries_one_branch() {
        let check = BranchCheck::new("SELECT 1", vec!["load".into()], vec!["alert".into()]);
        assert_eq!(check.decide(true).follow, vec!["load".to_string()]);
        assert_eq!(check.decide(false).follow, vec!["alert".to_string()]);
    }
}
