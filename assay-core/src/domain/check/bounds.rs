// assay-core/src/domain/check/bounds.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::ConfigError;

/// The comparison keys of a check.
///
/// At most one lower bound (`greater_than` / `geq_to`), at most one upper bound
/// (`less_than` / `leq_to`), and `equal_to` only on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geq_to: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub less_than: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leq_to: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal_to: Option<f64>,
}

impl Bounds {
    pub fn equal_to(value: f64) -> Self {
        Self {
            equal_to: Some(value),
            ..Self::default()
        }
    }

    pub fn greater_than(value: f64) -> Self {
        Self {
            greater_than: Some(value),
            ..Self::default()
        }
    }

    pub fn geq_to(value: f64) -> Self {
        Self {
            geq_to: Some(value),
            ..Self::default()
        }
    }

    pub fn less_than(value: f64) -> Self {
        Self {
            less_than: Some(value),
            ..Self::default()
        }
    }

    pub fn leq_to(value: f64) -> Self {
        Self {
            leq_to: Some(value),
            ..Self::default()
        }
    }

    pub fn with_less_than(mut self, value: f64) -> Self {
        self.less_than = Some(value);
        self
    }

    pub fn with_leq_to(mut self, value: f64) -> Self {
        self.leq_to = Some(value);
        self
    }

    fn has_lower(&self) -> bool {
        self.greater_than.is_some() || self.geq_to.is_some()
    }

    fn has_upper(&self) -> bool {
        self.less_than.is_some() || self.leq_to.is_some()
    }

    /// Checks the mutual-exclusion and ordering rules. `check` names the check in errors.
    pub fn validate(&self, check: &str) -> Result<(), ConfigError> {
        if !self.has_lower() && !self.has_upper() && self.equal_to.is_none() {
            return Err(ConfigError::MissingComparison(check.to_string()));
        }
        if self.greater_than.is_some() && self.geq_to.is_some() {
            return Err(ConfigError::ConflictingLowerBounds(check.to_string()));
        }
        if self.less_than.is_some() && self.leq_to.is_some() {
            return Err(ConfigError::ConflictingUpperBounds(check.to_string()));
        }
        if self.equal_to.is_some() && (self.has_lower() || self.has_upper()) {
            return Err(ConfigError::EqualToWithBounds(check.to_string()));
        }

        let inverted = |detail: &str| ConfigError::InvertedBounds {
            check: check.to_string(),
            detail: detail.to_string(),
        };
        match (self.greater_than, self.geq_to, self.less_than, self.leq_to) {
            (Some(gt), _, Some(lt), _) if gt >= lt => Err(inverted(
                "greater_than should be strictly less than less_than. Use geq_to or leq_to for overlapping equality.",
            )),
            (Some(gt), _, _, Some(le)) if gt >= le => Err(inverted(
                "greater_than must be strictly less than leq_to. Use geq_to with leq_to for overlapping equality.",
            )),
            (_, Some(ge), Some(lt), _) if ge >= lt => Err(inverted(
                "geq_to should be strictly less than less_than. Use leq_to with geq_to for overlapping equality.",
            )),
            (_, Some(ge), _, Some(le)) if ge > le => Err(inverted(
                "geq_to should be less than or equal to leq_to.",
            )),
            _ => Ok(()),
        }
    }

    /// Does `observed` satisfy every bound present, with an optional fractional tolerance?
    pub fn matches(&self, observed: f64, tolerance: Option<f64>) -> bool {
        let below = |bound: f64| match tolerance {
            Some(tol) => bound * (1.0 - tol),
            None => bound,
        };
        let above = |bound: f64| match tolerance {
            Some(tol) => bound * (1.0 + tol),
            None => bound,
        };

        let mut matched = true;

        if let Some(bound) = self.geq_to {
            matched = observed >= below(bound);
        } else if let Some(bound) = self.greater_than {
            matched = observed > below(bound);
        }

        if let Some(bound) = self.leq_to {
            matched = matched && observed <= above(bound);
        } else if let Some(bound) = self.less_than {
            matched = matched && observed < above(bound);
        }

        if let Some(bound) = self.equal_to {
            matched = matched
                && match tolerance {
                    Some(_) => below(bound) <= observed && observed <= above(bound),
                    None => observed == bound,
                };
        }

        matched
    }

    /// Human readable expectation, e.g. `> 0.0 AND <= 10.0 (tolerance 0.1)`.
    pub fn describe(&self, tolerance: Option<f64>) -> String {
        match tolerance {
            Some(tol) => format!("{} (tolerance {:?})", self, tol),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(v) = self.greater_than {
            parts.push(format!("> {:?}", v));
        }
        if let Some(v) = self.geq_to {
            parts.push(format!(">= {:?}", v));
        }
        if let Some(v) = self.less_than {
            parts.push(format!("< {:?}", v));
        }
        if let Some(v) = self.leq_to {
            parts.push(format!("<= {:?}", v));
        }
        if let Some(v) = self.equal_to {
            parts.push(format!("= {:?}", v));
        }
        write!(f, "{}", parts.join(" AND "))
    }
}
