// assay-core/src/domain/check/interval.rs

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioFormula {
    /// `max(cur, ref) / min(cur, ref)`
    #[default]
    MaxOverMin,
    /// `|cur - ref| / ref`
    RelativeDiff,
}

impl RatioFormula {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxOverMin => "max_over_min",
            Self::RelativeDiff => "relative_diff",
        }
    }

    pub fn apply(&self, current: f64, reference: f64) -> f64 {
        match self {
            Self::MaxOverMin => current.max(reference) / current.min(reference),
            Self::RelativeDiff => (current - reference).abs() / reference,
        }
    }
}

impl fmt::Display for RatioFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatioFormula {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max_over_min" => Ok(Self::MaxOverMin),
            "relative_diff" => Ok(Self::RelativeDiff),
            other => Err(ConfigError::InvalidRatioFormula(other.to_string())),
        }
    }
}

pub const DEFAULT_DAYS_BACK: i64 = 7;
pub const DEFAULT_DATE_FILTER_COLUMN: &str = "ds";

/// Compares metrics of one date partition against the partition `days_back` days earlier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalCheck {
    pub table: String,
    /// Sorted by metric expression; queries select metrics in this order.
    pub metrics_thresholds: BTreeMap<String, f64>,
    /// Always negative or zero.
    pub days_back: i64,
    pub ratio_formula: RatioFormula,
    pub ignore_zero: bool,
    pub date_filter_column: String,
}

impl IntervalCheck {
    pub fn new<I, S>(table: impl Into<String>, metrics_thresholds: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let table = table.into();
        let metrics_thresholds: BTreeMap<String, f64> = metrics_thresholds
            .into_iter()
            .map(|(metric, threshold)| (metric.into(), threshold))
            .collect();
        if metrics_thresholds.is_empty() {
            return Err(ConfigError::EmptyCheckSet(table));
        }
        Ok(Self {
            table,
            metrics_thresholds,
            days_back: -DEFAULT_DAYS_BACK,
            ratio_formula: RatioFormula::default(),
            ignore_zero: true,
            date_filter_column: DEFAULT_DATE_FILTER_COLUMN.to_string(),
        })
    }

    /// The sign is ignored: the reference partition always lies in the past.
    pub fn with_days_back(mut self, days_back: i64) -> Self {
        self.days_back = -days_back.abs();
        self
    }

    pub fn with_ratio_formula(mut self, formula: RatioFormula) -> Self {
        self.ratio_formula = formula;
        self
    }

    pub fn with_ignore_zero(mut self, ignore_zero: bool) -> Self {
        self.ignore_zero = ignore_zero;
        self
    }

    pub fn with_date_filter_column(mut self, column: impl Into<String>) -> Self {
        self.date_filter_column = column.into();
        self
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.metrics_thresholds.keys().map(String::as_str)
    }

    /// `None` when the date arithmetic leaves chrono's supported range.
    pub fn reference_date(&self, ds: NaiveDate) -> Option<NaiveDate> {
        ds.checked_add_signed(TimeDelta::days(self.days_back))
    }

    pub fn compare(&self, metric: &str, current: f64, reference: f64) -> MetricComparison {
        let threshold = self
            .metrics_thresholds
            .get(metric)
            .copied()
            .unwrap_or(f64::NAN);

        let (ratio, success) = if current == 0.0 || reference == 0.0 {
            (None, self.ignore_zero)
        } else {
            let ratio = self.ratio_formula.apply(current, reference);
            (Some(ratio), ratio < threshold)
        };

        MetricComparison {
            metric: metric.to_string(),
            current,
            reference,
            ratio,
            threshold,
            success,
        }
    }
}

/// One metric of an interval check, evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: String,
    pub current: f64,
    pub reference: f64,
    pub ratio: Option<f64>,
    pub threshold: f64,
    pub success: bool,
}
