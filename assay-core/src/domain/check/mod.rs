pub mod boolean;
pub mod bounds;
pub mod branch;
pub mod column;
pub mod interval;
pub mod partition;
pub mod result;
pub mod scalar;
pub mod sql_check;
pub mod table;
pub mod threshold;
pub mod value;

pub use bounds::Bounds;
pub use branch::{BranchCheck, BranchDecision, evaluate_branch};
pub use column::{ColumnCheck, ColumnCheckKind, ColumnChecks};
pub use interval::{IntervalCheck, MetricComparison, RatioFormula};
pub use partition::PartitionClause;
pub use result::{CheckResult, Verdict};
pub use scalar::{Row, Scalar};
pub use sql_check::SqlCheck;
pub use table::{TableCheck, TableChecks};
pub use threshold::{Threshold, ThresholdCheck, ThresholdRecord};
pub use value::{PassValue, ValueCheck};
