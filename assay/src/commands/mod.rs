// assay/src/commands/mod.rs

pub mod query;
pub mod render;
pub mod run;
