pub mod check_query;
pub mod statements;

pub use check_query::CheckQueryBuilder;
pub use statements::split_statements;
