// assay-core/src/ports/mock.rs

// Test double shared by the evaluator tests: canned result sets, recorded queries.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::check::scalar::{Row, Scalar};
use crate::error::AssayError;
use crate::ports::connector::Connector;

#[derive(Clone, Default)]
pub struct MockConnector {
    pub executed_queries: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<VecDeque<Vec<Row>>>>,
}

#[allow(clippy::unwrap_used)]
impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each call to `fetch_all` pops the next result set; an exhausted queue returns no rows.
    pub fn with_responses(responses: Vec<Vec<Row>>) -> Self {
        Self {
            executed_queries: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(responses.into())),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.executed_queries.lock().unwrap().clone()
    }
}

#[async_trait]
#[allow(clippy::unwrap_used)]
impl Connector for MockConnector {
    async fn execute(&self, query: &str) -> Result<(), AssayError> {
        self.executed_queries
            .lock()
            .unwrap()
            .push(query.to_string());
        Ok(())
    }

    async fn fetch_all(&self, query: &str, _params: &[Scalar]) -> Result<Vec<Row>, AssayError> {
        self.executed_queries
            .lock()
            .unwrap()
            .push(query.to_string());
        Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
    }

    fn engine_name(&self) -> &str {
        "mock"
    }
}

/// Builds a row from anything convertible into scalars.
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::domain::check::scalar::Scalar::from($value)),*]
    };
}
