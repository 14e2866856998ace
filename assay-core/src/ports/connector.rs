// assay-core/src/ports/connector.rs

// The one capability the check engine needs from the outside world: run SQL, get rows.
// Adapters (DuckDB, or a host's own driver) live in infrastructure.

use crate::domain::check::scalar::{Row, Scalar};
use crate::error::AssayError;
use async_trait::async_trait;

#[async_trait]
pub trait Connector: Send + Sync {
    /// Runs a statement whose result rows are not needed.
    async fn execute(&self, query: &str) -> Result<(), AssayError>;

    /// Runs a query with positional parameters and returns every row.
    async fn fetch_all(&self, query: &str, params: &[Scalar]) -> Result<Vec<Row>, AssayError>;

    /// First row only, `None` when the query returns nothing.
    async fn fetch_first(&self, query: &str, params: &[Scalar]) -> Result<Option<Row>, AssayError> {
        let rows = self.fetch_all(query, params).await?;
        Ok(rows.into_iter().next())
    }

    // Nom du moteur, pour les logs
    fn engine_name(&self) -> &str;
}
