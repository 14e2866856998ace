// assay-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::DateTime;
use duckdb::types::{TimeUnit, Value};
use duckdb::{Config, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// Imports Hexagonaux
use crate::domain::check::scalar::{Row, Scalar};
use crate::error::AssayError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::connector::Connector;

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, AssayError> {
        self.conn.lock().map_err(|_| {
            AssayError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                "DuckDB Mutex Poisoned",
            )))
        })
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), AssayError> {
        let conn = self.lock()?;
        conn.execute_batch(query)?;
        Ok(())
    }

    async fn fetch_all(&self, query: &str, params: &[Scalar]) -> Result<Vec<Row>, AssayError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let bound: Vec<Value> = params.iter().map(to_value).collect();
        let mut rows = stmt.query(duckdb::params_from_iter(bound))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(read_row(row)?);
        }

        debug!(rows = out.len(), "DuckDB fetch finished");
        Ok(out)
    }

    // Stops after the first row instead of draining the result set
    async fn fetch_first(&self, query: &str, params: &[Scalar]) -> Result<Option<Row>, AssayError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let bound: Vec<Value> = params.iter().map(to_value).collect();
        let mut rows = stmt.query(duckdb::params_from_iter(bound))?;

        match rows.next()? {
            Some(row) => Ok(Some(read_row(row)?)),
            None => Ok(None),
        }
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

fn read_row(row: &duckdb::Row<'_>) -> Result<Row, duckdb::Error> {
    let mut values = Vec::new();
    // Le nombre de colonnes n'est connu qu'après exécution: on lit jusqu'à l'index invalide
    for idx in 0_usize.. {
        match row.get::<_, Value>(idx) {
            Ok(value) => values.push(to_scalar(value)),
            Err(duckdb::Error::InvalidColumnIndex(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(values)
}

fn to_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Boolean(*b),
        Scalar::Int(i) => Value::BigInt(*i),
        Scalar::Float(f) => Value::Double(*f),
        Scalar::Text(s) => Value::Text(s.clone()),
        Scalar::List(items) => Value::List(items.iter().map(to_value).collect()),
    }
}

/// Maps DuckDB values onto engine-independent scalars.
fn to_scalar(value: Value) -> Scalar {
    match value {
        Value::Null => Scalar::Null,
        Value::Boolean(b) => Scalar::Bool(b),
        Value::TinyInt(i) => Scalar::Int(i.into()),
        Value::SmallInt(i) => Scalar::Int(i.into()),
        Value::Int(i) => Scalar::Int(i.into()),
        Value::BigInt(i) => Scalar::Int(i),
        Value::UTinyInt(i) => Scalar::Int(i.into()),
        Value::USmallInt(i) => Scalar::Int(i.into()),
        Value::UInt(i) => Scalar::Int(i.into()),
        Value::HugeInt(i) => i64::try_from(i)
            .map(Scalar::Int)
            .unwrap_or(Scalar::Float(i as f64)),
        Value::UBigInt(i) => i64::try_from(i)
            .map(Scalar::Int)
            .unwrap_or(Scalar::Float(i as f64)),
        Value::Float(f) => Scalar::Float(f.into()),
        Value::Double(f) => Scalar::Float(f),
        Value::Decimal(d) => {
            let text = d.to_string();
            text.parse::<f64>().map(Scalar::Float).unwrap_or(Scalar::Text(text))
        }
        Value::Text(s) | Value::Enum(s) => Scalar::Text(s),
        Value::Date32(days) => DateTime::from_timestamp(i64::from(days) * 86_400, 0)
            .map(|dt| Scalar::Text(dt.date_naive().format("%Y-%m-%d").to_string()))
            .unwrap_or(Scalar::Int(days.into())),
        Value::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            DateTime::from_timestamp_micros(micros)
                .map(|dt| Scalar::Text(dt.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string()))
                .unwrap_or(Scalar::Int(raw))
        }
        Value::List(items) | Value::Array(items) => {
            Scalar::List(items.into_iter().map(to_scalar).collect())
        }
        other => Scalar::Text(format!("{:?}", other)),
    }
}
