//! Postgres adapters built on `tokio-postgres`.
//!
//! Statements render with double-quoted identifiers, `:name` labels and
//! `LIMIT n OFFSET m`. When prepared, labels are rewritten to `$n` placeholders
//! (see [`rewrite_named_params`]) and values are bound by label at execution time.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sqlstitch::{pg::PgAdapter, Statement, StatementKind};
//!
//! let adapter = PgAdapter::connect("postgres://postgres@localhost/app").await?;
//! let mut stmt = Statement::with_adapter(Arc::new(adapter));
//! stmt.set_type(StatementKind::Select)
//!     .add_table("users", None)
//!     .add_column("id", None, None::<i64>, None)
//!     .add_where_with_params("status = :status", [("status", "active")]);
//!
//! let rows = stmt.execute().await?;
//! ```

mod named;
#[cfg(feature = "pool")]
mod pool;

pub use named::rewrite_named_params;
#[cfg(feature = "pool")]
pub use pool::{PoolAdapter, create_pool};

use crate::adapter::{Adapter, PreparedStatement, ResultSet};
use crate::dialect::Dialect;
use crate::error::{StitchError, StitchResult};
use crate::params::ParamMap;
use crate::value::Value;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Row, Statement as PgStatement};

/// Adapter over a single shared `tokio_postgres::Client`.
#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<Client>,
}

impl fmt::Debug for PgAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgAdapter")
            .field("closed", &self.client.is_closed())
            .finish()
    }
}

impl PgAdapter {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Connect without TLS and drive the connection on the current tokio runtime.
    pub async fn connect(database_url: &str) -> StitchResult<Self> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| StitchError::Connection(e.to_string()))?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "sqlstitch.pg", error = %e, "connection error");
            }
        });
        Ok(Self::new(Arc::new(client)))
    }

    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }
}

#[async_trait]
impl Adapter for PgAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn get_statement(&self, query: &str) -> StitchResult<Arc<dyn PreparedStatement>> {
        let (sql, labels) = rewrite_named_params(query);
        let statement = self.client.prepare(&sql).await?;
        Ok(Arc::new(PgPreparedStatement {
            client: Arc::clone(&self.client),
            statement,
            source: query.to_string(),
            labels,
        }))
    }
}

/// A statement prepared on a [`PgAdapter`]'s connection.
pub struct PgPreparedStatement {
    client: Arc<Client>,
    statement: PgStatement,
    source: String,
    labels: Vec<String>,
}

impl fmt::Debug for PgPreparedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgPreparedStatement")
            .field("sql", &self.source)
            .field("labels", &self.labels)
            .finish()
    }
}

#[async_trait]
impl PreparedStatement for PgPreparedStatement {
    fn sql(&self) -> &str {
        &self.source
    }

    async fn execute(&self, params: &ParamMap) -> StitchResult<ResultSet> {
        run_prepared(&self.client, &self.statement, &self.labels, params).await
    }
}

/// Values for `labels`, in placeholder order.
pub(crate) fn bind_values<'a>(
    labels: &[String],
    params: &'a ParamMap,
) -> StitchResult<Vec<&'a Value>> {
    labels
        .iter()
        .map(|label| {
            params
                .get(label)
                .ok_or_else(|| StitchError::missing_parameter(label.as_str()))
        })
        .collect()
}

pub(crate) async fn run_prepared(
    client: &Client,
    statement: &PgStatement,
    labels: &[String],
    params: &ParamMap,
) -> StitchResult<ResultSet> {
    let values = bind_values(labels, params)?;
    let refs: Vec<&(dyn ToSql + Sync)> = values
        .iter()
        .map(|v| *v as &(dyn ToSql + Sync))
        .collect();

    if statement.columns().is_empty() {
        let affected = client.execute(statement, &refs).await?;
        return Ok(ResultSet::affected(affected));
    }
    let rows = client.query(statement, &refs).await?;
    rows_to_result_set(statement, &rows)
}

fn rows_to_result_set(statement: &PgStatement, rows: &[Row]) -> StitchResult<ResultSet> {
    let columns: Vec<String> = statement
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut values = Vec::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            let value: Value = row
                .try_get(idx)
                .map_err(|e| StitchError::decode(name.as_str(), e.to_string()))?;
            values.push(value);
        }
        out.push(values);
    }
    Ok(ResultSet {
        columns,
        rows_affected: out.len() as u64,
        rows: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_values_follow_label_order() {
        let mut params = ParamMap::new();
        params.insert(":b".into(), Value::Int(2));
        params.insert(":a".into(), Value::Int(1));
        let labels = vec![":a".to_string(), ":b".to_string(), ":a".to_string()];
        let values = bind_values(&labels, &params).unwrap();
        assert_eq!(values, vec![&Value::Int(1), &Value::Int(2), &Value::Int(1)]);
    }

    #[test]
    fn bind_values_reports_missing_label() {
        let params = ParamMap::new();
        let err = bind_values(&[":id".to_string()], &params).unwrap_err();
        assert!(err.is_missing_parameter());
        assert_eq!(err.to_string(), "Missing parameter: :id");
    }
}
