//! The adapter seam: dialect rendering plus statement preparation/execution.
//!
//! A [`crate::Statement`] never talks to a database directly. It asks its adapter to escape
//! column names, format parameter labels, render filter/sort/pagination snippets and, when
//! prepared, to compile the final query into a [`PreparedStatement`] handle.
//!
//! Shipped adapters:
//! - [`NullAdapter`]: the unbound default. Renders nothing, refuses to prepare.
//! - [`OfflineAdapter`]: renders in a [`Dialect`] but has no connection, for handing the
//!   generated SQL and parameters to another access layer.
//! - [`crate::pg::PgAdapter`] / `PoolAdapter`: Postgres execution via `tokio-postgres`.

use crate::dialect::{Dialect, SortMap};
use crate::error::{StitchError, StitchResult};
use crate::params::ParamMap;
use crate::value::Value;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Dialect-specific rendering and statement preparation.
///
/// The rendering methods default to the conventions of [`Adapter::dialect`].
#[async_trait]
pub trait Adapter: Send + Sync + fmt::Debug {
    /// Whether this adapter can prepare statements. `false` only for the null object.
    fn is_bound(&self) -> bool {
        true
    }

    /// Dialect used by the default rendering methods.
    fn dialect(&self) -> Dialect {
        Dialect::default()
    }

    fn escape_col_name(&self, name: &str) -> String {
        self.dialect().escape_col_name(name)
    }

    fn make_parameter_label(&self, name: &str) -> String {
        self.dialect().make_parameter_label(name)
    }

    fn generate_where(&self, clauses: &[String], prepend: &str) -> String {
        self.dialect().generate_where(clauses, prepend)
    }

    fn generate_sort(&self, sort: &SortMap, prepend: Option<&str>) -> String {
        self.dialect().generate_sort(sort, prepend)
    }

    fn generate_pagination(&self, page_size: u64, page_number: u64) -> String {
        self.dialect().generate_pagination(page_size, page_number)
    }

    /// Compile `query` into a reusable handle.
    async fn get_statement(&self, query: &str) -> StitchResult<Arc<dyn PreparedStatement>>;
}

/// A compiled statement that can be executed repeatedly with different parameter values.
#[async_trait]
pub trait PreparedStatement: Send + Sync + fmt::Debug {
    /// The SQL this handle was compiled from.
    fn sql(&self) -> &str;

    /// Execute with `params`, keyed by adapter-formatted label.
    async fn execute(&self, params: &ParamMap) -> StitchResult<ResultSet>;
}

/// Rows returned by an execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Rows affected for statements without a result set; row count otherwise.
    pub rows_affected: u64,
}

impl ResultSet {
    /// A result with no columns, only an affected-row count.
    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `row` for the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }
}

/// The unbound adapter: every snippet renders empty and preparation fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAdapter;

#[async_trait]
impl Adapter for NullAdapter {
    fn is_bound(&self) -> bool {
        false
    }

    fn escape_col_name(&self, _name: &str) -> String {
        String::new()
    }

    fn make_parameter_label(&self, _name: &str) -> String {
        String::new()
    }

    fn generate_where(&self, _clauses: &[String], _prepend: &str) -> String {
        String::new()
    }

    fn generate_sort(&self, _sort: &SortMap, _prepend: Option<&str>) -> String {
        String::new()
    }

    fn generate_pagination(&self, _page_size: u64, _page_number: u64) -> String {
        String::new()
    }

    async fn get_statement(&self, _query: &str) -> StitchResult<Arc<dyn PreparedStatement>> {
        Err(StitchError::configuration(
            "no adapter bound to statement; cannot prepare",
        ))
    }
}

/// Renders in a dialect without any connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAdapter {
    dialect: Dialect,
}

impl OfflineAdapter {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

#[async_trait]
impl Adapter for OfflineAdapter {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn get_statement(&self, _query: &str) -> StitchResult<Arc<dyn PreparedStatement>> {
        Err(StitchError::configuration(format!(
            "offline {:?} adapter has no connection; cannot prepare",
            self.dialect
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_adapter_renders_nothing() {
        let a = NullAdapter;
        assert!(!a.is_bound());
        assert_eq!(a.escape_col_name("id"), "");
        assert_eq!(a.generate_where(&["a = 1".into()], "WHERE"), "");
        assert_eq!(a.generate_pagination(10, 2), "");
    }

    #[tokio::test]
    async fn null_adapter_refuses_to_prepare() {
        let err = NullAdapter.get_statement("SELECT 1").await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn offline_adapter_renders_but_cannot_prepare() {
        let a = OfflineAdapter::new(Dialect::Postgres);
        assert!(a.is_bound());
        assert_eq!(a.escape_col_name("id"), r#""id""#);
        assert_eq!(a.generate_pagination(10, 3), "LIMIT 10 OFFSET 20");
        assert!(a.get_statement("SELECT 1").await.unwrap_err().is_configuration());
    }

    #[test]
    fn result_set_lookup_by_column() {
        let rs = ResultSet {
            columns: vec!["id".into(), "name".into()],
            rows: vec![vec![Value::Int(1), Value::Text("a".into())]],
            rows_affected: 1,
        };
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.get(0, "name"), Some(&Value::Text("a".into())));
        assert_eq!(rs.get(0, "missing"), None);
        assert_eq!(rs.get(1, "id"), None);
        assert!(ResultSet::affected(3).is_empty());
    }
}
