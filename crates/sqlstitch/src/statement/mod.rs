//! The statement orchestrator.
//!
//! A [`Statement`] owns a template (a canned one per [`StatementKind`] or a caller-supplied
//! string) and the structured pieces used to fill its tokens: tables, columns, raw filter
//! clauses, sort directives and pagination. [`Statement::generate_query`] substitutes the
//! tokens in a fixed order: `{{columns}}`, `{{pagination}}`, `{{tables}}`, `{{where}}`,
//! `{{sort}}`. Unknown tokens are left in place.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sqlstitch::{Dialect, JoinKind, OfflineAdapter, Statement, StatementKind};
//!
//! let mut stmt = Statement::with_adapter(Arc::new(OfflineAdapter::new(Dialect::MySql)));
//! stmt.set_type(StatementKind::Select)
//!     .add_table("orders", Some("o"))
//!     .add_join(JoinKind::Left, "customers", Some("c"), Some("c.id = o.customer_id"))
//!     .add_column("o.id", None, None::<i64>, None)
//!     .add_where_with_params("o.status = :status", [("status", "open")])
//!     .set_page_size(20);
//!
//! assert_eq!(
//!     stmt.generate_query(),
//!     "SELECT `o`.`id` FROM orders o, customers c ON c.id = o.customer_id \
//!      WHERE o.status = :status  LIMIT 0, 20"
//! );
//! ```
//!
//! Preparation is cached: the handle returned by the adapter is reused by
//! [`Statement::execute`] until a structural mutator bumps [`Statement::revision`].
//! Changing parameter values never invalidates it.

use crate::adapter::{Adapter, NullAdapter, OfflineAdapter, PreparedStatement, ResultSet};
use crate::column::ColumnSpec;
use crate::config::StitchConfig;
use crate::dialect::{SortDirection, SortMap};
use crate::error::{StitchError, StitchResult};
use crate::ident::{is_sanitized, sanitize_param_name};
use crate::kind::StatementKind;
use crate::params::{ParamMap, ParameterStore};
use crate::table::{JoinKind, TableSpec};
use crate::template;
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::Arc;


#[derive(Debug, Clone)]
struct CachedStatement {
    revision: u64,
    handle: Arc<dyn PreparedStatement>,
}

/// A configurable SQL statement assembled from a template.
///
/// Cloning yields an independent copy of every collection; the adapter and any prepared
/// handle are shared.
#[derive(Debug, Clone)]
pub struct Statement {
    kind: Option<StatementKind>,
    template: Option<String>,
    tables: IndexMap<String, TableSpec>,
    columns: IndexMap<String, ColumnSpec>,
    where_clauses: Vec<String>,
    sort: SortMap,
    page_size: u64,
    page_number: u64,
    params: ParameterStore,
    adapter: Arc<dyn Adapter>,
    config: StitchConfig,
    revision: u64,
    cached: Option<CachedStatement>,
}

impl Default for Statement {
    fn default() -> Self {
        Self::new()
    }
}

impl Statement {
    /// An empty statement with no adapter bound.
    pub fn new() -> Self {
        Self::with_adapter(Arc::new(NullAdapter))
    }

    /// An empty statement rendering and preparing through `adapter`.
    pub fn with_adapter(adapter: Arc<dyn Adapter>) -> Self {
        Self {
            kind: None,
            template: None,
            tables: IndexMap::new(),
            columns: IndexMap::new(),
            where_clauses: Vec::new(),
            sort: SortMap::new(),
            page_size: 0,
            page_number: 0,
            params: ParameterStore::new(),
            adapter,
            config: StitchConfig::default(),
            revision: 0,
            cached: None,
        }
    }

    /// An empty statement with an offline adapter in the configured dialect and the
    /// configured default page size.
    pub fn with_config(config: &StitchConfig) -> Self {
        let mut stmt = Self::with_adapter(Arc::new(OfflineAdapter::new(config.dialect)));
        stmt.page_size = config.default_page_size;
        stmt.config = config.clone();
        stmt
    }

    // ==================== Adapter & config ====================

    /// Bind a different adapter. Drops any prepared handle.
    pub fn set_adapter(&mut self, adapter: Arc<dyn Adapter>) -> &mut Self {
        self.adapter = adapter;
        self.invalidate()
    }

    pub fn adapter(&self) -> &Arc<dyn Adapter> {
        &self.adapter
    }

    /// Replace the logging configuration. Does not touch the adapter or pagination.
    pub fn set_config(&mut self, config: StitchConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    // ==================== Cache bookkeeping ====================

    fn invalidate(&mut self) -> &mut Self {
        self.revision += 1;
        self.cached = None;
        self
    }

    /// Structural version. Bumped by every mutator that can change the generated SQL.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a prepared handle for the current revision is cached.
    pub fn is_prepared(&self) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|c| c.revision == self.revision)
    }

    // ==================== Type & template ====================

    /// Set the statement kind with its default template.
    pub fn set_type(&mut self, kind: StatementKind) -> &mut Self {
        self.set_type_with_template(kind, None)
    }

    /// Set the statement kind, using `template` instead of the default when given.
    pub fn set_type_with_template(
        &mut self,
        kind: StatementKind,
        template: Option<&str>,
    ) -> &mut Self {
        if self.kind != Some(kind) {
            self.kind = Some(kind);
            self.invalidate();
        }
        self.set_template(template.unwrap_or(kind.default_template()))
    }

    /// Override the template. Invalidates only when it actually changes.
    pub fn set_template(&mut self, raw: &str) -> &mut Self {
        if self.template.as_deref() != Some(raw) {
            self.template = Some(raw.to_string());
            self.invalidate();
        }
        self
    }

    pub fn kind(&self) -> Option<StatementKind> {
        self.kind
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    // ==================== Tables ====================

    /// Add (or replace, keyed by alias or name) the base table.
    pub fn add_table(&mut self, name: &str, alias: Option<&str>) -> &mut Self {
        self.insert_table(TableSpec::base(name, alias.map(str::to_string)))
    }

    /// Add (or replace, keyed by alias or name) a joined table.
    pub fn add_join(
        &mut self,
        kind: JoinKind,
        name: &str,
        alias: Option<&str>,
        condition: Option<&str>,
    ) -> &mut Self {
        self.insert_table(TableSpec::joined(
            kind,
            name,
            alias.map(str::to_string),
            condition.map(str::to_string),
        ))
    }

    fn insert_table(&mut self, table: TableSpec) -> &mut Self {
        self.tables.insert(table.key().to_string(), table);
        self.invalidate()
    }

    pub fn tables(&self) -> &IndexMap<String, TableSpec> {
        &self.tables
    }

    /// Render every table for the current kind, skipping empty renders, joined by `", "`.
    pub fn generate_tables(&self) -> String {
        join_non_empty(self.tables.values().map(|t| t.render(self.kind)))
    }

    // ==================== Columns ====================

    /// Add (or replace, keyed by alias or name) a column and store `value` under its
    /// sanitized parameter name (`param_name`, else the key).
    pub fn add_column(
        &mut self,
        name: &str,
        alias: Option<&str>,
        value: impl Into<Value>,
        param_name: Option<&str>,
    ) -> &mut Self {
        let key = alias.unwrap_or(name).to_string();
        let param_name = sanitize_param_name(param_name.unwrap_or(&key));
        self.params.insert_raw(param_name.clone(), value.into());
        self.columns.insert(
            key,
            ColumnSpec::new(name, alias.map(str::to_string), param_name),
        );
        self.invalidate()
    }

    pub fn columns(&self) -> &IndexMap<String, ColumnSpec> {
        &self.columns
    }

    /// Render every column for the current kind, skipping empty renders, joined by `", "`.
    pub fn generate_columns(&self) -> String {
        let adapter = self.adapter.as_ref();
        join_non_empty(self.columns.values().map(|c| c.render(self.kind, adapter)))
    }

    // ==================== Filters ====================

    /// Append a raw filter clause.
    pub fn add_where(&mut self, clause: &str) -> &mut Self {
        self.where_clauses.push(clause.to_string());
        self.invalidate()
    }

    /// Append a raw filter clause and merge `params` into the parameter store.
    ///
    /// Keys are stored exactly as given, without the sanitization applied to column and
    /// [`Statement::set_parameter`] names. A key that sanitization would alter is logged at
    /// `warn` since it can only be read back through [`Statement::get_parameters`].
    pub fn add_where_with_params<K, V>(
        &mut self,
        clause: &str,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in params {
            let key = key.into();
            if !is_sanitized(&key) {
                tracing::warn!(
                    target: "sqlstitch.params",
                    key = %key,
                    sanitized = %sanitize_param_name(&key),
                    "filter parameter stored under unsanitized key"
                );
            }
            self.params.insert_raw(key, value.into());
        }
        self.add_where(clause)
    }

    pub fn where_clauses(&self) -> &[String] {
        &self.where_clauses
    }

    /// Filter snippet, `prepend` defaulting to `WHERE` (also when empty). Empty when no
    /// clause exists.
    pub fn generate_where(&self, prepend: Option<&str>) -> String {
        if self.where_clauses.is_empty() {
            return String::new();
        }
        let prepend = prepend.filter(|p| !p.is_empty()).unwrap_or("WHERE");
        self.adapter.generate_where(&self.where_clauses, prepend)
    }

    // ==================== Parameters ====================

    /// Store a value under the sanitized `name`. Keeps any prepared handle.
    pub fn set_parameter(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.params.set(name, value);
        self
    }

    pub fn get_parameter(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn remove_parameter(&mut self, name: &str) -> &mut Self {
        self.params.remove(name);
        self
    }

    /// Every stored parameter keyed by its adapter label.
    pub fn get_parameters(&self) -> ParamMap {
        self.params.labeled(self.adapter.as_ref())
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    // ==================== Pagination ====================

    pub fn set_page_size(&mut self, size: u64) -> &mut Self {
        self.page_size = size;
        self.invalidate()
    }

    pub fn set_page_number(&mut self, number: u64) -> &mut Self {
        self.page_number = number;
        self.invalidate()
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn generate_pagination(&self) -> String {
        self.adapter
            .generate_pagination(self.page_size, self.page_number)
    }

    // ==================== Sorting ====================

    /// Set the direction for `field` (default ascending). A repeated field keeps its position.
    pub fn add_sort(&mut self, field: &str, direction: Option<SortDirection>) -> &mut Self {
        self.sort
            .insert(field.to_string(), direction.unwrap_or_default());
        self.invalidate()
    }

    pub fn sort(&self) -> &SortMap {
        &self.sort
    }

    /// Sort snippet. A non-empty `prepend` replaces the default `ORDER BY` lead and acts as
    /// separator.
    pub fn generate_sort(&self, prepend: Option<&str>) -> String {
        self.adapter
            .generate_sort(&self.sort, prepend.filter(|p| !p.is_empty()))
    }

    // ==================== Assembly ====================

    /// Substitute every recognized token into the template.
    ///
    /// Plain tokens are replaced everywhere; `{{where}}` and `{{sort}}` (with or without an
    /// argument) only at their first occurrence.
    pub fn generate_query(&self) -> String {
        let Some(raw) = self.template.as_deref() else {
            return String::new();
        };
        let query = template::replace_all(raw, template::COLUMNS, || self.generate_columns());
        let query = template::replace_all(&query, template::PAGINATION, || {
            self.generate_pagination()
        });
        let query = template::replace_all(&query, template::TABLES, || self.generate_tables());
        let query = template::replace_first_with_arg(&query, template::WHERE, |keyword| {
            self.generate_where(keyword)
        });
        template::replace_first_with_arg(&query, template::SORT, |separator| {
            self.generate_sort(separator)
        })
    }

    // ==================== Preparation & execution ====================

    /// Compile the generated query through the adapter, reusing the cached handle while the
    /// statement is structurally unchanged.
    pub async fn prepare(&mut self) -> StitchResult<&mut Self> {
        if !self.adapter.is_bound() {
            return Err(StitchError::configuration(
                "no adapter bound to statement; cannot prepare",
            ));
        }
        if self.is_prepared() {
            if self.config.log_sql {
                tracing::trace!(
                    target: "sqlstitch.sql",
                    revision = self.revision,
                    "reusing prepared statement"
                );
            }
            return Ok(self);
        }

        let sql = self.generate_query();
        if self.config.log_sql {
            tracing::debug!(
                target: "sqlstitch.sql",
                kind = ?self.kind,
                revision = self.revision,
                sql = %self.config.truncate_sql(&sql),
                "preparing statement"
            );
        }
        let handle = self.adapter.get_statement(&sql).await?;
        self.cached = Some(CachedStatement {
            revision: self.revision,
            handle,
        });
        Ok(self)
    }

    /// Execute with the current parameter values, preparing first if needed.
    pub async fn execute(&mut self) -> StitchResult<ResultSet> {
        self.prepare().await?;
        let handle = match &self.cached {
            Some(cached) => Arc::clone(&cached.handle),
            None => {
                return Err(StitchError::Other(
                    "statement has no prepared handle after prepare".to_string(),
                ));
            }
        };
        let params = self.get_parameters();
        if self.config.log_sql {
            tracing::debug!(
                target: "sqlstitch.sql",
                kind = ?self.kind,
                param_count = params.len(),
                sql = %self.config.truncate_sql(handle.sql()),
                "executing statement"
            );
        }
        handle.execute(&params).await
    }
}

fn join_non_empty(parts: impl Iterator<Item = String>) -> String {
    let mut out = String::new();
    for part in parts.filter(|p| !p.is_empty()) {
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(&part);
    }
    out
}
