//! # sqlstitch
//!
//! A hybrid SQL statement assembler.
//!
//! ## Features
//!
//! - **Two modes, one API**: use a canned SELECT/INSERT/UPDATE/DELETE shape, or supply a raw
//!   template and let the statement fill only the tokens it contains
//! - **Structured snippets**: tables/joins, columns, raw filter clauses, sorting and pagination
//!   render per statement kind
//! - **Named parameters**: values live in a parallel map keyed by adapter labels (`:name`)
//! - **Pluggable adapters**: dialect rendering and execution sit behind the [`Adapter`] trait;
//!   a Postgres adapter ships in [`pg`]
//! - **Prepared-statement caching**: a statement is compiled once per structural revision and
//!   re-executed with fresh values
//!
//! ## Tokens
//!
//! `{{columns}}`, `{{tables}}`, `{{pagination}}`, `{{where}}` / `{{where|KEYWORD}}`,
//! `{{sort}}` / `{{sort|SEPARATOR}}`. Unknown tokens are left untouched.
//!
//! ```
//! use std::sync::Arc;
//! use sqlstitch::{OfflineAdapter, SortDirection, Statement, StatementKind, Value};
//!
//! let mut stmt = Statement::with_adapter(Arc::new(OfflineAdapter::default()));
//! stmt.set_type_with_template(
//!     StatementKind::Select,
//!     Some("SELECT * FROM posts WHERE deleted = 0 {{where|AND}} {{sort}}"),
//! )
//! .add_where_with_params("author_id = :author", [("author", 42)])
//! .add_sort("created_at", Some(SortDirection::Desc));
//!
//! assert_eq!(
//!     stmt.generate_query(),
//!     "SELECT * FROM posts WHERE deleted = 0 AND author_id = :author ORDER BY created_at DESC"
//! );
//! assert_eq!(stmt.get_parameters().get(":author"), Some(&Value::Int(42)));
//! ```

pub mod adapter;
pub mod column;
pub mod config;
pub mod dialect;
pub mod error;
pub mod ident;
pub mod kind;
pub mod params;
pub mod pg;
pub mod statement;
pub mod table;
pub mod template;
pub mod value;

pub use adapter::{Adapter, NullAdapter, OfflineAdapter, PreparedStatement, ResultSet};
pub use column::ColumnSpec;
pub use config::StitchConfig;
pub use dialect::{Dialect, SortDirection, SortMap};
pub use error::{StitchError, StitchResult};
pub use kind::StatementKind;
pub use params::{ParamMap, ParameterStore};
pub use statement::Statement;
pub use table::{JoinKind, TableSpec};
pub use value::Value;

#[cfg(feature = "pool")]
pub use pg::PoolAdapter;
pub use pg::PgAdapter;
