//! SQL dialect rendering: identifier escaping, labels, filter, sort and pagination clauses.

use crate::ident::write_quoted;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction for an `ORDER BY` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(format!("invalid sort direction '{other}'")),
        }
    }
}

/// Insertion-ordered `field -> direction` map.
pub type SortMap = IndexMap<String, SortDirection>;

/// Rendering conventions for a SQL dialect.
///
/// `MySql` is the default convention (backtick identifiers, `LIMIT offset, size`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
}

impl Dialect {
    fn quote_char(self) -> char {
        match self {
            Self::MySql => '`',
            Self::Postgres => '"',
        }
    }

    /// Quote every part of a (possibly qualified) column name.
    pub fn escape_col_name(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 4);
        write_quoted(&mut out, name, self.quote_char());
        out
    }

    /// Named parameter label, `:name`.
    pub fn make_parameter_label(self, name: &str) -> String {
        format!(":{name}")
    }

    /// `{prepend} clause` for one clause, `{prepend} (a) AND (b)` for several, `""` for none.
    pub fn generate_where(self, clauses: &[String], prepend: &str) -> String {
        match clauses {
            [] => String::new(),
            [only] => format!("{prepend} {only}"),
            many => {
                let mut out = String::from(prepend);
                for (i, clause) in many.iter().enumerate() {
                    out.push_str(if i == 0 { " (" } else { " AND (" });
                    out.push_str(clause);
                    out.push(')');
                }
                out
            }
        }
    }

    /// Render the sort map.
    ///
    /// Without `prepend` the output is `ORDER BY f1 ASC, f2 DESC`. A caller-supplied separator
    /// both leads the clause and joins the fields: `Some(",")` gives `, f1 ASC,f2 ASC`, which
    /// extends an `ORDER BY` already written in a template.
    pub fn generate_sort(self, sort: &SortMap, prepend: Option<&str>) -> String {
        if sort.is_empty() {
            return String::new();
        }
        let (lead, sep) = match prepend {
            Some(p) => (p, p),
            None => ("ORDER BY", ", "),
        };
        let mut out = String::from(lead);
        out.push(' ');
        for (i, (field, dir)) in sort.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(field);
            out.push(' ');
            out.push_str(dir.as_str());
        }
        out
    }

    /// Pagination clause for 1-based `page_number` (0 is treated as 1). `""` when `page_size == 0`.
    pub fn generate_pagination(self, page_size: u64, page_number: u64) -> String {
        if page_size == 0 {
            return String::new();
        }
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        match self {
            Self::MySql => format!("LIMIT {offset}, {page_size}"),
            Self::Postgres => format!("LIMIT {page_size} OFFSET {offset}"),
        }
    }
}
