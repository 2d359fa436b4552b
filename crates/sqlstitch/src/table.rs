use crate::kind::StatementKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a table participates in the statement. Absent for the base table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinKind {
    Join,
    Left,
    Right,
    Inner,
    Outer,
}

impl JoinKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Inner => "INNER",
            Self::Outer => "OUTER",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One queried table: the base table or a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table name, optionally schema-qualified.
    pub name: String,
    pub alias: Option<String>,
    pub join: Option<JoinKind>,
    /// Raw join predicate, not escaped.
    pub condition: Option<String>,
}

impl TableSpec {
    /// A base table.
    pub fn base(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            name: name.into(),
            alias,
            join: None,
            condition: None,
        }
    }

    /// A joined table.
    pub fn joined(
        kind: JoinKind,
        name: impl Into<String>,
        alias: Option<String>,
        condition: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            alias,
            join: Some(kind),
            condition,
        }
    }

    /// Collection key: alias when present, name otherwise.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn is_base(&self) -> bool {
        self.join.is_none()
    }

    /// Render for the given statement kind. Empty when the table has no place in that shape.
    ///
    /// - SELECT: `name [alias] [ON condition]`
    /// - INSERT/UPDATE: `name` for the base table only
    /// - DELETE or unset: nothing
    pub fn render(&self, kind: Option<StatementKind>) -> String {
        match kind {
            Some(StatementKind::Select) => {
                let mut out = self.name.clone();
                if let Some(alias) = &self.alias {
                    out.push(' ');
                    out.push_str(alias);
                }
                if let Some(condition) = &self.condition {
                    out.push_str(" ON ");
                    out.push_str(condition);
                }
                out
            }
            Some(StatementKind::Insert | StatementKind::Update) if self.is_base() => {
                self.name.clone()
            }
            _ => String::new(),
        }
    }
}
