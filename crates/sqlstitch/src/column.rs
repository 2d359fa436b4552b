use crate::adapter::Adapter;
use crate::kind::StatementKind;
use serde::{Deserialize, Serialize};

/// One column of the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name, optionally table-qualified.
    pub name: String,
    pub alias: Option<String>,
    /// Sanitized name of the bound parameter.
    pub param_name: String,
}

impl ColumnSpec {
    pub fn new(
        name: impl Into<String>,
        alias: Option<String>,
        param_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            alias,
            param_name: param_name.into(),
        }
    }

    /// Collection key: alias when present, name otherwise.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Render for the given statement kind.
    ///
    /// - SELECT: `escaped [AS alias]`, the alias only when it differs from the name
    /// - INSERT/UPDATE: `escaped = label`
    /// - DELETE or unset: nothing
    pub fn render(&self, kind: Option<StatementKind>, adapter: &dyn Adapter) -> String {
        match kind {
            Some(StatementKind::Select) => {
                let mut out = adapter.escape_col_name(&self.name);
                if let Some(alias) = self.alias.as_deref().filter(|a| *a != self.name) {
                    out.push_str(" AS ");
                    out.push_str(alias);
                }
                out
            }
            Some(StatementKind::Insert | StatementKind::Update) => format!(
                "{} = {}",
                adapter.escape_col_name(&self.name),
                adapter.make_parameter_label(&self.param_name)
            ),
            _ => String::new(),
        }
    }
}
