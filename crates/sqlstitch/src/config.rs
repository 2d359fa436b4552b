use crate::dialect::Dialect;
use crate::error::{StitchError, StitchResult};
use serde::Deserialize;
use std::path::Path;

/// Statement defaults and logging behavior.
///
/// Loadable from TOML:
///
/// ```toml
/// dialect = "postgres"
/// default_page_size = 25
/// log_sql = true
/// max_logged_sql_length = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StitchConfig {
    /// Dialect for the offline adapter created by `Statement::with_config`.
    pub dialect: Dialect,
    /// Page size applied to new statements. `0` disables pagination.
    pub default_page_size: u64,
    /// Whether prepare/execute emit `tracing` events with the SQL.
    pub log_sql: bool,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::MySql,
            default_page_size: 0,
            log_sql: true,
            max_logged_sql_length: Some(200),
        }
    }
}

impl StitchConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> StitchResult<Self> {
        toml::from_str(raw)
            .map_err(|e| StitchError::configuration(format!("failed to parse config: {e}")))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> StitchResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StitchError::configuration(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_logged_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }
}
