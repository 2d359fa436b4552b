//! Statement kinds and their default templates.

use crate::error::{StitchError, StitchResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The canned statement shape governing the default template and snippet rules.
///
/// Serialized as its integer code (SELECT=1, INSERT=2, UPDATE=3, DELETE=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum StatementKind {
    Select = 1,
    Insert = 2,
    Update = 3,
    Delete = 4,
}

impl StatementKind {
    /// Integer code used by serialized configurations.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The template used when [`crate::Statement::set_type`] gets no explicit template.
    pub const fn default_template(self) -> &'static str {
        match self {
            Self::Select => "SELECT {{columns}} FROM {{tables}} {{where}} {{sort}} {{pagination}}",
            Self::Insert => "INSERT {{columns}} INTO {{tables}}",
            Self::Update => "UPDATE {{table}} SET {{columns}} {{where}}",
            Self::Delete => "DELETE FROM {{table}} {{where}}",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for StatementKind {
    type Error = StitchError;

    fn try_from(code: u8) -> StitchResult<Self> {
        match code {
            1 => Ok(Self::Select),
            2 => Ok(Self::Insert),
            3 => Ok(Self::Update),
            4 => Ok(Self::Delete),
            other => Err(StitchError::configuration(format!(
                "unknown statement kind code {other} (expected 1..=4)"
            ))),
        }
    }
}

impl From<StatementKind> for u8 {
    fn from(kind: StatementKind) -> Self {
        kind.code()
    }
}
