//! Semantic value types carried by catalog fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The semantic type of a catalog field.
///
/// Drives both aggregation (only numeric-family types are totalled) and
/// the formatter a column is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Number,
    Currency,
    Date,
    Boolean,
}

impl ValueType {
    /// Whether values of this type are summed into column totals.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Number | ValueType::Currency)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Number => "number",
            ValueType::Currency => "currency",
            ValueType::Date => "date",
            ValueType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
