//! Typed rows returned by storage.
//!
//! Backends hand back loosely typed JSON. [`RawRow::from_json`] checks the
//! shape once at the boundary so projection and aggregation work on
//! [`CellValue`]s instead of arbitrary JSON.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{StorageError, StorageResult};

/// A scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Convert a scalar JSON value. Arrays and objects have no cell form.
    pub fn from_json(value: &Value) -> Option<CellValue> {
        match value {
            Value::Null => Some(CellValue::Null),
            Value::Bool(b) => Some(CellValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(CellValue::Number),
            Value::String(s) => Some(CellValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric reading of the cell: numbers as-is, numeric text parsed.
    ///
    /// Returns `None` for anything that is not a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Null | CellValue::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two cells the way a predicate does.
    ///
    /// Numbers compare numerically (numeric text is coerced), text compares
    /// lexicographically so ISO dates order correctly. Null and mixed
    /// incomparable values yield `None`.
    pub fn loose_cmp(&self, other: &CellValue) -> Option<Ordering> {
        use CellValue::*;

        match (self, other) {
            (Number(a), Number(b)) => a.partial_cmp(b),
            (Text(a), Text(b)) => Some(a.as_str().cmp(b.as_str())),
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Number(a), Text(_)) => other.as_f64().and_then(|b| a.partial_cmp(&b)),
            (Text(_), Number(b)) => self.as_f64().and_then(|a| a.partial_cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// A row as returned by storage: the row id plus one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    id: CellValue,
    values: BTreeMap<String, CellValue>,
}

impl RawRow {
    /// Start a row whose id lives in `id_column`.
    pub fn new(id_column: &str, id: impl Into<CellValue>) -> Self {
        let id = id.into();
        let mut values = BTreeMap::new();
        values.insert(id_column.to_string(), id.clone());
        Self { id, values }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Validate a JSON row from `table`.
    ///
    /// The row must be an object of scalars carrying a non-null id under
    /// `id_column`.
    pub fn from_json(table: &str, id_column: &str, value: Value) -> StorageResult<Self> {
        let Value::Object(map) = value else {
            return Err(StorageError::invalid_row(table, "expected a JSON object"));
        };

        let mut values = BTreeMap::new();
        for (column, cell) in map {
            let cell = CellValue::from_json(&cell).ok_or_else(|| {
                StorageError::invalid_row(table, format!("column '{}' is not a scalar", column))
            })?;
            values.insert(column, cell);
        }

        let id = values
            .get(id_column)
            .filter(|id| !id.is_null())
            .cloned()
            .ok_or_else(|| {
                StorageError::invalid_row(table, format!("missing row id column '{}'", id_column))
            })?;

        Ok(Self { id, values })
    }

    pub fn id(&self) -> &CellValue {
        &self.id
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keep only `columns`. [`RawRow::id`] survives regardless.
    pub fn project(&self, columns: &[String]) -> RawRow {
        let values = self
            .values
            .iter()
            .filter(|(name, _)| columns.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Self {
            id: self.id.clone(),
            values,
        }
    }
}
