//! StorageProvider trait definition.
//!
//! The engine never talks to a database directly. It issues one
//! [`QueryRequest`] per table through this trait: a column projection, a
//! conjunction of simple predicates and a row cap.

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::StorageResult;
use super::row::{CellValue, RawRow};

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Gte,
    Lte,
    Eq,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Eq => "=",
        }
    }

    /// Whether `cell.cmp(value)` satisfies the operator.
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            Operator::Eq => ordering == Ordering::Equal,
        }
    }
}

/// `column <op> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub op: Operator,
    pub value: CellValue,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: Operator, value: impl Into<CellValue>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn gte(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(column, Operator::Gte, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(column, Operator::Lte, value)
    }

    pub fn eq(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(column, Operator::Eq, value)
    }

    /// Evaluate against a row. A missing or null column never matches.
    pub fn matches(&self, row: &RawRow) -> bool {
        row.get(&self.column)
            .and_then(|cell| cell.loose_cmp(&self.value))
            .map(|ordering| self.op.accepts(ordering))
            .unwrap_or(false)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op.symbol(), self.value)
    }
}

/// One per-table read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub table: String,
    /// Columns to return.
    pub columns: Vec<String>,
    /// Combined with logical AND.
    pub predicates: Vec<Predicate>,
    /// Maximum rows to return.
    pub limit: usize,
}

/// The storage capability the engine reads through.
///
/// Implementations must apply every predicate, return at most `limit` rows
/// and validate rows with [`RawRow::from_json`] (or build them directly).
/// Failures surface as an `Err`; the engine scopes them to the table that
/// failed.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Run one projected, filtered and capped query.
    async fn query(&self, request: &QueryRequest) -> StorageResult<Vec<RawRow>>;
}
