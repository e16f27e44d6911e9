//! Per-table query plans.

use std::fmt;

use serde::Serialize;

use crate::storage::{Predicate, QueryRequest};

/// The projection and predicates for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePlan {
    pub table: String,
    /// Deduplicated column list; the row id column is always first.
    pub columns: Vec<String>,
    /// Combined with logical AND.
    pub predicates: Vec<Predicate>,
}

impl TablePlan {
    /// The storage request for this plan, capped at `limit` rows.
    pub fn to_request(&self, limit: usize) -> QueryRequest {
        QueryRequest {
            table: self.table.clone(),
            columns: self.columns.clone(),
            predicates: self.predicates.clone(),
            limit,
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn predicate_on<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a Predicate> + 'a {
        self.predicates.iter().filter(move |p| p.column == column)
    }
}

impl fmt::Display for TablePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.table, self.columns.join(", "))?;
        for (i, predicate) in self.predicates.iter().enumerate() {
            let keyword = if i == 0 { "where" } else { "and" };
            write!(f, " {} {}", keyword, predicate)?;
        }
        Ok(())
    }
}
