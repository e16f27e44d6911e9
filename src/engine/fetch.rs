//! Table fetcher: runs one plan against storage.

use serde::Serialize;
use tracing::{debug, warn};

use super::error::{EngineError, EngineResult};
use crate::planner::TablePlan;
use crate::storage::{RawRow, StorageProvider};

/// Rows fetched for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRows {
    pub table: String,
    pub rows: Vec<RawRow>,
    /// The fetch returned as many rows as the cap allows; more may exist.
    pub at_limit: bool,
}

/// Per-table fetch statistics reported with the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: usize,
    pub at_limit: bool,
}

impl From<&TableRows> for TableCount {
    fn from(rows: &TableRows) -> Self {
        Self {
            table: rows.table.clone(),
            rows: rows.rows.len(),
            at_limit: rows.at_limit,
        }
    }
}

/// Executes plans with a fixed per-table row cap.
pub struct TableFetcher<'a, S: StorageProvider + ?Sized> {
    storage: &'a S,
    row_limit: usize,
}

impl<'a, S: StorageProvider + ?Sized> TableFetcher<'a, S> {
    pub fn new(storage: &'a S, row_limit: usize) -> Self {
        Self { storage, row_limit }
    }

    /// Fetch one table. Rows past the cap are dropped silently.
    pub async fn fetch(&self, plan: &TablePlan) -> EngineResult<TableRows> {
        let request = plan.to_request(self.row_limit);

        let mut rows = self.storage.query(&request).await.map_err(|source| {
            warn!(table = %plan.table, error = %source, "table fetch failed");
            EngineError::Fetch {
                table: plan.table.clone(),
                source,
            }
        })?;

        rows.truncate(self.row_limit);
        let at_limit = rows.len() >= self.row_limit;
        if at_limit {
            warn!(
                table = %plan.table,
                limit = self.row_limit,
                "fetch reached the row limit; result may be truncated"
            );
        }

        debug!(table = %plan.table, rows = rows.len(), "fetched table");

        Ok(TableRows {
            table: plan.table.clone(),
            rows,
            at_limit,
        })
    }
}
