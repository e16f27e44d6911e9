//! Multi-table merge.
//!
//! Every plan is fetched independently and the row sets are concatenated in
//! plan order: rows of the first table, then rows of the second, and so on.
//! No join, deduplication or sorting happens.

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::error::EngineResult;
use super::fetch::{TableCount, TableFetcher, TableRows};
use crate::planner::TablePlan;
use crate::storage::{RawRow, StorageProvider};

/// How per-table results are combined.
///
/// Only `union` exists today; a join strategy would be a new variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    #[default]
    Union,
}

/// A fetched row tagged with the table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub origin_table: String,
    pub row: RawRow,
}

/// The merged result of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedRows {
    pub rows: Vec<MergedRow>,
    /// Fetched row count per table, in plan order.
    pub counts: Vec<TableCount>,
}

/// Fetch every plan and merge the results.
///
/// A single plan is fetched directly. Several plans are fetched
/// concurrently and all of them settle before the merge; if any failed,
/// the first failure in plan order is returned and nothing is merged.
pub async fn fetch_and_merge<S: StorageProvider + ?Sized>(
    plans: &[TablePlan],
    storage: &S,
    row_limit: usize,
    strategy: MergeStrategy,
) -> EngineResult<MergedRows> {
    let fetcher = TableFetcher::new(storage, row_limit);

    let results = match plans {
        [] => Vec::new(),
        [plan] => vec![fetcher.fetch(plan).await],
        _ => join_all(plans.iter().map(|plan| fetcher.fetch(plan))).await,
    };

    match strategy {
        MergeStrategy::Union => union(results),
    }
}

fn union(results: Vec<EngineResult<TableRows>>) -> EngineResult<MergedRows> {
    let tables = results.into_iter().collect::<EngineResult<Vec<_>>>()?;

    let mut merged = MergedRows::default();
    for table_rows in tables {
        merged.counts.push(TableCount::from(&table_rows));

        let TableRows { table, rows, .. } = table_rows;
        merged.rows.extend(rows.into_iter().map(|row| MergedRow {
            origin_table: table.clone(),
            row,
        }));
    }

    Ok(merged)
}
