//! Report runs: the snapshot a run executes and the output it produces.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use super::aggregate::{compute_aggregates, AggregateMap};
use super::error::EngineResult;
use super::fetch::TableCount;
use super::merge::{fetch_and_merge, MergeStrategy};
use super::projector::{DisplayRow, RowProjector};
use crate::model::{FilterSet, SelectedField};
use crate::planner::TablePlan;
use crate::storage::StorageProvider;
use crate::view::{build_columns, ColumnDescriptor};

/// Monotonic identifier of a run within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RunId(pub(crate) u64);

impl RunId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything a run needs, detached from the engine that planned it.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub run: RunId,
    pub fields: Vec<SelectedField>,
    pub filters: FilterSet,
    pub plans: Vec<TablePlan>,
    pub row_limit: usize,
    pub merge_strategy: MergeStrategy,
}

/// What presentation and export collaborators receive.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub run: RunId,
    pub rows: Vec<DisplayRow>,
    pub columns: Vec<ColumnDescriptor>,
    pub aggregates: AggregateMap,
    /// Fetched rows per table, in merge order.
    pub row_counts: Vec<TableCount>,
    /// Filters the run used, for export headers.
    pub filters: FilterSet,
}

impl ReportOutput {
    pub fn total(&self, key: &str) -> Option<f64> {
        self.aggregates.get(key).copied()
    }

    /// Rows contributed by `table`.
    pub fn rows_from<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a DisplayRow> {
        self.rows.iter().filter(move |row| row.origin_table == table)
    }

    /// Whether any table hit the row cap.
    pub fn truncated(&self) -> bool {
        self.row_counts.iter().any(|count| count.at_limit)
    }
}

/// Fetch, merge, project and aggregate one run.
pub async fn execute<S: StorageProvider + ?Sized>(
    request: &RunRequest,
    storage: &S,
) -> EngineResult<ReportOutput> {
    let started = Instant::now();

    let merged = fetch_and_merge(
        &request.plans,
        storage,
        request.row_limit,
        request.merge_strategy,
    )
    .await?;

    let rows = RowProjector::new(&request.fields).project_all(&merged.rows);
    let aggregates = compute_aggregates(&request.fields, &rows);
    let columns = build_columns(&request.fields);

    info!(
        run = %request.run,
        tables = request.plans.len(),
        rows = rows.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "report run completed"
    );

    Ok(ReportOutput {
        run: request.run,
        rows,
        columns,
        aggregates,
        row_counts: merged.counts,
        filters: request.filters.clone(),
    })
}
