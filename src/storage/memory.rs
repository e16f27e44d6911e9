//! In-memory storage backend.
//!
//! Holds tables of JSON rows and answers [`QueryRequest`]s the way a hosted
//! backend would. Used by the CLI (rows loaded from a JSON file) and by tests,
//! which can inject latency or failures per table and inspect the requests
//! that were issued.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::error::{StorageError, StorageResult};
use super::provider::{QueryRequest, StorageProvider};
use super::row::RawRow;

/// Tables of JSON rows kept in memory.
#[derive(Debug)]
pub struct InMemoryStorage {
    tables: HashMap<String, Vec<Value>>,
    row_id_column: String,
    failing: HashSet<String>,
    latency: HashMap<String, Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<QueryRequest>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self {
            tables: HashMap::new(),
            row_id_column: "id".to_string(),
            failing: HashSet::new(),
            latency: HashMap::new(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load tables from a JSON document shaped `{"table": [{...}, ...]}`.
    pub fn from_json_str(json: &str) -> StorageResult<Self> {
        let tables: HashMap<String, Vec<Value>> = serde_json::from_str(json)?;
        Ok(Self {
            tables,
            ..Self::default()
        })
    }

    pub fn with_row_id_column(mut self, column: impl Into<String>) -> Self {
        self.row_id_column = column.into();
        self
    }

    pub fn with_table(mut self, table: impl Into<String>, rows: Vec<Value>) -> Self {
        self.tables.insert(table.into(), rows);
        self
    }

    /// Make every query against `table` fail.
    pub fn failing_table(mut self, table: impl Into<String>) -> Self {
        self.failing.insert(table.into());
        self
    }

    /// Delay every query against `table`.
    pub fn with_latency(mut self, table: impl Into<String>, delay: Duration) -> Self {
        self.latency.insert(table.into(), delay);
        self
    }

    pub fn insert(&mut self, table: impl Into<String>, row: Value) {
        self.tables.entry(table.into()).or_default().push(row);
    }

    /// Number of queries received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn record(&self, request: &QueryRequest) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }
    }

    fn scan(&self, request: &QueryRequest) -> StorageResult<Vec<RawRow>> {
        if self.failing.contains(&request.table) {
            return Err(StorageError::Unavailable(format!(
                "table '{}' is offline",
                request.table
            )));
        }

        let rows = self
            .tables
            .get(&request.table)
            .ok_or_else(|| StorageError::UnknownTable(request.table.clone()))?;

        let mut matched = Vec::new();
        for value in rows {
            if matched.len() >= request.limit {
                break;
            }

            let row = RawRow::from_json(&request.table, &self.row_id_column, value.clone())?;
            if request.predicates.iter().all(|p| p.matches(&row)) {
                matched.push(row.project(&request.columns));
            }
        }

        Ok(matched)
    }
}

#[async_trait]
impl StorageProvider for InMemoryStorage {
    async fn query(&self, request: &QueryRequest) -> StorageResult<Vec<RawRow>> {
        self.record(request);

        if let Some(delay) = self.latency.get(&request.table) {
            tokio::time::sleep(*delay).await;
        }

        self.scan(request)
    }
}
