//! Report engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ReportEngine  (Idle → Configuring → Executing → ...)        │
//! │    ReportDefinition + FilterSet                              │
//! └──────────────────────────────────────────────────────────────┘
//!                          │ begin_run: validate + plan
//!                          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  TablePlan × N  ──►  TableFetcher × N  (concurrent, capped)  │
//! └──────────────────────────────────────────────────────────────┘
//!                          │ merge (union, plan order)
//!                          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  RowProjector ──► DisplayRow[] ──► AggregateMap, columns     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use canteiro_bi::engine::ReportEngine;
//!
//! let mut engine = ReportEngine::new(Arc::new(catalog), settings.engine.clone());
//! engine.toggle_field("despesas", "valor");
//! engine.set_date_range("2024-01-01", "2024-01-31");
//!
//! let output = engine.run(&storage).await?;
//! println!("total: {:?}", output.total("valor"));
//! ```

mod aggregate;
mod error;
mod fetch;
mod merge;
mod projector;
mod report_engine;
mod run;

pub use aggregate::{compute_aggregates, AggregateMap};
pub use error::{ConfigError, EngineError, EngineResult};
pub use fetch::{TableCount, TableFetcher, TableRows};
pub use merge::{fetch_and_merge, MergeStrategy, MergedRow, MergedRows};
pub use projector::{DisplayRow, RowProjector};
pub use report_engine::{EngineState, ReportEngine};
pub use run::{execute, ReportOutput, RunId, RunRequest};
