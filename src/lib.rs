//! # Canteiro BI
//!
//! Dynamic multi-table report engine for a construction-management
//! back office.
//!
//! ## Architecture
//!
//! Users pick fields from several tables, set a date range and optional
//! entity filters, and get one merged, formatted table with totals:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  FieldCatalog (TOML)                     │
//! │     (tables, fields, value types, date columns)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model]
//! ┌─────────────────────────────────────────────────────────┐
//! │        ReportDefinition (selection + FilterSet)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner]
//! ┌─────────────────────────────────────────────────────────┐
//! │              TablePlan per referenced table              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [engine + storage]
//! ┌─────────────────────────────────────────────────────────┐
//! │   concurrent fetch ─► union merge ─► project ─► totals   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [view]
//! ┌─────────────────────────────────────────────────────────┐
//! │        ColumnDescriptor[] + formatted text table         │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod model;
pub mod planner;
pub mod storage;
pub mod view;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{FieldCatalog, TableSchema};
    pub use crate::config::{EngineSettings, FormatSettings, Settings};
    pub use crate::engine::{
        ConfigError, EngineError, EngineState, ReportEngine, ReportOutput,
    };
    pub use crate::model::{
        DatePreset, FieldDescriptor, FilterSet, ReportDefinition, SelectedField, Toggle,
        ValueType,
    };
    pub use crate::storage::{InMemoryStorage, StorageError, StorageProvider};
    pub use crate::view::{render_table, CellFormatter};
}
