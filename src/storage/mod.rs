//! Storage capability.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      StorageProvider                            │
//! │   query(table, columns, predicates[gte|lte|eq], limit)          │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼  JSON rows, validated once
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              RawRow { id, column -> CellValue }                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine owns no connections, transactions or schema. Any backend that
//! can answer a [`QueryRequest`] plugs in; [`InMemoryStorage`] ships with
//! the crate.

mod error;
mod memory;
mod provider;
mod row;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStorage;
pub use provider::{Operator, Predicate, QueryRequest, StorageProvider};
pub use row::{CellValue, RawRow};
