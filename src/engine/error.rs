//! Error taxonomy of a report run.
//!
//! Configuration errors are raised before any fetch and block the run.
//! Fetch errors abort the whole run; no partial result is produced.
//! Dirty data never errors (missing cells are absent, bad numbers count as 0).

use thiserror::Error;

use super::run::RunId;
use crate::storage::StorageError;

/// A report that cannot run as configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("No fields selected")]
    NoFieldsSelected,

    #[error("Start date is required")]
    MissingDateStart,

    #[error("End date is required")]
    MissingDateEnd,

    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("End date {end} is before start date {start}")]
    InvalidDateRange { start: String, end: String },

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Field {table}.{field} is selected more than once")]
    DuplicateField { table: String, field: String },
}

/// Errors returned by a report run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Report configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch table '{table}': {source}")]
    Fetch {
        table: String,
        #[source]
        source: StorageError,
    },

    #[error("Run {run} was superseded by a newer run")]
    Superseded { run: RunId },
}

impl EngineError {
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// The table whose fetch failed, for fetch errors.
    pub fn failed_table(&self) -> Option<&str> {
        match self {
            Self::Fetch { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Check if running the report again may succeed.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Fetch { source, .. } => source.is_retriable(),
            Self::Superseded { .. } => true,
            Self::Config(_) => false,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
