//! Field catalog: the registry of queryable fields per table.
//!
//! The catalog is built once at application start (from code or from a TOML
//! file, see [`loader`]) and shared read-only, usually behind an `Arc`.
//!
//! ```text
//! FieldCatalog
//!   ├── despesas      date_column = data_despesa, filters = [cliente_id, obra_id]
//!   │     ├── valor       currency
//!   │     └── categoria   text
//!   └── funcionarios  date_column = (default), filters = []
//!         └── nome        text
//! ```

pub mod loader;
mod schema;

pub use schema::TableSchema;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::model::FieldDescriptor;

/// Errors raised while building or loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read catalog file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Table declared twice: {0}")]
    DuplicateTable(String),

    #[error("Field '{field}' declared twice on table '{table}'")]
    DuplicateField { table: String, field: String },

    #[error("Table '{0}' declares no fields")]
    EmptyTable(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Typed `table -> fields` registry, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    tables: Vec<TableSchema>,
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from table schemas, rejecting duplicates.
    pub fn from_tables(tables: impl IntoIterator<Item = TableSchema>) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for table in tables {
            catalog.add_table(table)?;
        }
        Ok(catalog)
    }

    pub fn add_table(&mut self, table: TableSchema) -> CatalogResult<()> {
        if self.index.contains_key(&table.name) {
            return Err(CatalogError::DuplicateTable(table.name));
        }
        if table.fields.is_empty() {
            return Err(CatalogError::EmptyTable(table.name));
        }
        for (i, field) in table.fields.iter().enumerate() {
            if table.fields[..i].iter().any(|f| f.key == field.key) {
                return Err(CatalogError::DuplicateField {
                    table: table.name.clone(),
                    field: field.key.clone(),
                });
            }
        }

        self.index.insert(table.name.clone(), self.tables.len());
        self.tables.push(table);
        Ok(())
    }

    /// Table names in declaration order.
    pub fn get_tables(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Fields of `table`; empty for unknown tables.
    pub fn get_fields(&self, table: &str) -> &[FieldDescriptor] {
        self.table(table).map(|t| t.fields.as_slice()).unwrap_or(&[])
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field(&self, table: &str, key: &str) -> Option<&FieldDescriptor> {
        self.table(table)?.get_field(key)
    }

    /// The date column declared for `table`, if any.
    pub fn date_column(&self, table: &str) -> Option<&str> {
        self.table(table)?.date_column.as_deref()
    }

    /// Whether `table` is on the allow-list for entity filter `filter`.
    pub fn supports_filter(&self, table: &str, filter: &str) -> bool {
        self.table(table)
            .map(|t| t.supports_filter(filter))
            .unwrap_or(false)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
