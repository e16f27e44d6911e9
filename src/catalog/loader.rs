//! TOML catalog files.
//!
//! ```toml
//! [[tables]]
//! name = "despesas"
//! date_column = "data_despesa"
//! entity_filters = ["cliente_id", "obra_id"]
//!
//! [[tables.fields]]
//! key = "valor"
//! label = "Valor"
//! value_type = "currency"
//!
//! [[tables.fields]]
//! key = "categoria"
//! label = "Categoria"
//! value_type = "text"
//! ```
//!
//! `label` defaults to the key; `aggregatable` and `groupable` default from
//! the value type.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{CatalogError, CatalogResult, FieldCatalog, TableSchema};
use crate::model::{FieldDescriptor, ValueType};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tables: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    name: String,
    #[serde(default)]
    date_column: Option<String>,
    #[serde(default)]
    entity_filters: Vec<String>,
    #[serde(default)]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    key: String,
    #[serde(default)]
    label: Option<String>,
    value_type: ValueType,
    #[serde(default)]
    aggregatable: Option<bool>,
    #[serde(default)]
    groupable: Option<bool>,
}

impl TableEntry {
    fn into_schema(self) -> TableSchema {
        let mut schema = TableSchema::new(self.name);
        schema.date_column = self.date_column.filter(|c| !c.trim().is_empty());
        schema.entity_filters = self.entity_filters;

        for entry in self.fields {
            let label = entry.label.unwrap_or_else(|| entry.key.clone());
            let mut descriptor =
                FieldDescriptor::new(schema.name.clone(), entry.key, label, entry.value_type);
            if let Some(aggregatable) = entry.aggregatable {
                descriptor = descriptor.with_aggregatable(aggregatable);
            }
            if let Some(groupable) = entry.groupable {
                descriptor = descriptor.with_groupable(groupable);
            }
            schema = schema.descriptor(descriptor);
        }

        schema
    }
}

impl FieldCatalog {
    /// Parse a catalog from TOML source.
    pub fn from_toml_str(source: &str) -> CatalogResult<Self> {
        let file: CatalogFile = toml::from_str(source)?;
        FieldCatalog::from_tables(file.tables.into_iter().map(TableEntry::into_schema))
    }

    /// Load a catalog from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
