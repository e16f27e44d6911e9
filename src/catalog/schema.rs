//! Per-table catalog entries.

use crate::model::{FieldDescriptor, ValueType};

/// One table of the field catalog.
///
/// Besides its fields, a table declares which column the report date range
/// applies to and which entity filters it understands.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: String,
    /// Column the report date range filters on. `None` uses the engine default.
    pub date_column: Option<String>,
    /// Entity filters this table accepts (e.g. `cliente_id`, `obra_id`).
    /// The filter name is also the column the equality predicate targets.
    pub entity_filters: Vec<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date_column: None,
            entity_filters: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = Some(column.into());
        self
    }

    pub fn entity_filter(mut self, filter: impl Into<String>) -> Self {
        self.entity_filters.push(filter.into());
        self
    }

    /// Add a field with the default aggregatable/groupable flags for its type.
    pub fn field(self, key: &str, label: &str, value_type: ValueType) -> Self {
        let descriptor = FieldDescriptor::new(self.name.clone(), key, label, value_type);
        self.descriptor(descriptor)
    }

    /// Add a prebuilt descriptor. Its `table` is rewritten to this table.
    pub fn descriptor(mut self, mut descriptor: FieldDescriptor) -> Self {
        descriptor.table = self.name.clone();
        self.fields.push(descriptor);
        self
    }

    pub fn get_field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn supports_filter(&self, filter: &str) -> bool {
        self.entity_filters.iter().any(|f| f == filter)
    }
}
