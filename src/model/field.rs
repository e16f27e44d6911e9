//! Catalog field descriptors and the user's selected fields.

use serde::{Deserialize, Serialize};

use super::types::ValueType;

/// A queryable field as declared in the field catalog.
///
/// Descriptors are built once when the catalog loads and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Table the field belongs to.
    pub table: String,
    /// Column name in storage.
    pub key: String,
    /// Human-readable label.
    pub label: String,
    pub value_type: ValueType,
    /// Whether the field can be totalled.
    pub aggregatable: bool,
    /// Whether the field can be used as a grouping key.
    pub groupable: bool,
}

impl FieldDescriptor {
    /// Create a descriptor; numeric-family fields default to aggregatable,
    /// everything else to groupable.
    pub fn new(
        table: impl Into<String>,
        key: impl Into<String>,
        label: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            table: table.into(),
            key: key.into(),
            label: label.into(),
            value_type,
            aggregatable: value_type.is_numeric(),
            groupable: !value_type.is_numeric(),
        }
    }

    pub fn with_aggregatable(mut self, aggregatable: bool) -> Self {
        self.aggregatable = aggregatable;
        self
    }

    pub fn with_groupable(mut self, groupable: bool) -> Self {
        self.groupable = groupable;
        self
    }
}

/// One `(table, field)` pair chosen by the user.
///
/// The value type is captured when the field is selected. Later catalog
/// changes do not alter a report that was already built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedField {
    pub table: String,
    /// The descriptor key this selection points at.
    pub field: String,
    /// Display title; defaults to the descriptor label.
    pub alias: String,
    pub value_type: ValueType,
}

impl SelectedField {
    pub fn from_descriptor(descriptor: &FieldDescriptor) -> Self {
        Self {
            table: descriptor.table.clone(),
            field: descriptor.key.clone(),
            alias: descriptor.label.clone(),
            value_type: descriptor.value_type,
        }
    }

    /// Check whether this selection refers to `table.key`.
    pub fn matches(&self, table: &str, key: &str) -> bool {
        self.table == table && self.field == key
    }
}
