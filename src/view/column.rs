//! Render-ready column descriptors.

use serde::Serialize;

use crate::model::{SelectedField, ValueType};

/// Which formatter a column's cells go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatterKind {
    /// Localized money, e.g. `R$ 1.234,56`.
    Currency,
    /// Localized short date.
    Date,
    /// Yes/No label.
    Boolean,
    /// Thousands-grouped number.
    Number,
    /// Raw string.
    Text,
}

impl From<ValueType> for FormatterKind {
    fn from(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Currency => FormatterKind::Currency,
            ValueType::Date => FormatterKind::Date,
            ValueType::Boolean => FormatterKind::Boolean,
            ValueType::Number => FormatterKind::Number,
            ValueType::Text => FormatterKind::Text,
        }
    }
}

/// One output column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    /// Field key; the key cells are looked up by in a display row.
    pub key: String,
    /// Header text (the selection alias).
    pub title: String,
    /// Table the column was picked from.
    pub table: String,
    pub value_type: ValueType,
    pub formatter: FormatterKind,
    /// Whether the column has an entry in the aggregate map.
    pub aggregated: bool,
}

impl ColumnDescriptor {
    pub fn from_selected(field: &SelectedField) -> Self {
        Self {
            key: field.field.clone(),
            title: field.alias.clone(),
            table: field.table.clone(),
            value_type: field.value_type,
            formatter: field.value_type.into(),
            aggregated: field.value_type.is_numeric(),
        }
    }
}

/// One descriptor per selected field, in selection order.
pub fn build_columns(fields: &[SelectedField]) -> Vec<ColumnDescriptor> {
    fields.iter().map(ColumnDescriptor::from_selected).collect()
}
