//! Row projector: raw table rows to display rows.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::merge::MergedRow;
use crate::model::SelectedField;
use crate::storage::CellValue;

/// A merged row addressed by field key.
///
/// Keys are not table-qualified: two tables selecting a field with the
/// same key share one display column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub id: CellValue,
    pub origin_table: String,
    pub values: BTreeMap<String, CellValue>,
}

impl DisplayRow {
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.values.get(key)
    }
}

/// Projects rows onto the selected fields of their origin table.
pub struct RowProjector<'a> {
    keys_by_table: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> RowProjector<'a> {
    pub fn new(fields: &'a [SelectedField]) -> Self {
        let mut keys_by_table: HashMap<&str, Vec<&str>> = HashMap::new();
        for field in fields {
            keys_by_table
                .entry(field.table.as_str())
                .or_default()
                .push(field.field.as_str());
        }
        Self { keys_by_table }
    }

    /// Copy the origin table's selected columns into a display row.
    /// Columns the raw row lacks stay absent.
    pub fn project(&self, merged: &MergedRow) -> DisplayRow {
        let mut values = BTreeMap::new();

        if let Some(keys) = self.keys_by_table.get(merged.origin_table.as_str()) {
            for key in keys {
                if let Some(value) = merged.row.get(key) {
                    values.insert(key.to_string(), value.clone());
                }
            }
        }

        DisplayRow {
            id: merged.row.id().clone(),
            origin_table: merged.origin_table.clone(),
            values,
        }
    }

    pub fn project_all(&self, rows: &[MergedRow]) -> Vec<DisplayRow> {
        rows.iter().map(|row| self.project(row)).collect()
    }
}
