//! Report definitions and the field selection model.
//!
//! A [`ReportDefinition`] is the unit the template store persists and the
//! export renderers receive. Its `fields` sequence is the column order.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::field::SelectedField;
use super::filter::FilterSet;
use crate::catalog::FieldCatalog;
use crate::engine::ConfigError;

/// Errors raised while loading a saved report template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template references unknown table: {0}")]
    UnknownTable(String),

    #[error("Template selects {table}.{field} more than once")]
    DuplicateField { table: String, field: String },
}

pub type TemplateResult<T> = Result<T, TemplateError>;

/// Result of toggling a catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// The catalog has no such field; the selection is unchanged.
    NotInCatalog,
}

/// A user-assembled report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Selected fields in column order. `(table, field)` is unique.
    #[serde(default)]
    pub fields: Vec<SelectedField>,
    #[serde(default)]
    pub filters: FilterSet,
}

impl ReportDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Select `table.key` if it is not selected, otherwise deselect it.
    ///
    /// A new selection copies the descriptor's label and value type and
    /// goes to the end of the column order.
    pub fn toggle_field(&mut self, catalog: &FieldCatalog, table: &str, key: &str) -> Toggle {
        if self.remove_field(table, key) {
            return Toggle::Removed;
        }

        match catalog.field(table, key) {
            Some(descriptor) => {
                self.fields.push(SelectedField::from_descriptor(descriptor));
                Toggle::Added
            }
            None => {
                warn!(table, field = key, "toggled a field the catalog does not declare");
                Toggle::NotInCatalog
            }
        }
    }

    /// Remove `table.key` from the selection. Returns whether it was selected.
    pub fn remove_field(&mut self, table: &str, key: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| !f.matches(table, key));
        self.fields.len() != before
    }

    pub fn is_selected(&self, table: &str, key: &str) -> bool {
        self.fields.iter().any(|f| f.matches(table, key))
    }

    /// Rename a selected column. A blank alias restores the catalog label.
    pub fn set_alias(
        &mut self,
        catalog: &FieldCatalog,
        table: &str,
        key: &str,
        alias: &str,
    ) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.matches(table, key)) else {
            return false;
        };

        let alias = alias.trim();
        field.alias = if alias.is_empty() {
            catalog
                .field(table, key)
                .map(|d| d.label.clone())
                .unwrap_or_else(|| key.to_string())
        } else {
            alias.to_string()
        };
        true
    }

    /// Move a selected column to `index` (clamped to the last position).
    pub fn move_field(&mut self, table: &str, key: &str, index: usize) -> bool {
        let Some(from) = self.fields.iter().position(|f| f.matches(table, key)) else {
            return false;
        };

        let field = self.fields.remove(from);
        let to = index.min(self.fields.len());
        self.fields.insert(to, field);
        true
    }

    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    /// Distinct tables in the order they first appear in the selection.
    pub fn tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !tables.contains(&field.table.as_str()) {
                tables.push(&field.table);
            }
        }
        tables
    }

    /// Selected fields belonging to `table`, in column order.
    pub fn fields_for_table<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a SelectedField> {
        self.fields.iter().filter(move |f| f.table == table)
    }

    /// The first selection that repeats an earlier `(table, field)` pair.
    pub fn duplicate_field(&self) -> Option<&SelectedField> {
        self.fields.iter().enumerate().find_map(|(i, field)| {
            self.fields[..i]
                .iter()
                .any(|earlier| earlier.matches(&field.table, &field.field))
                .then_some(field)
        })
    }

    /// Check the selection itself: known tables, no repeated fields.
    pub fn check_fields(&self, catalog: &FieldCatalog) -> Result<(), ConfigError> {
        if let Some(field) = self.fields.iter().find(|f| !catalog.has_table(&f.table)) {
            return Err(ConfigError::UnknownTable(field.table.clone()));
        }

        if let Some(field) = self.duplicate_field() {
            return Err(ConfigError::DuplicateField {
                table: field.table.clone(),
                field: field.field.clone(),
            });
        }
        Ok(())
    }

    /// Check that the report can run: at least one field, a valid selection
    /// and a valid date range.
    pub fn validate(&self, catalog: &FieldCatalog) -> Result<(), ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::NoFieldsSelected);
        }

        self.check_fields(catalog)?;

        self.filters.validate()?;
        Ok(())
    }

    pub fn to_json(&self) -> TemplateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a saved template, checking its tables against the catalog and
    /// rejecting repeated selections.
    ///
    /// Value types and aliases stored in the template are kept as saved.
    pub fn from_json(json: &str, catalog: &FieldCatalog) -> TemplateResult<Self> {
        let report: ReportDefinition = serde_json::from_str(json)?;

        if let Some(field) = report.fields.iter().find(|f| !catalog.has_table(&f.table)) {
            return Err(TemplateError::UnknownTable(field.table.clone()));
        }

        if let Some(field) = report.duplicate_field() {
            return Err(TemplateError::DuplicateField {
                table: field.table.clone(),
                field: field.field.clone(),
            });
        }

        Ok(report)
    }
}
