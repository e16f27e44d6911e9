//! Query planner: one [`TablePlan`] per table referenced by the selection.
//!
//! For each table the planner:
//! 1. Skips it when none of its fields are selected
//! 2. Projects the row id plus the selected field keys, deduplicated
//! 3. Translates the report date range onto the table's date column
//! 4. Adds entity filters the table declares support for, ignoring the rest

use tracing::{debug, trace};

use super::plan::TablePlan;
use crate::catalog::FieldCatalog;
use crate::config::EngineSettings;
use crate::engine::ConfigError;
use crate::model::{FilterSet, ReportDefinition, SelectedField};
use crate::storage::Predicate;

/// Planner over a catalog and engine settings.
pub struct QueryPlanner<'a> {
    catalog: &'a FieldCatalog,
    settings: &'a EngineSettings,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(catalog: &'a FieldCatalog, settings: &'a EngineSettings) -> Self {
        Self { catalog, settings }
    }

    /// Plan every table of `report`, in the order tables first appear in
    /// its field selection.
    pub fn plan(&self, report: &ReportDefinition) -> Result<Vec<TablePlan>, ConfigError> {
        let mut plans = Vec::new();

        for table in report.tables() {
            if !self.catalog.has_table(table) {
                return Err(ConfigError::UnknownTable(table.to_string()));
            }

            let fields: Vec<&SelectedField> = report.fields_for_table(table).collect();
            if let Some(plan) = self.plan_table(table, &fields, &report.filters) {
                plans.push(plan);
            }
        }

        Ok(plans)
    }

    /// Plan a single table. `fields` must already be restricted to `table`.
    ///
    /// Returns `None` when `fields` is empty: a table is only queried when
    /// at least one of its fields was picked.
    pub fn plan_table(
        &self,
        table: &str,
        fields: &[&SelectedField],
        filters: &FilterSet,
    ) -> Option<TablePlan> {
        if fields.is_empty() {
            return None;
        }

        let row_id = &self.settings.row_id_column;
        let mut columns = vec![row_id.clone()];
        for field in fields {
            if !columns.contains(&field.field) {
                columns.push(field.field.clone());
            }
        }

        let mut predicates = Vec::new();

        if let Some((start, end)) = filters.normalized_date_range() {
            let date_column = self.date_column(table);
            predicates.push(Predicate::gte(date_column, start));
            predicates.push(Predicate::lte(date_column, end));
        }

        for (filter, value) in filters.active_entity_filters() {
            if self.catalog.supports_filter(table, filter) {
                predicates.push(Predicate::eq(filter, value));
            } else {
                trace!(table, filter, "entity filter not applicable to table");
            }
        }

        debug!(
            table,
            columns = columns.len(),
            predicates = predicates.len(),
            "planned table query"
        );

        Some(TablePlan {
            table: table.to_string(),
            columns,
            predicates,
        })
    }

    /// The column the date range applies to on `table`.
    pub fn date_column(&self, table: &str) -> &str {
        self.catalog
            .date_column(table)
            .unwrap_or(self.settings.default_date_column.as_str())
    }
}
