//! The report engine: owns the report being edited and drives runs.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::error::{ConfigError, EngineError, EngineResult};
use super::run::{execute, ReportOutput, RunId, RunRequest};
use crate::catalog::FieldCatalog;
use crate::config::EngineSettings;
use crate::model::{DatePreset, FilterSet, ReportDefinition, Toggle};
use crate::planner::{QueryPlanner, TablePlan};
use crate::storage::StorageProvider;
use crate::view::{build_columns, ColumnDescriptor};

/// Lifecycle of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No fields selected; nothing can run.
    Idle,
    /// Fields or filters being edited, no run in flight.
    Configuring,
    /// A run is in flight.
    Executing { run: RunId },
}

/// Report engine over a shared, read-only catalog.
///
/// Edits go through the engine so it can track its state. Runs follow
/// "latest wins": starting a run supersedes any run still in flight, and
/// the superseded run's result is discarded by [`ReportEngine::finish_run`].
/// In-flight fetches are not cancelled.
pub struct ReportEngine {
    catalog: Arc<FieldCatalog>,
    settings: EngineSettings,
    report: ReportDefinition,
    state: EngineState,
    runs_started: u64,
    latest_run: Option<RunId>,
}

impl ReportEngine {
    /// Engine with an empty report.
    pub fn new(catalog: Arc<FieldCatalog>, settings: EngineSettings) -> Self {
        Self {
            catalog,
            settings,
            report: ReportDefinition::default(),
            state: EngineState::Idle,
            runs_started: 0,
            latest_run: None,
        }
    }

    /// Engine editing an existing report (e.g. a loaded template).
    pub fn with_report(
        catalog: Arc<FieldCatalog>,
        settings: EngineSettings,
        report: ReportDefinition,
    ) -> Result<Self, ConfigError> {
        report.check_fields(&catalog)?;

        let mut engine = Self::new(catalog, settings);
        engine.report = report;
        engine.edited();
        Ok(engine)
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn report(&self) -> &ReportDefinition {
        &self.report
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    // =========================================================================
    // Editing
    // =========================================================================

    pub fn toggle_field(&mut self, table: &str, key: &str) -> Toggle {
        let toggle = self.report.toggle_field(&self.catalog, table, key);
        self.edited();
        toggle
    }

    pub fn remove_field(&mut self, table: &str, key: &str) -> bool {
        let removed = self.report.remove_field(table, key);
        self.edited();
        removed
    }

    pub fn is_selected(&self, table: &str, key: &str) -> bool {
        self.report.is_selected(table, key)
    }

    pub fn set_alias(&mut self, table: &str, key: &str, alias: &str) -> bool {
        let renamed = self.report.set_alias(&self.catalog, table, key, alias);
        self.edited();
        renamed
    }

    pub fn move_field(&mut self, table: &str, key: &str, index: usize) -> bool {
        let moved = self.report.move_field(table, key, index);
        self.edited();
        moved
    }

    pub fn clear_fields(&mut self) {
        self.report.clear_fields();
        self.edited();
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.report.filters = filters;
        self.edited();
    }

    pub fn set_date_range(&mut self, start: impl Into<String>, end: impl Into<String>) {
        self.report.filters.date_start = Some(start.into());
        self.report.filters.date_end = Some(end.into());
        self.edited();
    }

    pub fn set_entity_filter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.report.filters.set_entity(name, value);
        self.edited();
    }

    pub fn apply_preset(&mut self, preset: DatePreset, today: NaiveDate) {
        self.report.filters.apply_preset(preset, today);
        self.edited();
    }

    fn edited(&mut self) {
        self.state = if self.report.fields.is_empty() {
            EngineState::Idle
        } else {
            EngineState::Configuring
        };
    }

    // =========================================================================
    // Views and planning
    // =========================================================================

    /// Column descriptors for the current selection.
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        build_columns(&self.report.fields)
    }

    /// Validate the report and plan every table it references.
    pub fn plan(&self) -> Result<Vec<TablePlan>, ConfigError> {
        self.report.validate(&self.catalog)?;
        QueryPlanner::new(&self.catalog, &self.settings).plan(&self.report)
    }

    // =========================================================================
    // Running
    // =========================================================================

    /// Validate, plan and start a run.
    ///
    /// Configuration errors leave the state untouched and no run starts.
    pub fn begin_run(&mut self) -> Result<RunRequest, ConfigError> {
        let plans = self.plan()?;

        self.runs_started += 1;
        let run = RunId(self.runs_started);
        if let Some(previous) = self.latest_run {
            if matches!(self.state, EngineState::Executing { .. }) {
                debug!(%previous, %run, "superseding in-flight run");
            }
        }
        self.latest_run = Some(run);
        self.state = EngineState::Executing { run };

        Ok(RunRequest {
            run,
            fields: self.report.fields.clone(),
            filters: self.report.filters.clone(),
            plans,
            row_limit: self.settings.row_limit,
            merge_strategy: self.settings.merge_strategy,
        })
    }

    /// Settle a run. Results of superseded runs are discarded.
    pub fn finish_run(
        &mut self,
        run: RunId,
        result: EngineResult<ReportOutput>,
    ) -> EngineResult<ReportOutput> {
        if self.latest_run != Some(run) {
            debug!(%run, "discarding result of superseded run");
            return Err(EngineError::Superseded { run });
        }

        if self.state == (EngineState::Executing { run }) {
            self.edited();
        }
        result
    }

    /// Run the current report to completion.
    pub async fn run<S: StorageProvider + ?Sized>(
        &mut self,
        storage: &S,
    ) -> EngineResult<ReportOutput> {
        let request = self.begin_run()?;
        let result = execute(&request, storage).await;
        self.finish_run(request.run, result)
    }
}
