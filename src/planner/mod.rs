//! Per-table query planning.
//!
//! Turns a report's field selection and filters into one [`TablePlan`] per
//! referenced table. There is no join inference: each table is planned on
//! its own and the results are merged later by the engine.

mod plan;
mod table_planner;

pub use plan::TablePlan;
pub use table_planner::QueryPlanner;
