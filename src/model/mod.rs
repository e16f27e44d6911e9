//! Report definition model: catalog field descriptors, the user's field
//! selection and the shared filter set.

pub mod field;
pub mod filter;
pub mod report;
pub mod types;

pub use field::{FieldDescriptor, SelectedField};
pub use filter::{DatePreset, DateRange, FilterSet, ALL, DATE_FORMAT};
pub use report::{ReportDefinition, TemplateError, TemplateResult, Toggle};
pub use types::ValueType;
