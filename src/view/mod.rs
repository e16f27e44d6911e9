//! Presentation helpers: column descriptors, cell formatting and a
//! plain-text table renderer for report output.

mod column;
mod format;
mod render;

pub use column::{build_columns, ColumnDescriptor, FormatterKind};
pub use format::CellFormatter;
pub use render::render_table;
