//! Core abstractions for the copy engine.
//!
//! - [`schema`]: expected table layout and `DESCRIBE` row types
//! - [`value`]: the `titles` row type and batches of rows
//! - [`traits`]: handle traits implemented by drivers and test fakes

pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{
    ColumnDescription, KeyRole, SchemaDescriptor, EMPLOYEES_TABLE, TITLES_TABLE, TITLE_COLUMNS,
};
pub use traits::{DatabaseHandle, RowCursor, SourceHandle, TargetHandle};
pub use value::{Batch, TitleRecord};
