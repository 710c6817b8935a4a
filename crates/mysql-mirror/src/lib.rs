//! # mysql-mirror
//!
//! Batched copy of the employees sample database's `titles` table from one
//! MySQL database into another.
//!
//! A run:
//!
//! - **Validates** both databases against the expected `titles` layout
//! - **Streams** the source table through a forward-only cursor
//! - **Inserts** it into the target in bounded batches
//! - **Commits** the target once, when autocommit could be disabled
//!
//! A rejected batch is logged and recorded in the [`CopyReport`]; the copy
//! carries on with the next batch.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mysql_mirror::{CopyOrchestrator, EndpointConfig, MirrorConfig, MysqlReader, MysqlWriter};
//!
//! #[tokio::main]
//! async fn main() -> mysql_mirror::Result<()> {
//!     let config = MirrorConfig::new(
//!         EndpointConfig::new("root", "secret", "localhost", "employees"),
//!         EndpointConfig::new("root", "secret", "localhost", "employees_copy"),
//!     );
//!     config.validate()?;
//!
//!     let source = MysqlReader::connect(&config.source).await;
//!     let target = MysqlWriter::connect(&config.target).await;
//!     let report = CopyOrchestrator::from_config(&config).run(source, target).await?;
//!     println!("Copied {} rows", report.rows_written);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod orchestrator;
pub mod transfer;
pub mod verify;

#[cfg(test)]
mod test_utils;

// Re-exports for convenient access
pub use config::{EndpointConfig, MirrorConfig};
pub use crate::core::{
    Batch, ColumnDescription, DatabaseHandle, KeyRole, RowCursor, SchemaDescriptor, SourceHandle,
    TargetHandle, TitleRecord,
};
pub use drivers::{MysqlReader, MysqlWriter};
pub use error::{MirrorError, Result};
pub use orchestrator::{CopyOrchestrator, CopyReport, Phase, TransactionMode};
pub use transfer::{BatchFailure, BatchOutcome, BatchReader, BatchWriter, DEFAULT_BATCH_SIZE};
pub use verify::{SchemaReport, SchemaValidator};
