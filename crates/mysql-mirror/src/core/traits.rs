//! Core traits for the copy engine.
//!
//! - [`DatabaseHandle`]: an open connection that can answer metadata queries
//! - [`SourceHandle`]: a handle the `titles` rows are streamed out of
//! - [`TargetHandle`]: a handle the rows are inserted into, inside one transaction
//! - [`RowCursor`]: forward-only row stream over a single select
//!
//! The orchestrator only talks to these traits, so the copy loop runs the same
//! against MySQL and against the in-memory fakes used in tests.

use async_trait::async_trait;

use crate::error::Result;

use super::schema::ColumnDescription;
use super::value::TitleRecord;

/// An open database connection, owned by exactly one caller.
#[async_trait]
pub trait DatabaseHandle: Send {
    /// Database name, used in log lines and error messages.
    fn database(&self) -> &str;

    /// Names of all tables in the database (`SHOW TABLES`).
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Column layout of a table (`DESCRIBE <table>`).
    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnDescription>>;

    /// Release the connection.
    ///
    /// Uncommitted work on the connection is discarded by the server.
    async fn close(self);
}

/// Forward-only stream over the rows of one select.
///
/// Rows are pulled from the wire on demand; nothing is buffered beyond what
/// the caller holds.
#[async_trait]
pub trait RowCursor: Send {
    /// Next row, or `None` once the result set is exhausted.
    async fn next_row(&mut self) -> Result<Option<TitleRecord>>;
}

/// Source side of the copy.
#[async_trait]
pub trait SourceHandle: DatabaseHandle {
    /// Issue the single unrestricted `SELECT` over `titles`.
    ///
    /// No ordering is imposed; rows come back in whatever order the server
    /// yields them.
    async fn select_titles<'a>(&'a mut self) -> Result<Box<dyn RowCursor + 'a>>;
}

/// Target side of the copy.
#[async_trait]
pub trait TargetHandle: DatabaseHandle {
    /// Turn autocommit off so every insert joins one transaction.
    async fn disable_autocommit(&mut self) -> Result<()>;

    /// Insert rows into `titles` with multi-row statements, in the given order.
    ///
    /// Returns the number of rows inserted. On error no row of `rows` is kept
    /// when the handle is in transactional mode.
    async fn insert_titles(&mut self, rows: &[TitleRecord]) -> Result<u64>;

    /// Commit the open transaction.
    async fn commit(&mut self) -> Result<()>;
}
