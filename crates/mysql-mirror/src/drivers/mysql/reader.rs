//! MySQL source handle.
//!
//! Rows are read through `exec_iter`, which pulls result rows off the socket
//! one at a time instead of buffering the whole result set (the async
//! equivalent of an unbuffered server-side cursor).

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{BinaryProtocol, Conn, QueryResult};
use tracing::{debug, warn};

use crate::config::EndpointConfig;
use crate::core::{ColumnDescription, DatabaseHandle, RowCursor, SourceHandle, TitleRecord};
use crate::error::Result;

use super::codec::row_to_title;
use super::connection::{connect_or_log, describe_table, show_tables};
use super::dialect::MysqlDialect;

/// MySQL source handle owning one connection.
pub struct MysqlReader {
    conn: Conn,
    database: String,
    dialect: MysqlDialect,
}

impl MysqlReader {
    /// Wrap an open connection.
    pub fn new(conn: Conn, database: impl Into<String>) -> Self {
        Self {
            conn,
            database: database.into(),
            dialect: MysqlDialect::new(),
        }
    }

    /// Connect to `endpoint`; `None` (after logging the error) if unreachable.
    pub async fn connect(endpoint: &EndpointConfig) -> Option<Self> {
        connect_or_log(endpoint)
            .await
            .map(|conn| Self::new(conn, endpoint.database.clone()))
    }
}

/// Forward-only cursor over the `titles` select.
struct MysqlCursor<'a> {
    result: QueryResult<'a, 'static, BinaryProtocol>,
}

#[async_trait]
impl RowCursor for MysqlCursor<'_> {
    async fn next_row(&mut self) -> Result<Option<TitleRecord>> {
        match self.result.next().await? {
            Some(row) => Ok(Some(row_to_title(row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DatabaseHandle for MysqlReader {
    fn database(&self) -> &str {
        &self.database
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        show_tables(&mut self.conn).await
    }

    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnDescription>> {
        describe_table(&mut self.conn, table).await
    }

    async fn close(self) {
        if let Err(e) = self.conn.disconnect().await {
            warn!("Error closing MySQL source {}: {}", self.database, e);
        }
    }
}

#[async_trait]
impl SourceHandle for MysqlReader {
    async fn select_titles<'a>(&'a mut self) -> Result<Box<dyn RowCursor + 'a>> {
        let sql = self.dialect.select_titles();
        debug!("{}: {}", self.database, sql);
        let result = self.conn.exec_iter(sql, ()).await?;
        Ok(Box::new(MysqlCursor { result }))
    }
}
