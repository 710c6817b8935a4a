//! MySQL target handle.
//!
//! Inserts use multi-row `INSERT ... VALUES (?, ?, ?, ?), ...` statements,
//! split only where MySQL's placeholder cap forces it. While autocommit is off
//! each batch runs inside a savepoint, so a batch that fails part-way leaves
//! none of its rows behind.

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::Conn;
use tracing::{debug, warn};

use crate::config::EndpointConfig;
use crate::core::{ColumnDescription, DatabaseHandle, TargetHandle, TitleRecord};
use crate::error::Result;

use super::codec::title_to_params;
use super::connection::{connect_or_log, describe_table, show_tables};
use super::dialect::{MysqlDialect, MAX_ROWS_PER_INSERT};

/// MySQL target handle owning one connection.
pub struct MysqlWriter {
    conn: Conn,
    database: String,
    dialect: MysqlDialect,
    transactional: bool,
}

impl MysqlWriter {
    /// Wrap an open connection.
    pub fn new(conn: Conn, database: impl Into<String>) -> Self {
        Self {
            conn,
            database: database.into(),
            dialect: MysqlDialect::new(),
            transactional: false,
        }
    }

    /// Connect to `endpoint`; `None` (after logging the error) if unreachable.
    pub async fn connect(endpoint: &EndpointConfig) -> Option<Self> {
        connect_or_log(endpoint)
            .await
            .map(|conn| Self::new(conn, endpoint.database.clone()))
    }

    /// Write rows using as few multi-row INSERTs as the placeholder cap allows.
    async fn write_rows(&mut self, rows: &[TitleRecord]) -> Result<u64> {
        for chunk in rows.chunks(MAX_ROWS_PER_INSERT) {
            let sql = self.dialect.insert_titles(chunk.len());
            let params: Vec<mysql_async::Value> =
                chunk.iter().flat_map(title_to_params).collect();
            self.conn.exec_drop(sql, params).await?;
        }
        Ok(rows.len() as u64)
    }
}

#[async_trait]
impl DatabaseHandle for MysqlWriter {
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
            warn!("Error closing MySQL target {}: {}", self.database, e);
        }
    }
}

#[async_trait]
impl TargetHandle for MysqlWriter {
    async fn disable_autocommit(&mut self) -> Result<()> {
        self.conn
            .query_drop(self.dialect.disable_autocommit())
            .await?;
        self.transactional = true;
        debug!("Autocommit disabled on {}", self.database);
        Ok(())
    }

    async fn insert_titles(&mut self, rows: &[TitleRecord]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        if !self.transactional {
            return self.write_rows(rows).await;
        }

        self.conn.query_drop(self.dialect.savepoint()).await?;
        match self.write_rows(rows).await {
            Ok(written) => {
                self.conn
                    .query_drop(self.dialect.release_savepoint())
                    .await?;
                Ok(written)
            }
            Err(e) => {
                if let Err(rollback) = self
                    .conn
                    .query_drop(self.dialect.rollback_to_savepoint())
                    .await
                {
                    warn!(
                        "Could not roll back failed batch on {}: {}",
                        self.database, rollback
                    );
                }
                Err(e)
            }
        }
    }

    async fn commit(&mut self) -> Result<()> {
        self.conn.query_drop("COMMIT").await?;
        debug!("Committed {}", self.database);
        Ok(())
    }
}
