//! Connection setup and metadata queries shared by the reader and writer.

use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, OptsBuilder, Row};
use tracing::{error, info};

use crate::config::EndpointConfig;
use crate::core::ColumnDescription;
use crate::error::{MirrorError, Result};

use super::codec::describe_row;
use super::dialect::MysqlDialect;

/// Open a single connection to `endpoint` and check it answers.
pub async fn connect(endpoint: &EndpointConfig) -> Result<Conn> {
    let builder = OptsBuilder::default()
        .ip_or_hostname(endpoint.host.clone())
        .tcp_port(endpoint.port)
        .db_name(Some(endpoint.database.clone()))
        .user(Some(endpoint.user.clone()))
        .pass(Some(endpoint.password.clone()))
        // Use utf8mb4 for full Unicode support
        .init(vec!["SET NAMES utf8mb4"]);

    let opts: Opts = builder.into();
    let mut conn = Conn::new(opts).await?;

    // Test connection
    conn.query_drop("SELECT 1").await?;

    info!("Connected to MySQL: {}", endpoint.display_name());
    Ok(conn)
}

/// Like [`connect`], but logs the failure and yields `None`.
///
/// The orchestrator turns a `None` handle into a fatal connection error that
/// names the database.
pub async fn connect_or_log(endpoint: &EndpointConfig) -> Option<Conn> {
    match connect(endpoint).await {
        Ok(conn) => Some(conn),
        Err(MirrorError::Database { code, message }) => {
            error!("MySQL Error [{}]: {}", code, message);
            None
        }
        Err(e) => {
            error!(
                "Could not connect to {}: {}",
                endpoint.display_name(),
                e
            );
            None
        }
    }
}

/// `SHOW TABLES`.
pub async fn show_tables(conn: &mut Conn) -> Result<Vec<String>> {
    let tables: Vec<String> = conn.query("SHOW TABLES").await?;
    Ok(tables)
}

/// `DESCRIBE <table>`.
pub async fn describe_table(conn: &mut Conn, table: &str) -> Result<Vec<ColumnDescription>> {
    let rows: Vec<Row> = conn.query(MysqlDialect::new().describe(table)).await?;
    rows.into_iter().map(describe_row).collect()
}
