//! MySQL/MariaDB database driver.
//!
//! This module provides MySQL-specific implementations for:
//! - [`MysqlDialect`]: SQL text for the `titles` copy
//! - [`MysqlReader`]: Source handle with a streaming select
//! - [`MysqlWriter`]: Target handle with batched inserts
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

mod codec;
mod connection;
mod dialect;
mod reader;
mod writer;

pub use connection::connect;
pub use dialect::{MysqlDialect, MAX_ROWS_PER_INSERT};
pub use reader::MysqlReader;
pub use writer::MysqlWriter;
