//! Database driver implementations.
//!
//! - [`mysql`]: MySQL/MariaDB source and target handles
//!
//! Each driver implements the handle traits from [`crate::core::traits`].

pub mod mysql;

pub use mysql::{MysqlReader, MysqlWriter};
