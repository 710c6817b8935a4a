//! Result types for schema verification.

use serde::{Deserialize, Serialize};

use crate::core::ColumnDescription;

/// Outcome of checking one database against a [`SchemaDescriptor`].
///
/// [`SchemaDescriptor`]: crate::core::SchemaDescriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaReport {
    /// Database that was inspected.
    pub database: String,
    /// Required tables absent from the table list.
    pub missing_tables: Vec<String>,
    /// Expected columns with no matching `DESCRIBE` row.
    pub missing_columns: Vec<ColumnDescription>,
    /// `DESCRIBE` rows matching no expected column.
    pub unexpected_columns: Vec<ColumnDescription>,
    /// Metadata query failure, if one happened.
    pub query_error: Option<String>,
}

impl SchemaReport {
    /// Create an empty report for a database.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Default::default()
        }
    }

    /// Whether every check passed.
    pub fn is_compatible(&self) -> bool {
        self.missing_tables.is_empty()
            && self.missing_columns.is_empty()
            && self.unexpected_columns.is_empty()
            && self.query_error.is_none()
    }

    /// One-line summary of what failed.
    pub fn summary(&self) -> String {
        if self.is_compatible() {
            return format!("{}: compatible", self.database);
        }

        let mut parts = Vec::new();
        if let Some(err) = &self.query_error {
            parts.push(format!("metadata query failed ({})", err));
        }
        if !self.missing_tables.is_empty() {
            parts.push(format!("missing tables: {}", self.missing_tables.join(", ")));
        }
        if !self.missing_columns.is_empty() {
            let cols: Vec<String> = self
                .missing_columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.column_type))
                .collect();
            parts.push(format!("missing columns: {}", cols.join(", ")));
        }
        if !self.unexpected_columns.is_empty() {
            let cols: Vec<String> = self
                .unexpected_columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.column_type))
                .collect();
            parts.push(format!("unexpected columns: {}", cols.join(", ")));
        }
        format!("{}: {}", self.database, parts.join("; "))
    }
}
