//! MySQL SQL text for the `titles` copy.

use crate::core::{TITLES_TABLE, TITLE_COLUMNS};

/// MySQL max placeholders per prepared statement.
pub const MYSQL_MAX_PLACEHOLDERS: usize = 65_535;

/// Rows that fit in one multi-row `INSERT` without exceeding the placeholder cap.
pub const MAX_ROWS_PER_INSERT: usize = MYSQL_MAX_PLACEHOLDERS / TITLE_COLUMNS.len();

/// Savepoint wrapped around each batch while autocommit is off.
pub const BATCH_SAVEPOINT: &str = "mirror_batch";

/// MySQL/MariaDB SQL builder.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }

    /// Quote a MySQL identifier, doubling embedded backticks.
    pub fn quote_ident(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn column_list(&self) -> String {
        TITLE_COLUMNS
            .iter()
            .map(|c| self.quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `DESCRIBE <table>`.
    pub fn describe(&self, table: &str) -> String {
        format!("DESCRIBE {}", self.quote_ident(table))
    }

    /// Single unrestricted select over `titles`. No `ORDER BY`.
    pub fn select_titles(&self) -> String {
        format!(
            "SELECT {} FROM {}",
            self.column_list(),
            self.quote_ident(TITLES_TABLE)
        )
    }

    /// Multi-row insert into `titles` with one placeholder group per row.
    pub fn insert_titles(&self, rows: usize) -> String {
        let placeholders_per_row = format!("({})", vec!["?"; TITLE_COLUMNS.len()].join(", "));
        let all_placeholders: Vec<String> =
            std::iter::repeat_n(placeholders_per_row, rows).collect();

        format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.quote_ident(TITLES_TABLE),
            self.column_list(),
            all_placeholders.join(", ")
        )
    }

    pub fn disable_autocommit(&self) -> &'static str {
        "SET autocommit=0"
    }

    pub fn savepoint(&self) -> String {
        format!("SAVEPOINT {}", BATCH_SAVEPOINT)
    }

    pub fn rollback_to_savepoint(&self) -> String {
        format!("ROLLBACK TO SAVEPOINT {}", BATCH_SAVEPOINT)
    }

    pub fn release_savepoint(&self) -> String {
        format!("RELEASE SAVEPOINT {}", BATCH_SAVEPOINT)
    }
}
