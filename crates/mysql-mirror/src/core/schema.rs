//! Table and column metadata used for compatibility checks.

use serde::{Deserialize, Serialize};

/// Table that is copied.
pub const TITLES_TABLE: &str = "titles";

/// Companion table that must exist alongside `titles`.
pub const EMPLOYEES_TABLE: &str = "employees";

/// Column order used for both the source select and the target insert.
pub const TITLE_COLUMNS: [&str; 4] = ["emp_no", "title", "from_date", "to_date"];

/// Index role reported in the `Key` column of `DESCRIBE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyRole {
    /// Not part of any index (empty string).
    None,
    /// Part of the primary key (`PRI`).
    Primary,
    /// Part of a unique index (`UNI`).
    Unique,
    /// First column of a non-unique index (`MUL`).
    Multiple,
}

impl KeyRole {
    /// Parse the `Key` column of `DESCRIBE` output.
    pub fn from_describe(key: &str) -> Self {
        match key.trim().to_uppercase().as_str() {
            "PRI" => KeyRole::Primary,
            "UNI" => KeyRole::Unique,
            "MUL" => KeyRole::Multiple,
            _ => KeyRole::None,
        }
    }
}

/// One row of `DESCRIBE <table>` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    /// Column name (`Field`).
    pub name: String,
    /// Declared type, e.g. `varchar(50)` (`Type`).
    pub column_type: String,
    /// `Null` = `YES`.
    pub nullable: bool,
    /// Index role (`Key`).
    pub key: KeyRole,
    /// Default value, if any (`Default`).
    pub default: Option<String>,
    /// Extra attributes such as `auto_increment` (`Extra`).
    pub extra: String,
}

impl ColumnDescription {
    /// Build a column description with no default and no extra attributes.
    pub fn new(name: &str, column_type: &str, nullable: bool, key: KeyRole) -> Self {
        Self {
            name: name.to_string(),
            column_type: column_type.to_string(),
            nullable,
            key,
            default: None,
            extra: String::new(),
        }
    }

    /// Declared type in comparable form.
    ///
    /// MySQL 8.0.19+ stopped reporting integer display widths, so `int(11)`
    /// and `int` compare equal. Everything else is compared verbatim.
    pub fn normalized_type(&self) -> String {
        let lower = self.column_type.trim().to_lowercase();
        let (base, rest) = match lower.find('(') {
            Some(open) => (&lower[..open], &lower[open..]),
            None => (lower.as_str(), ""),
        };
        let is_integer = matches!(
            base,
            "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint"
        );
        if is_integer && !rest.is_empty() {
            let suffix = match rest.find(')') {
                Some(close) => rest[close + 1..].trim(),
                None => "",
            };
            if suffix.is_empty() {
                base.to_string()
            } else {
                format!("{} {}", base, suffix)
            }
        } else {
            lower
        }
    }

    /// Whether two descriptions agree on name, type, nullability, and key role.
    pub fn matches(&self, other: &ColumnDescription) -> bool {
        self.name == other.name
            && self.normalized_type() == other.normalized_type()
            && self.nullable == other.nullable
            && self.key == other.key
    }
}

/// Expected shape of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    /// Table that must exist and match `columns`.
    pub table: String,
    /// Other tables that must exist.
    pub companions: Vec<String>,
    /// Full expected column list, compared without regard to order.
    pub columns: Vec<ColumnDescription>,
}

impl SchemaDescriptor {
    /// Layout of `titles` in the MySQL employees sample database.
    pub fn titles() -> Self {
        Self {
            table: TITLES_TABLE.to_string(),
            companions: vec![EMPLOYEES_TABLE.to_string()],
            columns: vec![
                ColumnDescription::new("emp_no", "int(11)", false, KeyRole::Primary),
                ColumnDescription::new("title", "varchar(50)", false, KeyRole::Primary),
                ColumnDescription::new("from_date", "date", false, KeyRole::Primary),
                ColumnDescription::new("to_date", "date", true, KeyRole::None),
            ],
        }
    }

    /// Every table name that must be present.
    pub fn required_tables(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.table.as_str()).chain(self.companions.iter().map(String::as_str))
    }
}
