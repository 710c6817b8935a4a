//! Schema compatibility checks run before any row is copied.
//!
//! A database passes when:
//!
//! - every required table (`titles` and its companion `employees`) is listed
//! - the `DESCRIBE titles` rows equal the expected column set, compared without
//!   regard to order on name, declared type, nullability, and key role
//!
//! Only read-only metadata queries are issued.

pub mod types;

pub use types::SchemaReport;

use tracing::{debug, warn};

use crate::core::{DatabaseHandle, SchemaDescriptor};

/// Checks a handle against an expected table layout.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    expected: SchemaDescriptor,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(SchemaDescriptor::titles())
    }
}

impl SchemaValidator {
    /// Create a validator for the given layout.
    pub fn new(expected: SchemaDescriptor) -> Self {
        Self { expected }
    }

    /// Expected layout.
    pub fn expected(&self) -> &SchemaDescriptor {
        &self.expected
    }

    /// Whether the handle exposes the expected layout.
    pub async fn validate<H: DatabaseHandle>(&self, handle: &mut H) -> bool {
        let report = self.validate_detailed(handle).await;
        if !report.is_compatible() {
            warn!("Schema check failed for {}", report.summary());
        }
        report.is_compatible()
    }

    /// Run every check and report which ones failed.
    pub async fn validate_detailed<H: DatabaseHandle>(
        &self,
        handle: &mut H,
    ) -> SchemaReport {
        let mut report = SchemaReport::new(handle.database());

        let tables = match handle.list_tables().await {
            Ok(tables) => tables,
            Err(e) => {
                report.query_error = Some(e.to_string());
                return report;
            }
        };

        report.missing_tables = self
            .expected
            .required_tables()
            .filter(|required| !tables.iter().any(|t| t == required))
            .map(str::to_string)
            .collect();
        if !report.missing_tables.is_empty() {
            return report;
        }

        let actual = match handle.describe_table(&self.expected.table).await {
            Ok(columns) => columns,
            Err(e) => {
                report.query_error = Some(e.to_string());
                return report;
            }
        };

        report.missing_columns = self
            .expected
            .columns
            .iter()
            .filter(|want| !actual.iter().any(|got| want.matches(got)))
            .cloned()
            .collect();
        report.unexpected_columns = actual
            .iter()
            .filter(|got| !self.expected.columns.iter().any(|want| want.matches(got)))
            .cloned()
            .collect();

        debug!(
            "Checked {} columns of {}.{}",
            actual.len(),
            report.database,
            self.expected.table
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnDescription, KeyRole};
    use crate::test_utils::{FakeCatalog, FakeSource};

    fn handle_with(catalog: FakeCatalog) -> FakeSource {
        let mut source = FakeSource::new(Vec::new());
        source.catalog = catalog;
        source
    }

    #[tokio::test]
    async fn test_accepts_employees_sample_layout() {
        let mut handle = handle_with(FakeCatalog::compatible());
        assert!(SchemaValidator::default().validate(&mut handle).await);
    }

    #[tokio::test]
    async fn test_accepts_columns_in_any_order() {
        let mut catalog = FakeCatalog::compatible();
        catalog.columns.reverse();
        let mut handle = handle_with(catalog);
        assert!(SchemaValidator::default().validate(&mut handle).await);
    }

    #[tokio::test]
    async fn test_accepts_mysql8_int_without_display_width() {
        let mut catalog = FakeCatalog::compatible();
        catalog.columns[0].column_type = "int".to_string();
        let mut handle = handle_with(catalog);
        assert!(SchemaValidator::default().validate(&mut handle).await);
    }

    #[tokio::test]
    async fn test_rejects_unrelated_table_list() {
        let catalog = FakeCatalog {
            tables: vec!["wrong".to_string(), "data".to_string()],
            ..FakeCatalog::compatible()
        };
        let mut handle = handle_with(catalog);
        let report = SchemaValidator::default()
            .validate_detailed(&mut handle)
            .await;
        assert!(!report.is_compatible());
        assert_eq!(report.missing_tables, vec!["titles", "employees"]);
    }

    // The legacy check `('titles',) and ('employees',) not in tables` only ever
    // looked for `employees`. Both tables are required here.
    #[tokio::test]
    async fn test_rejects_missing_titles_even_when_employees_present() {
        let catalog = FakeCatalog {
            tables: vec!["employees".to_string()],
            ..FakeCatalog::compatible()
        };
        let mut handle = handle_with(catalog);
        let report = SchemaValidator::default()
            .validate_detailed(&mut handle)
            .await;
        assert_eq!(report.missing_tables, vec!["titles"]);
    }

    #[tokio::test]
    async fn test_rejects_missing_employees_companion() {
        let catalog = FakeCatalog {
            tables: vec!["titles".to_string()],
            ..FakeCatalog::compatible()
        };
        let mut handle = handle_with(catalog);
        assert!(!SchemaValidator::default().validate(&mut handle).await);
    }

    // The legacy column check only tested the `to_date` tuple; a wrong type on
    // any of the key columns must fail as well.
    #[tokio::test]
    async fn test_rejects_wrong_type_on_key_column() {
        let mut catalog = FakeCatalog::compatible();
        catalog.columns[1].column_type = "varchar(100)".to_string();
        let mut handle = handle_with(catalog);
        let report = SchemaValidator::default()
            .validate_detailed(&mut handle)
            .await;
        assert_eq!(report.missing_columns.len(), 1);
        assert_eq!(report.missing_columns[0].name, "title");
        assert_eq!(report.unexpected_columns[0].column_type, "varchar(100)");
    }

    #[tokio::test]
    async fn test_rejects_nullability_change() {
        let mut catalog = FakeCatalog::compatible();
        catalog.columns[3].nullable = false;
        let mut handle = handle_with(catalog);
        assert!(!SchemaValidator::default().validate(&mut handle).await);
    }

    #[tokio::test]
    async fn test_rejects_renamed_column() {
        let mut catalog = FakeCatalog::compatible();
        catalog.columns[0].name = "employee_id".to_string();
        let mut handle = handle_with(catalog);
        assert!(!SchemaValidator::default().validate(&mut handle).await);
    }

    #[tokio::test]
    async fn test_rejects_extra_column() {
        let mut catalog = FakeCatalog::compatible();
        catalog.columns.push(ColumnDescription::new(
            "dept_no",
            "char(4)",
            false,
            KeyRole::None,
        ));
        let mut handle = handle_with(catalog);
        let report = SchemaValidator::default()
            .validate_detailed(&mut handle)
            .await;
        assert!(report.missing_columns.is_empty());
        assert_eq!(report.unexpected_columns.len(), 1);
        assert!(report.summary().contains("unexpected columns: dept_no char(4)"));
    }

    #[tokio::test]
    async fn test_describe_failure_is_reported_not_raised() {
        let catalog = FakeCatalog {
            fail_describe: true,
            ..FakeCatalog::compatible()
        };
        let mut handle = handle_with(catalog);
        let report = SchemaValidator::default()
            .validate_detailed(&mut handle)
            .await;
        assert!(!report.is_compatible());
        assert!(report.query_error.unwrap().contains("1146"));
    }
}
