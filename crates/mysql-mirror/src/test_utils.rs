//! In-memory handles shared by the unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::{
    ColumnDescription, DatabaseHandle, RowCursor, SchemaDescriptor, SourceHandle, TargetHandle,
    TitleRecord,
};
use crate::error::{MirrorError, Result};

/// `n` distinct title rows.
pub(crate) fn titles(n: usize) -> Vec<TitleRecord> {
    let base = NaiveDate::from_ymd_opt(1985, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let from = base + chrono::Duration::days((i % 5000) as i64);
            let to = if i % 3 == 0 {
                None
            } else {
                Some(from + chrono::Duration::days(365))
            };
            TitleRecord::new(10001 + i as i32, "Engineer", from, to)
        })
        .collect()
}

fn server_error(code: u16, message: &str) -> MirrorError {
    MirrorError::Database {
        code,
        message: message.to_string(),
    }
}

/// Metadata answered by a fake handle.
#[derive(Debug, Clone)]
pub(crate) struct FakeCatalog {
    pub tables: Vec<String>,
    pub columns: Vec<ColumnDescription>,
    pub fail_describe: bool,
}

impl FakeCatalog {
    /// Catalog of the employees sample database.
    pub fn compatible() -> Self {
        Self {
            tables: ["departments", "dept_emp", "employees", "salaries", "titles"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            columns: SchemaDescriptor::titles().columns,
            fail_describe: false,
        }
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.clone())
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnDescription>> {
        if self.fail_describe || !self.tables.iter().any(|t| t == table) {
            return Err(server_error(
                1146,
                &format!("Table 'fake.{}' doesn't exist", table),
            ));
        }
        Ok(self.columns.clone())
    }
}

/// What happened to a fake source.
#[derive(Debug, Default)]
pub(crate) struct SourceLog {
    pub selects: usize,
    pub rows_fetched: usize,
    pub closed: bool,
}

/// Source handle serving rows from memory.
pub(crate) struct FakeSource {
    pub name: String,
    pub catalog: FakeCatalog,
    pub rows: Vec<TitleRecord>,
    /// Fail the read after this many rows have been served.
    pub fail_after: Option<usize>,
    pub log: Arc<Mutex<SourceLog>>,
}

impl FakeSource {
    pub fn new(rows: Vec<TitleRecord>) -> Self {
        Self {
            name: "employees".to_string(),
            catalog: FakeCatalog::compatible(),
            rows,
            fail_after: None,
            log: Arc::new(Mutex::new(SourceLog::default())),
        }
    }
}

struct FakeCursor<'a> {
    rows: std::slice::Iter<'a, TitleRecord>,
    served: usize,
    fail_after: Option<usize>,
    log: Arc<Mutex<SourceLog>>,
}

#[async_trait]
impl RowCursor for FakeCursor<'_> {
    async fn next_row(&mut self) -> Result<Option<TitleRecord>> {
        if self.fail_after == Some(self.served) {
            return Err(server_error(
                2013,
                "Lost connection to MySQL server during query",
            ));
        }
        let row = self.rows.next().cloned();
        if row.is_some() {
            self.served += 1;
            self.log.lock().unwrap().rows_fetched += 1;
        }
        Ok(row)
    }
}

#[async_trait]
impl DatabaseHandle for FakeSource {
    fn database(&self) -> &str {
        &self.name
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        self.catalog.list_tables().await
    }

    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnDescription>> {
        self.catalog.describe_table(table).await
    }

    async fn close(self) {
        self.log.lock().unwrap().closed = true;
    }
}

#[async_trait]
impl SourceHandle for FakeSource {
    async fn select_titles<'a>(&'a mut self) -> Result<Box<dyn RowCursor + 'a>> {
        self.log.lock().unwrap().selects += 1;
        Ok(Box::new(FakeCursor {
            rows: self.rows.iter(),
            served: 0,
            fail_after: self.fail_after,
            log: Arc::clone(&self.log),
        }))
    }
}

/// What happened to a fake target.
#[derive(Debug, Default)]
pub(crate) struct TargetLog {
    /// Size of every insert call, in call order (failed calls included).
    pub insert_calls: Vec<usize>,
    /// Rows kept by successful inserts.
    pub rows: Vec<TitleRecord>,
    pub autocommit_disabled: bool,
    pub commits: usize,
    pub closed: bool,
}

/// Target handle recording inserts in memory.
pub(crate) struct FakeTarget {
    pub name: String,
    pub catalog: FakeCatalog,
    /// 1-based insert calls that fail with a duplicate-key error.
    pub fail_inserts: HashSet<usize>,
    pub reject_autocommit: bool,
    pub fail_commit: bool,
    pub log: Arc<Mutex<TargetLog>>,
}

impl FakeTarget {
    pub fn new() -> Self {
        Self {
            name: "employees_copy".to_string(),
            catalog: FakeCatalog::compatible(),
            fail_inserts: HashSet::new(),
            reject_autocommit: false,
            fail_commit: false,
            log: Arc::new(Mutex::new(TargetLog::default())),
        }
    }
}

#[async_trait]
impl DatabaseHandle for FakeTarget {
    fn database(&self) -> &str {
        &self.name
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        self.catalog.list_tables().await
    }

    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnDescription>> {
        self.catalog.describe_table(table).await
    }

    async fn close(self) {
        self.log.lock().unwrap().closed = true;
    }
}

#[async_trait]
impl TargetHandle for FakeTarget {
    async fn disable_autocommit(&mut self) -> Result<()> {
        if self.reject_autocommit {
            return Err(server_error(
                1227,
                "Access denied; you need (at least one of) the SUPER privilege(s)",
            ));
        }
        self.log.lock().unwrap().autocommit_disabled = true;
        Ok(())
    }

    async fn insert_titles(&mut self, rows: &[TitleRecord]) -> Result<u64> {
        let mut log = self.log.lock().unwrap();
        log.insert_calls.push(rows.len());
        if self.fail_inserts.contains(&log.insert_calls.len()) {
            return Err(server_error(
                1062,
                "Duplicate entry '10001-Engineer-1985-01-01' for key 'PRIMARY'",
            ));
        }
        log.rows.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn commit(&mut self) -> Result<()> {
        if self.fail_commit {
            return Err(server_error(
                2013,
                "Lost connection to MySQL server during query",
            ));
        }
        self.log.lock().unwrap().commits += 1;
        Ok(())
    }
}
