//! Row types moved between source and target.
//!
//! Records only live inside a [`Batch`]; nothing in the crate holds the
//! whole table at once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the `titles` table.
///
/// `(employee_id, title, from_date)` is the natural key in the source schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TitleRecord {
    /// `emp_no` column.
    pub employee_id: i32,
    /// `title` column.
    pub title: String,
    /// `from_date` column.
    pub from_date: NaiveDate,
    /// `to_date` column; NULL while the title is current.
    pub to_date: Option<NaiveDate>,
}

impl TitleRecord {
    /// Create a new record.
    pub fn new(
        employee_id: i32,
        title: impl Into<String>,
        from_date: NaiveDate,
        to_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            employee_id,
            title: title.into(),
            from_date,
            to_date,
        }
    }
}

/// A bounded group of rows produced by one fetch and consumed by one insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// 1-based position of this batch within the run.
    pub index: usize,
    /// Rows in read order.
    pub rows: Vec<TitleRecord>,
}

impl Batch {
    /// Create a batch from rows.
    pub fn new(index: usize, rows: Vec<TitleRecord>) -> Self {
        Self { index, rows }
    }

    /// Number of rows in the batch.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the batch holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
