//! Batched row movement between a source and a target handle.
//!
//! [`BatchReader`] wraps the forward-only cursor of one `SELECT` and cuts it
//! into batches of at most `limit` rows. Only the batch being built is held in
//! memory, so `limit` bounds peak memory: doubling it roughly doubles the
//! memory held per batch and halves the number of insert round trips.
//!
//! [`BatchWriter`] hands one batch to the target and turns the result into a
//! [`BatchOutcome`]. A rejected insert is logged with the server error code and
//! recorded; it never stops the copy loop.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::core::{Batch, RowCursor, SourceHandle, TargetHandle};
use crate::error::{MirrorError, Result};

/// Default number of rows per batch.
pub const DEFAULT_BATCH_SIZE: usize = 100_000;

/// Upper bound on the up-front allocation for a batch.
const MAX_PREALLOCATED_ROWS: usize = 8_192;

/// Pulls fixed-size batches from a source cursor.
pub struct BatchReader<'a> {
    cursor: Box<dyn RowCursor + 'a>,
    next_index: usize,
    rows_read: u64,
    exhausted: bool,
}

impl<'a> BatchReader<'a> {
    /// Issue the single select over `titles` and start streaming.
    pub async fn open<S: SourceHandle>(source: &'a mut S) -> Result<Self> {
        let database = source.database().to_string();
        let cursor = source.select_titles().await?;
        debug!("Opened streaming select on {}", database);
        Ok(Self::from_cursor(cursor))
    }

    /// Wrap an already-open cursor.
    pub fn from_cursor(cursor: Box<dyn RowCursor + 'a>) -> Self {
        Self {
            cursor,
            next_index: 1,
            rows_read: 0,
            exhausted: false,
        }
    }

    /// Next batch of up to `limit` rows, empty once the source is exhausted.
    ///
    /// Once an empty batch has been returned every later call returns an
    /// empty batch without touching the cursor.
    pub async fn next(&mut self, limit: usize) -> Result<Batch> {
        if limit == 0 {
            return Err(MirrorError::Config(
                "batch limit must be at least 1".into(),
            ));
        }
        if self.exhausted {
            return Ok(Batch::new(self.next_index, Vec::new()));
        }

        let mut rows = Vec::with_capacity(limit.min(MAX_PREALLOCATED_ROWS));
        while rows.len() < limit {
            match self.cursor.next_row().await? {
                Some(row) => rows.push(row),
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }

        if rows.is_empty() {
            return Ok(Batch::new(self.next_index, rows));
        }

        let batch = Batch::new(self.next_index, rows);
        self.next_index += 1;
        self.rows_read += batch.len() as u64;
        Ok(batch)
    }

    /// Rows handed out so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Whether the cursor has reported the end of the result set.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// A batch the target rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// 1-based batch index.
    pub index: usize,
    /// Rows in the batch; none kept when the run is transactional.
    pub rows: usize,
    /// Server error code, when the server reported one.
    pub code: Option<u16>,
    /// Error message.
    pub message: String,
}

/// Result of inserting one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every row of the batch was inserted.
    Written { index: usize, rows: u64 },
    /// The insert was rejected.
    Failed(BatchFailure),
}

/// Inserts batches into the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchWriter;

impl BatchWriter {
    /// Create a writer.
    pub fn new() -> Self {
        Self
    }

    /// Insert every row of `batch`, in order.
    ///
    /// Errors are logged with the server-reported code and message and
    /// returned as [`BatchOutcome::Failed`].
    pub async fn insert<T: TargetHandle>(&self, batch: &Batch, target: &mut T) -> BatchOutcome {
        if batch.is_empty() {
            return BatchOutcome::Written {
                index: batch.index,
                rows: 0,
            };
        }

        match target.insert_titles(&batch.rows).await {
            Ok(rows) => {
                debug!(
                    "Batch {}: inserted {} rows into {}",
                    batch.index,
                    rows,
                    target.database()
                );
                BatchOutcome::Written {
                    index: batch.index,
                    rows,
                }
            }
            Err(e) => {
                let code = e.code();
                let message = match &e {
                    MirrorError::Database { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                error!(
                    "MySQL Titles Insert Error [{}]: {} (batch {}, {} rows skipped)",
                    code.map_or_else(|| "-".to_string(), |c| c.to_string()),
                    message,
                    batch.index,
                    batch.len()
                );
                BatchOutcome::Failed(BatchFailure {
                    index: batch.index,
                    rows: batch.len(),
                    code,
                    message,
                })
            }
        }
    }
}
