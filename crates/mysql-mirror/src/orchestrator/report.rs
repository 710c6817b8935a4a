//! Result of a copy run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transfer::BatchFailure;

/// Whether the copy ran inside a single target transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TransactionMode {
    /// Autocommit was disabled; all batches commit together at the end.
    Enabled,
    /// The target refused to disable autocommit; every insert committed on
    /// its own.
    UnsupportedFallback {
        code: Option<u16>,
        message: String,
    },
}

impl TransactionMode {
    /// Whether the copy is one transaction.
    pub fn is_transactional(&self) -> bool {
        matches!(self, TransactionMode::Enabled)
    }
}

/// Result of a copy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyReport {
    /// Unique run identifier.
    pub run_id: String,

    /// When the copy started.
    pub started_at: DateTime<Utc>,

    /// When the copy completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Transaction guarantee the run had.
    pub transaction_mode: TransactionMode,

    /// Non-empty batches handed to the writer.
    pub batches_attempted: usize,

    /// Rows pulled from the source.
    pub rows_read: u64,

    /// Rows the target accepted.
    pub rows_written: u64,

    /// Average throughput (rows/second).
    pub rows_per_second: i64,

    /// Batches the target rejected, in batch order.
    pub failed_batches: Vec<BatchFailure>,
}

impl CopyReport {
    /// Start a report for a run.
    pub fn new(
        run_id: impl Into<String>,
        started_at: DateTime<Utc>,
        transaction_mode: TransactionMode,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            started_at,
            completed_at: started_at,
            duration_seconds: 0.0,
            transaction_mode,
            batches_attempted: 0,
            rows_read: 0,
            rows_written: 0,
            rows_per_second: 0,
            failed_batches: Vec::new(),
        }
    }

    /// Record a batch the target accepted.
    pub fn record_written(&mut self, rows_read: usize, rows_written: u64) {
        self.batches_attempted += 1;
        self.rows_read += rows_read as u64;
        self.rows_written += rows_written;
    }

    /// Record a batch the target rejected.
    pub fn record_failure(&mut self, failure: BatchFailure) {
        self.batches_attempted += 1;
        self.rows_read += failure.rows as u64;
        self.failed_batches.push(failure);
    }

    /// Stamp completion time and throughput.
    pub fn finish(&mut self, completed_at: DateTime<Utc>) {
        self.completed_at = completed_at;
        self.duration_seconds =
            (completed_at - self.started_at).num_milliseconds().max(0) as f64 / 1000.0;
        self.rows_per_second = if self.duration_seconds > 0.0 {
            (self.rows_written as f64 / self.duration_seconds) as i64
        } else {
            0
        };
    }

    /// Whether every row read was written.
    pub fn is_complete(&self) -> bool {
        self.failed_batches.is_empty()
    }

    /// Indices of rejected batches.
    pub fn failed_batch_indices(&self) -> Vec<usize> {
        self.failed_batches.iter().map(|f| f.index).collect()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
