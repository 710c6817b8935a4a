//! Copy orchestrator - drives one run end to end.
//!
//! Every step is a gate:
//!
//! 1. both handles must be present (fatal otherwise)
//! 2. both handles must pass the schema check (fatal otherwise)
//! 3. autocommit is turned off on the target, best effort
//! 4. batches are read and inserted until the source is exhausted
//! 5. the target is committed exactly once
//!
//! Handles are owned by the run and closed on every exit path.

mod report;

pub use report::{CopyReport, TransactionMode};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::MirrorConfig;
use crate::core::{SourceHandle, TargetHandle};
use crate::error::{MirrorError, Result};
use crate::transfer::{BatchOutcome, BatchReader, BatchWriter, DEFAULT_BATCH_SIZE};
use crate::verify::SchemaValidator;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Validating,
    Copying,
    Committing,
    Done,
    /// Terminal state after a fatal error.
    Aborted,
}

/// Copy orchestrator.
#[derive(Debug)]
pub struct CopyOrchestrator {
    batch_limit: usize,
    source_name: String,
    target_name: String,
    validator: SchemaValidator,
    writer: BatchWriter,
    phase: Phase,
}

impl Default for CopyOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl CopyOrchestrator {
    /// Create an orchestrator that moves `batch_limit` rows per batch.
    pub fn new(batch_limit: usize) -> Self {
        Self {
            batch_limit,
            source_name: "source".to_string(),
            target_name: "target".to_string(),
            validator: SchemaValidator::default(),
            writer: BatchWriter::new(),
            phase: Phase::Connecting,
        }
    }

    /// Create an orchestrator from a validated configuration.
    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(config.batch_size).with_names(&config.source.database, &config.target.database)
    }

    /// Database names used in messages when a handle is missing.
    pub fn with_names(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_name = source.into();
        self.target_name = target.into();
        self
    }

    /// Replace the schema validator.
    pub fn with_validator(mut self, validator: SchemaValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        match phase {
            Phase::Connecting => info!("Phase 1: Checking connections"),
            Phase::Validating => info!("Phase 2: Validating schemas"),
            Phase::Copying => info!("Phase 3: Copying titles ({} rows per batch)", self.batch_limit),
            Phase::Committing => info!("Phase 4: Committing"),
            Phase::Done => {}
            Phase::Aborted => error!("Copy aborted during {:?}", self.phase),
        }
        self.phase = phase;
    }

    /// Run the copy.
    ///
    /// A `None` handle means the connection could not be opened. Fatal errors
    /// (missing handle, incompatible schema, source read failure, commit
    /// failure) are returned as `Err`; rejected batches are recorded in the
    /// report and the run continues.
    pub async fn run<S, T>(&mut self, source: Option<S>, target: Option<T>) -> Result<CopyReport>
    where
        S: SourceHandle,
        T: TargetHandle,
    {
        self.enter(Phase::Connecting);

        let (mut source, mut target) = match (source, target) {
            (Some(source), Some(target)) => (source, target),
            (source, target) => {
                let failed = if source.is_none() {
                    self.source_name.clone()
                } else {
                    self.target_name.clone()
                };
                if let Some(source) = source {
                    source.close().await;
                }
                if let Some(target) = target {
                    target.close().await;
                }
                self.enter(Phase::Aborted);
                return Err(MirrorError::Connection(failed));
            }
        };

        let outcome = self.copy(&mut source, &mut target).await;

        source.close().await;
        target.close().await;

        if outcome.is_err() {
            self.enter(Phase::Aborted);
        }
        outcome
    }

    async fn copy<S, T>(&mut self, source: &mut S, target: &mut T) -> Result<CopyReport>
    where
        S: SourceHandle,
        T: TargetHandle,
    {
        if self.batch_limit == 0 {
            return Err(MirrorError::Config(
                "batch limit must be at least 1".into(),
            ));
        }

        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        info!(
            "Starting copy run {}: {} -> {}",
            run_id,
            source.database(),
            target.database()
        );

        self.enter(Phase::Validating);
        if !self.validator.validate(source).await {
            return Err(MirrorError::IncompatibleSchema(source.database().to_string()));
        }
        if !self.validator.validate(target).await {
            return Err(MirrorError::IncompatibleSchema(target.database().to_string()));
        }

        let transaction_mode = match target.disable_autocommit().await {
            Ok(()) => TransactionMode::Enabled,
            Err(e) => {
                let code = e.code();
                let message = match e {
                    MirrorError::Database { message, .. } => message,
                    other => other.to_string(),
                };
                error!(
                    "MySQL set autocommit Error [{}]: {}",
                    code.map_or_else(|| "-".to_string(), |c| c.to_string()),
                    message
                );
                warn!("Continuing with per-statement commits on {}", target.database());
                TransactionMode::UnsupportedFallback { code, message }
            }
        };

        self.enter(Phase::Copying);
        let mut report = CopyReport::new(run_id, started_at, transaction_mode);
        let source_name = source.database().to_string();
        {
            let mut reader = BatchReader::open(source)
                .await
                .map_err(|e| MirrorError::read(&source_name, e))?;

            loop {
                let batch = reader
                    .next(self.batch_limit)
                    .await
                    .map_err(|e| MirrorError::read(&source_name, e))?;
                if batch.is_empty() {
                    break;
                }

                match self.writer.insert(&batch, target).await {
                    BatchOutcome::Written { rows, .. } => report.record_written(batch.len(), rows),
                    BatchOutcome::Failed(failure) => report.record_failure(failure),
                }
            }
        }

        self.enter(Phase::Committing);
        target
            .commit()
            .await
            .map_err(|e| MirrorError::commit(target.database(), e))?;

        report.finish(Utc::now());
        self.enter(Phase::Done);

        if report.is_complete() {
            info!(
                "Copy completed: {} rows in {} batches, {:.1}s ({} rows/s)",
                report.rows_written,
                report.batches_attempted,
                report.duration_seconds,
                report.rows_per_second
            );
        } else {
            warn!(
                "Copy completed with {} failed batches {:?}: {} of {} rows written",
                report.failed_batches.len(),
                report.failed_batch_indices(),
                report.rows_written,
                report.rows_read
            );
        }

        Ok(report)
    }
}
