//! Verified transfer engine.
//!
//! Copies each record's source into a `.partial` file next to its destination,
//! retries transient failures with exponential backoff,
//! and verifies the copy by size and SHA-1.
//! Only a verified copy is renamed over the destination,
//! so an existing library file is never lost to a failed transfer.
//! Batches run strictly sequentially.

pub mod copy;
pub mod error;
pub mod progress;
pub mod verify;

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use copy::{CopyOutcome, Copier, DEFAULT_CHUNK_SIZE, StreamCopier};
pub use error::{CopyError, TransferFailure};
pub use progress::{CANCEL_POLL_INTERVAL, CancelFlag, NoProgress, ProgressSink};

use crate::record::{MediaFileRecord, StatusEvent, TransferStatus};

/// Default number of copy attempts per file.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(1000);

/// Suffix of the temporary file a copy is written to before verification.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Waits for a retry delay. Returns `false` if cancelled while waiting.
type Sleeper = fn(&CancelFlag, Duration) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Read and hash buffer size in bytes.
    pub chunk_size: usize,
    /// Total number of copy attempts, including the first one.
    pub max_retries: u32,
    /// Delay before the first retry. Doubles after every failed attempt.
    pub initial_backoff: Duration,
    /// Replace an existing destination file.
    pub overwrite: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            overwrite: true,
        }
    }
}

/// Result of a batch transfer.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// All input records in their original order with updated statuses.
    pub records: Vec<MediaFileRecord>,
    pub succeeded: usize,
    /// True if the batch was stopped before every record was processed.
    pub cancelled: bool,
}

impl BatchSummary {
    #[must_use]
    pub fn count(&self, status: TransferStatus) -> usize {
        self.records.iter().filter(|record| record.status() == status).count()
    }

    /// Total size of all completed transfers.
    #[must_use]
    pub fn completed_bytes(&self) -> u64 {
        self.records
            .iter()
            .filter(|record| record.status() == TransferStatus::Completed)
            .filter_map(|record| fs::metadata(record.destination_path()).ok())
            .map(|metadata| metadata.len())
            .sum()
    }
}

#[derive(Debug)]
pub struct TransferEngine<C: Copier = StreamCopier> {
    copier: C,
    options: TransferOptions,
    cancel: CancelFlag,
    sleep: Sleeper,
}

impl TransferEngine<StreamCopier> {
    #[must_use]
    pub fn new(options: TransferOptions) -> Self {
        Self::with_copier(StreamCopier::new(options.chunk_size), options)
    }
}

impl<C: Copier> TransferEngine<C> {
    #[must_use]
    pub fn with_copier(copier: C, options: TransferOptions) -> Self {
        Self {
            copier,
            options,
            cancel: CancelFlag::new(),
            sleep: CancelFlag::sleep,
        }
    }

    #[cfg(test)]
    fn with_sleep(mut self, sleep: Sleeper) -> Self {
        self.sleep = sleep;
        self
    }

    /// Use an externally owned cancellation flag, for example one raised from a Ctrl+C handler.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    #[must_use]
    pub const fn options(&self) -> &TransferOptions {
        &self.options
    }

    /// Transfer a single record and return it with its final status.
    ///
    /// Unparsed records and records that are not pending are returned unchanged.
    pub fn transfer(&self, record: &MediaFileRecord, progress: &dyn ProgressSink) -> MediaFileRecord {
        if record.status() == TransferStatus::Unparsed {
            return record.clone();
        }
        let Ok(processing) = record.apply(StatusEvent::Start) else {
            return record.clone();
        };

        let event = match self.run(&processing, progress) {
            Ok(()) => StatusEvent::Complete,
            Err(failure) => StatusEvent::Fail(failure.to_string()),
        };
        processing.apply(event).unwrap_or(processing)
    }

    /// Transfer records one at a time.
    ///
    /// Failures do not stop the batch. Cancellation does:
    /// records after the cancelled one are returned untouched.
    pub fn transfer_all(&self, records: Vec<MediaFileRecord>, progress: &dyn ProgressSink) -> BatchSummary {
        let total = records.len();
        let mut results = Vec::with_capacity(total);
        let mut succeeded = 0;
        let mut cancelled = false;

        for (index, record) in records.into_iter().enumerate() {
            if cancelled || self.cancel.is_cancelled() {
                cancelled = true;
                results.push(record);
                continue;
            }

            progress.batch_progress(index + 1, total);
            progress.record_started(&record);
            let result = self.transfer(&record, progress);
            progress.record_finished(&result);

            if result.status() == TransferStatus::Completed {
                succeeded += 1;
            }
            cancelled = result.was_cancelled();
            results.push(result);
        }

        BatchSummary {
            records: results,
            succeeded,
            cancelled,
        }
    }

    fn run(&self, record: &MediaFileRecord, progress: &dyn ProgressSink) -> Result<(), TransferFailure> {
        let source = record.source_path();
        let destination = record.destination_path();

        if is_same_file(source, destination) {
            return Err(TransferFailure::SameFile);
        }
        if !self.options.overwrite && destination.exists() {
            return Err(TransferFailure::DestinationExists);
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(TransferFailure::CreateDirectory)?;
        }

        let partial = partial_path(destination);
        let result = self
            .copy_and_verify(source, &partial, record.file_name(), progress)
            .and_then(|()| fs::rename(&partial, destination).map_err(TransferFailure::Finalize));
        if result.is_err() {
            let _ = fs::remove_file(&partial);
        }
        result
    }

    fn copy_and_verify(
        &self,
        source: &Path,
        partial: &Path,
        file_name: &str,
        progress: &dyn ProgressSink,
    ) -> Result<(), TransferFailure> {
        let outcome = self.copy_with_retry(source, partial, file_name, progress)?;
        match verify::verify_copy(source, partial, outcome.source_digest.as_deref(), self.options.chunk_size) {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransferFailure::VerificationFailed),
            Err(error) => {
                progress.verification_error(file_name, &error);
                Err(TransferFailure::VerificationFailed)
            }
        }
    }

    fn copy_with_retry(
        &self,
        source: &Path,
        destination: &Path,
        file_name: &str,
        progress: &dyn ProgressSink,
    ) -> Result<CopyOutcome, TransferFailure> {
        let max_attempts = self.options.max_retries.max(1);
        let mut backoff = self.options.initial_backoff;
        let mut attempt = 1;
        let mut on_progress = |percent: u8| progress.file_progress(file_name, percent);

        loop {
            match self.copier.copy(source, destination, &mut on_progress, &self.cancel) {
                Ok(outcome) => return Ok(outcome),
                Err(CopyError::Cancelled) => return Err(TransferFailure::Cancelled),
                Err(error) if attempt >= max_attempts => return Err(TransferFailure::CopyFailed(error)),
                Err(_) => {
                    if !(self.sleep)(&self.cancel, backoff) {
                        return Err(TransferFailure::Cancelled);
                    }
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
            }
        }
    }
}

/// Temporary sibling of `destination` that receives the copy.
#[must_use]
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.file_name().map(OsStr::to_os_string).unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    destination.with_file_name(name)
}

/// True if both paths exist and point to the same file.
fn is_same_file(source: &Path, destination: &Path) -> bool {
    match (dunce::canonicalize(source), dunce::canonicalize(destination)) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}
