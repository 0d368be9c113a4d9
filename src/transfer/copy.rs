use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use sha1::{Digest, Sha1};

use crate::transfer::error::CopyError;
use crate::transfer::progress::{CancelFlag, PercentTracker};

/// Default copy buffer size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 81920;

/// Result of a successful copy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    pub bytes: u64,
    /// SHA-1 of the source content if it was computed while copying.
    pub source_digest: Option<Vec<u8>>,
}

/// A single copy attempt from source to destination.
pub trait Copier {
    /// Copy `source` to `destination`, truncating any existing file.
    ///
    /// `on_progress` receives integer percentages.
    /// Implementations should check `cancel` between chunks and return [`CopyError::Cancelled`] once it is set.
    fn copy(
        &self,
        source: &Path,
        destination: &Path,
        on_progress: &mut dyn FnMut(u8),
        cancel: &CancelFlag,
    ) -> Result<CopyOutcome, CopyError>;
}

/// Chunked copier that hashes the source while streaming it.
#[derive(Debug, Clone, Copy)]
pub struct StreamCopier {
    chunk_size: usize,
}

impl StreamCopier {
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }
}

impl Default for StreamCopier {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Copier for StreamCopier {
    fn copy(
        &self,
        source: &Path,
        destination: &Path,
        on_progress: &mut dyn FnMut(u8),
        cancel: &CancelFlag,
    ) -> Result<CopyOutcome, CopyError> {
        let mut reader = File::open(source).map_err(|error| CopyError::io("open", source, error))?;
        let total = reader
            .metadata()
            .map_err(|error| CopyError::io("read metadata of", source, error))?
            .len();
        let mut writer = File::create(destination).map_err(|error| CopyError::io("create", destination, error))?;

        let mut buffer = vec![0_u8; self.chunk_size];
        let mut hasher = Sha1::new();
        let mut tracker = PercentTracker::new(total);
        let mut copied: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(CopyError::Cancelled);
            }
            let read = reader
                .read(&mut buffer)
                .map_err(|error| CopyError::io("read", source, error))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
            writer
                .write_all(&buffer[..read])
                .map_err(|error| CopyError::io("write", destination, error))?;
            copied += read as u64;
            if let Some(percent) = tracker.update(copied) {
                on_progress(percent);
            }
        }

        writer
            .sync_all()
            .map_err(|error| CopyError::io("flush", destination, error))?;

        if copied == 0
            && let Some(percent) = tracker.update(0)
        {
            on_progress(percent);
        }

        Ok(CopyOutcome {
            bytes: copied,
            source_digest: Some(hasher.finalize().to_vec()),
        })
    }
}
