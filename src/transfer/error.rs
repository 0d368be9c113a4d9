use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::record::CANCELLED_MESSAGE;

/// Errors from a single copy attempt.
#[derive(Debug, Error)]
pub enum CopyError {
    /// The cancellation flag was raised between chunks. Never retried.
    #[error("Copy cancelled")]
    Cancelled,
    #[error("Failed to {operation} '{}'", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Terminal reasons for a failed transfer.
///
/// The display text is the message stored on the failed record.
#[derive(Debug, Error)]
pub enum TransferFailure {
    #[error("{}", CANCELLED_MESSAGE)]
    Cancelled,
    #[error("File copy failed after retries")]
    CopyFailed(#[source] CopyError),
    #[error("File verification failed")]
    VerificationFailed,
    #[error("Destination file already exists")]
    DestinationExists,
    #[error("Source file is already at its destination")]
    SameFile,
    #[error("Failed to create destination directory")]
    CreateDirectory(#[source] io::Error),
    #[error("Failed to move verified file into place")]
    Finalize(#[source] io::Error),
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn failure_messages() {
        assert_eq!(TransferFailure::Cancelled.to_string(), "Transfer cancelled");
        assert_eq!(
            TransferFailure::CopyFailed(CopyError::Cancelled).to_string(),
            "File copy failed after retries"
        );
        assert_eq!(TransferFailure::VerificationFailed.to_string(), "File verification failed");
        assert_eq!(
            TransferFailure::DestinationExists.to_string(),
            "Destination file already exists"
        );
        assert_eq!(
            TransferFailure::SameFile.to_string(),
            "Source file is already at its destination"
        );
    }

    #[test]
    fn io_error_names_path() {
        let error = CopyError::io("open", "/tmp/a.mkv", io::Error::other("boom"));
        assert_eq!(error.to_string(), "Failed to open '/tmp/a.mkv'");
        assert!(!error.is_cancelled());
        assert!(CopyError::Cancelled.is_cancelled());
    }
}
