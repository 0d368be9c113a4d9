//! Media file records and their transfer lifecycle.
//!
//! A record is created once per discovered source file. Title, year and
//! destination are computed at construction and never change afterwards.
//! Status changes go through [`MediaFileRecord::apply`], which returns a new
//! record instead of mutating the existing one.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::resolve::{Destination, MediaInfo, Resolution, Resolver};

/// Message attached to records whose copy was stopped by the operator.
pub const CANCELLED_MESSAGE: &str = "Transfer cancelled";

/// Transfer lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Resolution fell back to the Unknown bucket. Terminal.
    Unparsed,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Unparsed => "Unparsed",
        };
        write!(f, "{name}")
    }
}

/// Input to the status transition function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Pending to Processing.
    Start,
    /// Processing to Completed.
    Complete,
    /// Processing to Failed with a human-readable message.
    Fail(String),
}

impl StatusEvent {
    const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Fail(_) => "fail",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot {event} a record with status {status}")]
pub struct TransitionError {
    pub status: TransferStatus,
    pub event: &'static str,
}

/// One source file with its resolved metadata and transfer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFileRecord {
    source_path: PathBuf,
    file_name: String,
    info: MediaInfo,
    destination: Destination,
    status: TransferStatus,
    error_message: Option<String>,
}

impl MediaFileRecord {
    /// Resolve the given source file into a new record.
    #[must_use]
    pub fn new(source_path: PathBuf, resolver: &Resolver) -> Self {
        let file_name = crate::get_normalized_file_name(&source_path);
        let resolution = resolver.resolve(&file_name);
        Self::from_resolution(source_path, file_name, resolution)
    }

    /// Build a record from an already computed resolution.
    ///
    /// Records whose title could not be resolved start out as [`TransferStatus::Unparsed`].
    #[must_use]
    pub fn from_resolution(source_path: PathBuf, file_name: String, resolution: Resolution) -> Self {
        let status = if resolution.info.is_unknown() || resolution.destination.is_unknown() {
            TransferStatus::Unparsed
        } else {
            TransferStatus::Pending
        };
        Self {
            source_path,
            file_name,
            info: resolution.info,
            destination: resolution.destination,
            status,
            error_message: None,
        }
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub const fn info(&self) -> &MediaInfo {
        &self.info
    }

    /// Display title: the movie title or the show name.
    #[must_use]
    pub fn title(&self) -> &str {
        match &self.info {
            MediaInfo::Movie(movie) => &movie.title,
            MediaInfo::Episode(episode) => &episode.show,
        }
    }

    /// Release year, only for movies.
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        match &self.info {
            MediaInfo::Movie(movie) => movie.year.as_deref(),
            MediaInfo::Episode(_) => None,
        }
    }

    #[must_use]
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }

    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination.path
    }

    #[must_use]
    pub const fn status(&self) -> TransferStatus {
        self.status
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// True if this record failed because the operator cancelled the transfer.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.status == TransferStatus::Failed && self.error_message.as_deref() == Some(CANCELLED_MESSAGE)
    }

    /// Return a copy of this record with the given event applied.
    ///
    /// Allowed transitions are Pending to Processing and Processing to Completed or Failed.
    /// Starting clears any previous error message.
    pub fn apply(&self, event: StatusEvent) -> Result<Self, TransitionError> {
        let (status, error_message) = match (self.status, &event) {
            (TransferStatus::Pending, StatusEvent::Start) => (TransferStatus::Processing, None),
            (TransferStatus::Processing, StatusEvent::Complete) => (TransferStatus::Completed, None),
            (TransferStatus::Processing, StatusEvent::Fail(message)) => (TransferStatus::Failed, Some(message.clone())),
            (status, _) => {
                return Err(TransitionError {
                    status,
                    event: event.name(),
                });
            }
        };
        Ok(Self {
            status,
            error_message,
            ..self.clone()
        })
    }
}
