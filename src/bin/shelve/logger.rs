use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;

use media_shelf::record::MediaFileRecord;

use crate::config::Config;
use crate::stats::RunStats;

/// Simple file logger for transfers with buffered writes
pub struct FileLogger {
    writer: BufWriter<File>,
}

impl FileLogger {
    /// Create a new file logger, writing to ~/logs/media-shelf/shelve_<timestamp>.log
    pub(crate) fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        let log_dir = home_dir.join("logs").join(env!("CARGO_PKG_NAME"));

        if !log_dir.exists() {
            fs::create_dir_all(&log_dir).context("Failed to create log directory")?;
        }

        let log_path = log_dir.join(format!(
            "{}_{}.log",
            env!("CARGO_BIN_NAME"),
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        ));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Log when starting the program
    pub(crate) fn log_init(&mut self, config: &Config) {
        let _ = writeln!(
            self.writer,
            "[{}] INIT \"{}\" -> \"{}\"",
            Self::timestamp(),
            config.path.display(),
            config.root.display()
        );
        let _ = writeln!(self.writer, "  extensions: {:?}", config.extensions);
        if !config.extra_tags.is_empty() {
            let _ = writeln!(self.writer, "  extra_tags: {:?}", config.extra_tags);
        }
        let _ = writeln!(self.writer, "  recurse: {}", config.recurse);
        let _ = writeln!(self.writer, "  movies_only: {}", config.movies_only);
        let _ = writeln!(self.writer, "  overwrite: {}", config.transfer.overwrite);
        let _ = writeln!(self.writer, "  max_retries: {}", config.transfer.max_retries);
        let _ = writeln!(
            self.writer,
            "  initial_backoff: {} ms",
            config.transfer.initial_backoff.as_millis()
        );
        let _ = writeln!(self.writer, "  chunk_size: {}", config.transfer.chunk_size);
        let _ = self.writer.flush();
    }

    /// Log when starting a transfer
    pub(crate) fn log_start(&mut self, record: &MediaFileRecord, file_index: &str) {
        let _ = writeln!(
            self.writer,
            "[{}] START   {} - \"{}\" -> \"{}\"",
            Self::timestamp(),
            file_index,
            record.source_path().display(),
            record.destination_path().display()
        );
        let _ = self.writer.flush();
    }

    /// Log when a transfer finishes successfully
    pub(crate) fn log_success(&mut self, record: &MediaFileRecord, file_index: &str, duration: Duration) {
        let _ = writeln!(
            self.writer,
            "[{}] SUCCESS {} - \"{}\" | Time: {}",
            Self::timestamp(),
            file_index,
            record.destination_path().display(),
            media_shelf::format_duration(duration)
        );
        let _ = self.writer.flush();
    }

    /// Log when a transfer fails, with the underlying cause if there is one
    pub(crate) fn log_failure(&mut self, record: &MediaFileRecord, file_index: &str, detail: Option<&str>) {
        let _ = write!(
            self.writer,
            "[{}] ERROR   {} - \"{}\" | {}",
            Self::timestamp(),
            file_index,
            record.source_path().display(),
            record.error_message().unwrap_or_default()
        );
        let _ = match detail {
            Some(detail) => writeln!(self.writer, ": {detail}"),
            None => writeln!(self.writer),
        };
        let _ = self.writer.flush();
    }

    /// Log when the operator cancels a transfer
    pub(crate) fn log_cancel(&mut self, record: &MediaFileRecord, file_index: &str) {
        let _ = writeln!(
            self.writer,
            "[{}] CANCEL  {} - \"{}\"",
            Self::timestamp(),
            file_index,
            record.source_path().display()
        );
        let _ = self.writer.flush();
    }

    /// Log final statistics
    pub(crate) fn log_stats(&mut self, stats: &RunStats) {
        let _ = writeln!(self.writer, "[{}] STATISTICS", Self::timestamp());
        let _ = writeln!(self.writer, "  Files completed: {}", stats.files_completed);
        let _ = writeln!(self.writer, "  Files failed:    {}", stats.files_failed);
        let _ = writeln!(self.writer, "  Files skipped:   {}", stats.total_skipped());
        if stats.total_skipped() > 0 {
            let _ = writeln!(self.writer, "    - Unparsed:    {}", stats.files_unparsed);
            let _ = writeln!(self.writer, "    - Collision:   {}", stats.files_skipped_collision);
            let _ = writeln!(self.writer, "    - Not started: {}", stats.files_not_started);
        }
        let _ = writeln!(
            self.writer,
            "  Total copied: {}",
            media_shelf::format_size(stats.total_bytes)
        );
        let _ = writeln!(
            self.writer,
            "  Total time: {}",
            media_shelf::format_duration(stats.total_duration)
        );
        let _ = writeln!(self.writer, "[{}] END", Self::timestamp());
        let _ = self.writer.flush();
    }
}
