use std::cell::{Cell, RefCell};
use std::time::Instant;

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use media_shelf::record::{MediaFileRecord, TransferStatus};
use media_shelf::transfer::ProgressSink;

use crate::logger::FileLogger;

const PROGRESS_BAR_CHARS: &str = "=>-";
const BATCH_TEMPLATE: &str = "[{elapsed_precise}] {bar:80.magenta/blue} {pos}/{len} {percent}%";
const FILE_TEMPLATE: &str = "{bar:80.cyan/blue} {percent:>3}% {msg}";

/// Console progress bars for a transfer batch, also feeding the run log.
pub struct ConsoleProgress<'a> {
    bars: MultiProgress,
    batch_bar: ProgressBar,
    file_bar: ProgressBar,
    logger: Option<&'a RefCell<FileLogger>>,
    file_index: RefCell<String>,
    failure_detail: RefCell<Option<String>>,
    started: Cell<Option<Instant>>,
    verbose: bool,
}

impl<'a> ConsoleProgress<'a> {
    pub(crate) fn new(total: usize, logger: Option<&'a RefCell<FileLogger>>, verbose: bool) -> Self {
        #[cfg(test)]
        let bars = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        #[cfg(not(test))]
        let bars = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());

        let batch_bar = bars.add(ProgressBar::new(total as u64));
        batch_bar.set_style(
            ProgressStyle::default_bar()
                .template(BATCH_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(PROGRESS_BAR_CHARS),
        );
        let file_bar = bars.add(ProgressBar::new(100));
        file_bar.set_style(
            ProgressStyle::default_bar()
                .template(FILE_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(PROGRESS_BAR_CHARS),
        );

        Self {
            bars,
            batch_bar,
            file_bar,
            logger,
            file_index: RefCell::new(String::new()),
            failure_detail: RefCell::new(None),
            started: Cell::new(None),
            verbose,
        }
    }

    pub(crate) fn finish(&self) {
        self.file_bar.finish_and_clear();
        self.batch_bar.finish_and_clear();
    }

    fn println(&self, message: &str) {
        // Hidden targets swallow printed lines
        if self.bars.is_hidden() || self.bars.println(message).is_err() {
            println!("{message}");
        }
    }
}

impl ProgressSink for ConsoleProgress<'_> {
    fn file_progress(&self, _file_name: &str, percent: u8) {
        self.file_bar.set_position(u64::from(percent));
    }

    fn batch_progress(&self, current: usize, total: usize) {
        let width = total.to_string().chars().count();
        *self.file_index.borrow_mut() = format!("[{current:>width$}/{total}]");
        self.batch_bar.set_length(total as u64);
        self.batch_bar.set_position(current.saturating_sub(1) as u64);
    }

    fn verification_error(&self, _file_name: &str, error: &anyhow::Error) {
        *self.failure_detail.borrow_mut() = Some(format!("{error:#}"));
    }

    fn record_started(&self, record: &MediaFileRecord) {
        self.started.set(Some(Instant::now()));
        *self.failure_detail.borrow_mut() = None;
        self.file_bar.reset();
        self.file_bar.set_message(record.file_name().to_string());
        if let Some(logger) = self.logger {
            logger.borrow_mut().log_start(record, &self.file_index.borrow());
        }
    }

    fn record_finished(&self, record: &MediaFileRecord) {
        let duration = self.started.take().map(|start| start.elapsed()).unwrap_or_default();
        let file_index = self.file_index.borrow();
        self.batch_bar.inc(1);

        match record.status() {
            TransferStatus::Completed => {
                if self.verbose {
                    self.println(
                        &format!(
                            "✓ {} in {}",
                            record.destination().relative_path().display(),
                            media_shelf::format_duration(duration)
                        )
                        .green()
                        .to_string(),
                    );
                }
                if let Some(logger) = self.logger {
                    logger.borrow_mut().log_success(record, &file_index, duration);
                }
            }
            TransferStatus::Failed if record.was_cancelled() => {
                self.println(&format!("⊘ Cancelled: {}", record.file_name()).yellow().to_string());
                if let Some(logger) = self.logger {
                    logger.borrow_mut().log_cancel(record, &file_index);
                }
            }
            TransferStatus::Failed => {
                let detail = self.failure_detail.take();
                let message = match &detail {
                    Some(detail) => format!("{}: {detail}", record.error_message().unwrap_or_default()),
                    None => record.error_message().unwrap_or_default().to_string(),
                };
                self.println(&format!("Error: {}: {message}", record.file_name()).red().to_string());
                if let Some(logger) = self.logger {
                    logger.borrow_mut().log_failure(record, &file_index, detail.as_deref());
                }
            }
            TransferStatus::Pending | TransferStatus::Processing | TransferStatus::Unparsed => {}
        }
    }
}

#[cfg(test)]
mod console_progress_tests {
    use super::*;

    use std::path::PathBuf;

    use media_shelf::resolve::{Resolver, TagDictionary};

    #[test]
    fn verification_error_is_kept_until_next_record() {
        let progress = ConsoleProgress::new(2, None, false);
        let resolver = Resolver::new(PathBuf::from("/library"), TagDictionary::default());
        let record = MediaFileRecord::new(PathBuf::from("/downloads/Heat.1995.mkv"), &resolver);

        progress.record_started(&record);
        progress.verification_error(record.file_name(), &anyhow::anyhow!("disk gone"));
        assert_eq!(progress.failure_detail.borrow().as_deref(), Some("disk gone"));

        progress.record_started(&record);
        assert!(progress.failure_detail.borrow().is_none());
    }
}
