use std::time::Duration;

use colored::Colorize;

use media_shelf::record::TransferStatus;
use media_shelf::transfer::BatchSummary;

/// Statistics for one `shelve` run
#[derive(Debug, Default)]
pub struct RunStats {
    pub(crate) files_completed: usize,
    pub(crate) files_failed: usize,
    pub(crate) files_unparsed: usize,
    pub(crate) files_skipped_collision: usize,
    pub(crate) files_not_started: usize,
    pub(crate) total_bytes: u64,
    pub(crate) total_duration: Duration,
}

impl RunStats {
    pub(crate) fn new(summary: &BatchSummary, unparsed: usize, skipped: usize, duration: Duration) -> Self {
        Self {
            files_completed: summary.count(TransferStatus::Completed),
            files_failed: summary.count(TransferStatus::Failed),
            files_unparsed: unparsed,
            files_skipped_collision: skipped,
            files_not_started: summary.count(TransferStatus::Pending),
            total_bytes: summary.completed_bytes(),
            total_duration: duration,
        }
    }

    pub(crate) const fn total_skipped(&self) -> usize {
        self.files_unparsed + self.files_skipped_collision + self.files_not_started
    }

    pub(crate) fn print_summary(&self) {
        println!("{}", "\n--- Transfer Summary ---".bold().magenta());
        println!("Files completed:        {}", self.files_completed);
        println!(
            "Files failed:           {}",
            if self.files_failed > 0 {
                self.files_failed.to_string().red()
            } else {
                "0".normal()
            }
        );
        println!("Files skipped:          {}", self.total_skipped());
        if self.total_skipped() > 0 {
            println!("  - Unparsed:           {}", self.files_unparsed);
            println!("  - Collision:          {}", self.files_skipped_collision);
            println!("  - Not started:        {}", self.files_not_started);
        }
        println!();
        println!(
            "Total copied:           {}",
            media_shelf::format_size(self.total_bytes)
        );
        println!(
            "Total time:             {}",
            media_shelf::format_duration(self.total_duration)
        );
    }
}
