use std::cell::RefCell;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;

use media_shelf::record::{MediaFileRecord, TransferStatus};
use media_shelf::resolve::{Resolver, TagDictionary};
use media_shelf::scan::{ScanOptions, find_collisions, resolve_all, scan_directory};
use media_shelf::transfer::{CancelFlag, TransferEngine};
use media_shelf::{print_bold, print_warning};

use crate::Args;
use crate::config::Config;
use crate::logger::FileLogger;
use crate::progress::ConsoleProgress;
use crate::stats::RunStats;

/// Records split by what happens to them in this run.
#[derive(Debug, Default)]
struct TransferPlan {
    transfer: Vec<MediaFileRecord>,
    unparsed: Vec<MediaFileRecord>,
    skipped: Vec<MediaFileRecord>,
}

pub struct Shelve {
    config: Config,
    logger: Option<RefCell<FileLogger>>,
}

impl Shelve {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::from_args(args)?;
        let logger = if config.log && !config.dryrun {
            match FileLogger::new() {
                Ok(logger) => Some(RefCell::new(logger)),
                Err(error) => {
                    print_warning!("Logging disabled: {error}");
                    None
                }
            }
        } else {
            None
        };
        Ok(Self { config, logger })
    }

    /// Scan, print the plan and transfer the approved files.
    pub fn run(&self) -> Result<()> {
        if self.config.debug {
            println!("{}", self.config);
        }

        let options = ScanOptions::new(&self.config.extensions, self.config.recurse);
        let paths = scan_directory(&self.config.path, &options)?;
        if paths.is_empty() {
            println!("No media files found");
            return Ok(());
        }
        if self.config.verbose {
            println!("Found {} media file(s)", paths.len());
        }

        let records = resolve_all(paths, &self.resolver());
        let plan = self.plan(records);

        self.print_plan(&plan);

        if plan.transfer.is_empty() {
            println!("Nothing to transfer");
            return Ok(());
        }
        if self.config.dryrun {
            println!("{}", format!("Dryrun: {} file(s) would be copied", plan.transfer.len()).bold());
            return Ok(());
        }
        if !self.confirm(plan.transfer.len())? {
            println!("Cancelled");
            return Ok(());
        }

        self.transfer(plan)
    }

    fn resolver(&self) -> Resolver {
        let tags = TagDictionary::with_extra_tags(&self.config.extra_tags);
        let resolver = Resolver::new(self.config.root.clone(), tags);
        if self.config.movies_only {
            resolver.movies_only()
        } else {
            resolver
        }
    }

    /// Split records into transfers, unparsed files and collision losers.
    /// The first record of each collision group by source path is kept.
    fn plan(&self, records: Vec<MediaFileRecord>) -> TransferPlan {
        let mut losers: HashSet<PathBuf> = HashSet::new();
        for group in find_collisions(&records) {
            let Some((first, rest)) = group.split_first() else {
                continue;
            };
            print_warning!(
                "{} files resolve to {}",
                group.len(),
                first.destination().relative_path().display()
            );
            println!("  keep: {}", first.source_path().display());
            for record in rest {
                println!("  skip: {}", record.source_path().display());
                losers.insert(record.source_path().to_path_buf());
            }
        }

        let mut plan = TransferPlan::default();
        for record in records {
            if record.status() == TransferStatus::Unparsed {
                plan.unparsed.push(record);
            } else if losers.contains(record.source_path()) {
                plan.skipped.push(record);
            } else {
                plan.transfer.push(record);
            }
        }
        plan
    }

    fn print_plan(&self, plan: &TransferPlan) {
        let num_digits = plan.transfer.len().to_string().chars().count();
        for (index, record) in plan.transfer.iter().enumerate() {
            let relative = record.destination().relative_path();
            print_bold!("{:>num_digits$}: {}", index + 1, record.info().display_name());
            media_shelf::show_diff(record.file_name(), &media_shelf::path_to_string(&relative));
            if self.config.verbose {
                println!("  {}", media_shelf::path_to_string_relative(record.source_path()));
                println!("  {}", record.destination_path().display());
            }
        }

        if !plan.unparsed.is_empty() {
            println!();
            print_warning!("Could not parse {} file(s):", plan.unparsed.len());
            for record in &plan.unparsed {
                println!("  {}", record.file_name());
            }
        }
        println!();
    }

    fn confirm(&self, count: usize) -> Result<bool> {
        if self.config.auto {
            return Ok(true);
        }
        print!(
            "{}",
            format!("Copy {count} file(s) to {}? (y/n): ", self.config.root.display()).magenta()
        );
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    }

    fn transfer(&self, plan: TransferPlan) -> Result<()> {
        let cancel = CancelFlag::new();
        let handler_flag = cancel.clone();
        ctrlc::set_handler(move || {
            if handler_flag.is_cancelled() {
                // Second Ctrl+C - force exit
                std::process::exit(130);
            }
            println!("\n{}", "Received Ctrl+C, stopping current transfer...".yellow().bold());
            handler_flag.cancel();
        })
        .context("Failed to set Ctrl+C handler")?;

        if let Some(logger) = &self.logger {
            logger.borrow_mut().log_init(&self.config);
        }

        let engine = TransferEngine::new(self.config.transfer).with_cancel_flag(cancel);
        let progress = ConsoleProgress::new(plan.transfer.len(), self.logger.as_ref(), self.config.verbose);

        let start = Instant::now();
        let summary = engine.transfer_all(plan.transfer, &progress);
        progress.finish();

        if summary.cancelled {
            println!("\n{}", "Aborted by user".bold().red());
        }

        let stats = RunStats::new(&summary, plan.unparsed.len(), plan.skipped.len(), start.elapsed());
        if let Some(logger) = &self.logger {
            logger.borrow_mut().log_stats(&stats);
        }
        stats.print_summary();

        Ok(())
    }
}

#[cfg(test)]
mod shelve_tests {
    use super::*;

    use std::fs;
    use std::path::Path;

    use clap::Parser;
    use tempfile::{TempDir, tempdir};

    fn shelve(dir: &TempDir, extra: &[&str]) -> Shelve {
        let source = dir.path().join("downloads");
        let library = dir.path().join("library");
        let mut args = vec![
            "shelve".to_string(),
            source.display().to_string(),
            "-o".to_string(),
            library.display().to_string(),
        ];
        args.extend(extra.iter().map(ToString::to_string));
        let config = Config::try_from_args(Args::try_parse_from(args).unwrap(), Default::default()).unwrap();
        Shelve { config, logger: None }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"content").unwrap();
    }

    #[test]
    fn plan_splits_records() {
        let dir = tempdir().unwrap();
        let downloads = dir.path().join("downloads");
        touch(&downloads.join("Heat.1995.mkv"));
        touch(&downloads.join("Heat (1995).mkv"));
        touch(&downloads.join("1080p.x264.mkv"));
        touch(&downloads.join("Alien.1979.mkv"));

        let shelve = shelve(&dir, &[]);
        let paths = scan_directory(&downloads, &ScanOptions::default()).unwrap();
        let plan = shelve.plan(resolve_all(paths, &shelve.resolver()));

        let names = |records: &[MediaFileRecord]| -> Vec<String> {
            records.iter().map(|record| record.file_name().to_string()).collect()
        };
        assert_eq!(names(&plan.transfer), vec!["Alien.1979.mkv", "Heat (1995).mkv"]);
        assert_eq!(names(&plan.skipped), vec!["Heat.1995.mkv"]);
        assert_eq!(names(&plan.unparsed), vec!["1080p.x264.mkv"]);
    }

    #[test]
    fn dryrun_does_not_copy() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("downloads").join("Heat.1995.mkv"));

        shelve(&dir, &["--print"]).run().unwrap();

        assert!(!dir.path().join("library").exists());
    }

    #[test]
    fn movies_only_resolver() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("downloads")).unwrap();
        let resolution = shelve(&dir, &["-m"]).resolver().resolve("Lost.S01E01.mkv");
        assert!(matches!(resolution.info, media_shelf::resolve::MediaInfo::Movie(_)));
    }
}
