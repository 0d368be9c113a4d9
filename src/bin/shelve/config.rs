use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use itertools::Itertools;

use media_shelf::config::ShelveConfig;
use media_shelf::print_error;
use media_shelf::scan::DEFAULT_EXTENSIONS;
use media_shelf::transfer::TransferOptions;

use crate::Args;

/// Final config created from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) auto: bool,
    pub(crate) debug: bool,
    pub(crate) dryrun: bool,
    pub(crate) extensions: Vec<String>,
    pub(crate) extra_tags: Vec<String>,
    pub(crate) log: bool,
    pub(crate) movies_only: bool,
    pub(crate) path: PathBuf,
    pub(crate) recurse: bool,
    pub(crate) root: PathBuf,
    pub(crate) transfer: TransferOptions,
    pub(crate) verbose: bool,
}

impl Config {
    /// Create config from given command line args and the user config file.
    /// An unreadable config file is reported and ignored.
    pub(crate) fn from_args(args: Args) -> Result<Self> {
        let user_config = ShelveConfig::get_user_config().unwrap_or_else(|error| {
            print_error!("{error}");
            ShelveConfig::default()
        });
        Self::try_from_args(args, user_config)
    }

    /// Merge CLI arguments with the user config.
    pub(crate) fn try_from_args(args: Args, user_config: ShelveConfig) -> Result<Self> {
        let path = media_shelf::resolve_input_path(args.path.as_deref())?;

        let Some(destination) = args.output.or(user_config.destination) else {
            anyhow::bail!("Library root directory is not set. Use --output or set `destination` in the config file");
        };
        let root = media_shelf::resolve_library_root(&destination)?;

        let extensions: Vec<String> = if args.extension.is_empty() && user_config.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
        } else {
            args.extension
                .into_iter()
                .chain(user_config.extensions)
                .map(|extension| extension.trim().trim_start_matches('.').to_lowercase())
                .filter(|extension| !extension.is_empty())
                .unique()
                .collect()
        };

        let extra_tags: Vec<String> = args.tag.into_iter().chain(user_config.extra_tags).unique().collect();

        let defaults = TransferOptions::default();
        let transfer = TransferOptions {
            chunk_size: user_config.chunk_size.filter(|&size| size > 0).unwrap_or(defaults.chunk_size),
            max_retries: user_config.max_retries.filter(|&retries| retries > 0).unwrap_or(defaults.max_retries),
            initial_backoff: user_config
                .initial_backoff_ms
                .map_or(defaults.initial_backoff, Duration::from_millis),
            overwrite: !args.skip_existing && user_config.overwrite.unwrap_or(defaults.overwrite),
        };

        Ok(Self {
            auto: args.auto || user_config.auto,
            debug: args.debug || user_config.debug,
            dryrun: args.print || user_config.dryrun,
            extensions,
            extra_tags,
            log: !args.no_log && user_config.log,
            movies_only: args.movies_only || user_config.movies_only,
            path,
            recurse: args.recurse || user_config.recurse,
            root,
            transfer,
            verbose: args.verbose || user_config.verbose,
        })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extra_tags = if self.extra_tags.is_empty() {
            "extra_tags: []".to_string()
        } else {
            "extra_tags:\n".to_string() + &*self.extra_tags.iter().map(|tag| format!("    {tag}")).join("\n")
        };
        writeln!(f, "Config:")?;
        writeln!(f, "  path:        {}", self.path.display())?;
        writeln!(f, "  root:        {}", self.root.display())?;
        writeln!(f, "  auto:        {}", media_shelf::colorize_bool(self.auto))?;
        writeln!(f, "  debug:       {}", media_shelf::colorize_bool(self.debug))?;
        writeln!(f, "  dryrun:      {}", media_shelf::colorize_bool(self.dryrun))?;
        writeln!(f, "  log:         {}", media_shelf::colorize_bool(self.log))?;
        writeln!(f, "  movies_only: {}", media_shelf::colorize_bool(self.movies_only))?;
        writeln!(f, "  overwrite:   {}", media_shelf::colorize_bool(self.transfer.overwrite))?;
        writeln!(f, "  recurse:     {}", media_shelf::colorize_bool(self.recurse))?;
        writeln!(f, "  verbose:     {}", media_shelf::colorize_bool(self.verbose))?;
        writeln!(f, "  max_retries: {}", self.transfer.max_retries)?;
        writeln!(f, "  backoff:     {} ms", self.transfer.initial_backoff.as_millis())?;
        writeln!(f, "  chunk_size:  {}", self.transfer.chunk_size)?;
        writeln!(f, "  extensions:  {}", self.extensions.join(", "))?;
        writeln!(f, "  {extra_tags}")
    }
}
