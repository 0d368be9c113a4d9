mod config;
mod logger;
mod progress;
mod shelve;
mod stats;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::shelve::Shelve;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Sort movie and TV releases into an alphabetical library with verified copies"
)]
pub(crate) struct Args {
    /// Optional input directory or file
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    path: Option<PathBuf>,

    /// Library root directory
    #[arg(short = 'o', long, name = "DEST", value_hint = clap::ValueHint::DirPath)]
    output: Option<String>,

    /// Override file extensions to include
    #[arg(short = 't', long, num_args = 1, action = clap::ArgAction::Append, name = "EXTENSION")]
    extension: Vec<String>,

    /// Additional release tags to strip from names
    #[arg(short = 'x', long, num_args = 1, action = clap::ArgAction::Append, name = "TAG")]
    tag: Vec<String>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    recurse: bool,

    /// Only print the plan without copying files
    #[arg(short, long)]
    print: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    auto: bool,

    /// Fail instead of overwriting existing destination files
    #[arg(short, long)]
    skip_existing: bool,

    /// Treat all files as movies
    #[arg(short, long)]
    movies_only: bool,

    /// Do not write a log file
    #[arg(short = 'n', long)]
    no_log: bool,

    /// Enable debug prints
    #[arg(short = 'D', long)]
    debug: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        media_shelf::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        Shelve::new(args)?.run()
    }
}
