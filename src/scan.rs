//! Candidate discovery and batch resolution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::record::MediaFileRecord;
use crate::resolve::Resolver;

/// Video file extensions scanned by default.
pub const DEFAULT_EXTENSIONS: [&str; 8] = ["mkv", "mp4", "avi", "m4v", "mov", "wmv", "ts", "webm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<String>,
    pub recurse: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            recurse: false,
        }
    }
}

impl ScanOptions {
    /// Options with the given extensions, normalized to lowercase without a leading dot.
    /// An empty list falls back to the default extensions.
    #[must_use]
    pub fn new(extensions: &[String], recurse: bool) -> Self {
        let extensions: Vec<String> = extensions
            .iter()
            .map(|extension| extension.trim().trim_start_matches('.').to_lowercase())
            .filter(|extension| !extension.is_empty())
            .collect();

        if extensions.is_empty() {
            Self {
                recurse,
                ..Self::default()
            }
        } else {
            Self { extensions, recurse }
        }
    }

    fn matches(&self, path: &Path) -> bool {
        let extension = crate::path_to_file_extension_string(path);
        self.extensions.contains(&extension)
    }
}

/// Find candidate media files under `root`, sorted by path.
///
/// A file path is returned as the only candidate if its extension matches.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(if options.matches(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    if !root.is_dir() {
        anyhow::bail!("Input path '{}' does not exist or is not accessible", root.display());
    }

    let max_depth = if options.recurse { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !crate::is_hidden(entry))
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| options.matches(path))
        .collect();

    files.sort();
    Ok(files)
}

/// Resolve every path into a record in parallel, keeping the input order.
#[must_use]
pub fn resolve_all(paths: Vec<PathBuf>, resolver: &Resolver) -> Vec<MediaFileRecord> {
    paths
        .into_par_iter()
        .map(|path| MediaFileRecord::new(path, resolver))
        .collect()
}

/// Group records that resolve to the same destination path.
///
/// Only groups with more than one record are returned.
/// Groups are ordered by destination and records within a group by source path.
#[must_use]
pub fn find_collisions(records: &[MediaFileRecord]) -> Vec<Vec<&MediaFileRecord>> {
    let mut groups: BTreeMap<&Path, Vec<&MediaFileRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.destination_path()).or_default().push(record);
    }
    groups
        .into_values()
        .filter(|group| group.len() > 1)
        .map(|mut group| {
            group.sort_by(|a, b| a.source_path().cmp(b.source_path()));
            group
        })
        .collect()
}
