//! Library layout: `root/<shelf>/<Title (Year)>/<Title (Year)>.<ext>`.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::resolve::normalize::strip_extension;
use crate::resolve::sanitize::{sanitize_file_name, sanitize_segment, split_extension};
use crate::resolve::title::UNKNOWN_MOVIE;

/// Directory under the root for files that could not be resolved.
pub const UNKNOWN_DIRECTORY: &str = "Unknown";

/// Shelf for titles starting with a digit.
pub const DIGIT_SHELF: &str = "0-9";

/// Shelf for titles starting with anything other than a letter or digit.
pub const SYMBOL_SHELF: &str = "#";

/// Leading articles that are ignored when picking the shelf.
const ARTICLES: [&str; 3] = ["The ", "A ", "An "];

/// Computed location of a media file inside the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Alphabetic bucket directly under the root, or [`UNKNOWN_DIRECTORY`].
    pub shelf: String,
    /// Sanitized media folder name.
    pub folder: String,
    /// Optional folder inside the media folder, such as `Season 01`.
    pub subfolder: Option<String>,
    /// Sanitized final filename.
    pub file_name: String,
    /// Full output path.
    pub path: PathBuf,
}

impl Destination {
    fn new(root: &Path, shelf: String, folder: String, subfolder: Option<String>, file_name: String) -> Self {
        let mut destination = Self {
            shelf,
            folder,
            subfolder,
            file_name,
            path: PathBuf::new(),
        };
        destination.path = root.join(destination.relative_path());
        destination
    }

    /// True if this points into the unresolved bucket.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.shelf == UNKNOWN_DIRECTORY
    }

    /// Path relative to the library root.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::from(&self.shelf).join(&self.folder);
        if let Some(subfolder) = &self.subfolder {
            path.push(subfolder);
        }
        path.join(&self.file_name)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Compute the library destination for a movie.
///
/// Never fails: unresolved titles and internal errors both land in
/// `root/Unknown/<stem>/<file name>`.
///
/// ```rust
/// use std::path::Path;
/// use media_shelf::resolve::destination::resolve_destination;
///
/// let destination = resolve_destination(Some("The Matrix"), Some("1999"), "matrix.mkv", Path::new("/movies"));
/// assert_eq!(destination.shelf, "M");
/// assert_eq!(
///     destination.path,
///     Path::new("/movies/M/The Matrix (1999)/The Matrix (1999).mkv")
/// );
/// ```
#[must_use]
pub fn resolve_destination(title: Option<&str>, year: Option<&str>, file_name: &str, root: &Path) -> Destination {
    match title.filter(|title| !title.trim().is_empty() && *title != UNKNOWN_MOVIE) {
        Some(title) => try_resolve_destination(title, year, file_name, root)
            .unwrap_or_else(|_| unknown_destination(file_name, root)),
        None => unknown_destination(file_name, root),
    }
}

/// Compute the library destination for a TV episode:
/// `root/<shelf>/<Show>/Season NN/<Show> - SNNEMM.<ext>`.
#[must_use]
pub fn resolve_episode_destination(
    show: Option<&str>,
    season: u32,
    episode: u32,
    file_name: &str,
    root: &Path,
) -> Destination {
    let Some(show) = show.filter(|show| !show.trim().is_empty()) else {
        return unknown_destination(file_name, root);
    };
    try_resolve_episode_destination(show, season, episode, file_name, root)
        .unwrap_or_else(|_| unknown_destination(file_name, root))
}

/// Destination in the unresolved bucket, keyed by the raw filename stem.
#[must_use]
pub fn unknown_destination(file_name: &str, root: &Path) -> Destination {
    Destination::new(
        root,
        UNKNOWN_DIRECTORY.to_string(),
        sanitize_segment(strip_extension(file_name)),
        None,
        sanitize_file_name(file_name),
    )
}

/// Move a leading article to the end: `The Matrix` becomes `Matrix, The`.
///
/// ```rust
/// use media_shelf::resolve::destination::sort_key;
///
/// assert_eq!(sort_key("The Matrix"), "Matrix, The");
/// assert_eq!(sort_key("an American Tail"), "American Tail, an");
/// assert_eq!(sort_key("Alien"), "Alien");
/// ```
#[must_use]
pub fn sort_key(title: &str) -> String {
    for article in ARTICLES {
        if title.len() > article.len()
            && let Some(head) = title.get(..article.len())
            && head.eq_ignore_ascii_case(article)
        {
            let remainder = title[article.len()..].trim_start();
            if !remainder.is_empty() {
                return format!("{remainder}, {}", head.trim_end());
            }
        }
    }
    title.to_string()
}

/// Shelf name for a title: uppercase first letter of the sort key,
/// `0-9` for ASCII digits and `#` for anything that is not alphanumeric.
pub fn shelf_letter(title: &str) -> Result<String> {
    let first = sort_key(title)
        .chars()
        .next()
        .context("Cannot pick a shelf for an empty title")?;

    Ok(if first.is_ascii_digit() {
        DIGIT_SHELF.to_string()
    } else if first.is_alphanumeric() {
        first.to_uppercase().collect()
    } else {
        SYMBOL_SHELF.to_string()
    })
}

fn try_resolve_destination(title: &str, year: Option<&str>, file_name: &str, root: &Path) -> Result<Destination> {
    let shelf = shelf_letter(title)?;
    let base_name = match year.filter(|year| !year.is_empty()) {
        Some(year) => format!("{title} ({year})"),
        None => title.to_string(),
    };
    let folder = sanitize_segment(&base_name);
    let file_name = sanitize_file_name(&with_extension_of(&base_name, file_name));
    Ok(Destination::new(root, shelf, folder, None, file_name))
}

fn try_resolve_episode_destination(
    show: &str,
    season: u32,
    episode: u32,
    file_name: &str,
    root: &Path,
) -> Result<Destination> {
    let shelf = shelf_letter(show)?;
    let show_folder = sanitize_segment(show);
    let season_folder = format!("Season {season:02}");
    let episode_name = format!("{show} - S{season:02}E{episode:02}");
    let file_name = sanitize_file_name(&with_extension_of(&episode_name, file_name));
    Ok(Destination::new(root, shelf, show_folder, Some(season_folder), file_name))
}

/// Append the extension of `original` to `name`, if there is one.
fn with_extension_of(name: &str, original: &str) -> String {
    match split_extension(original).1 {
        Some(extension) => format!("{name}.{extension}"),
        None => name.to_string(),
    }
}
