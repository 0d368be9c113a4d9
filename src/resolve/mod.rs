//! Filename resolution: from a raw release filename to title, year and library path.
//!
//! All functions here are pure and deterministic,
//! so resolving the same inputs twice always gives the same output.

pub mod destination;
pub mod episode;
pub mod normalize;
pub mod sanitize;
pub mod tags;
pub mod title;
pub mod year;

use std::path::{Path, PathBuf};

pub use destination::Destination;
pub use episode::EpisodeInfo;
pub use tags::TagDictionary;
pub use title::{MovieTitle, UNKNOWN_MOVIE};

use crate::resolve::destination::{resolve_destination, resolve_episode_destination};
use crate::resolve::episode::parse_episode;
use crate::resolve::normalize::{clean, separate};
use crate::resolve::title::finalize_title;
use crate::resolve::year::extract_year;

/// Parsed media information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaInfo {
    Movie(MovieTitle),
    Episode(EpisodeInfo),
}

impl MediaInfo {
    /// True if no usable title or show name was found.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        match self {
            Self::Movie(movie) => movie.is_unknown(),
            Self::Episode(episode) => episode.is_unknown(),
        }
    }

    /// Human-readable name: `Title (Year)` or `Show - S01E02`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Movie(MovieTitle { title, year: Some(year) }) => format!("{title} ({year})"),
            Self::Movie(MovieTitle { title, year: None }) => title.clone(),
            Self::Episode(EpisodeInfo { show, season, episode }) => format!("{show} - S{season:02}E{episode:02}"),
        }
    }
}

/// Media information together with its computed destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub info: MediaInfo,
    pub destination: Destination,
}

/// Resolves filenames against one library root.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    tags: TagDictionary,
    detect_episodes: bool,
}

impl Resolver {
    #[must_use]
    pub const fn new(root: PathBuf, tags: TagDictionary) -> Self {
        Self {
            root,
            tags,
            detect_episodes: true,
        }
    }

    /// Treat every file as a movie, even if it carries an episode marker.
    #[must_use]
    pub fn movies_only(mut self) -> Self {
        self.detect_episodes = false;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a single filename.
    #[must_use]
    pub fn resolve(&self, file_name: &str) -> Resolution {
        if self.detect_episodes
            && let Some(episode) = parse_episode(file_name, &self.tags)
        {
            let show = (!episode.is_unknown()).then_some(episode.show.as_str());
            let destination =
                resolve_episode_destination(show, episode.season, episode.episode, file_name, &self.root);
            return Resolution {
                info: MediaInfo::Episode(episode),
                destination,
            };
        }

        let movie = parse_movie(file_name, &self.tags);
        let destination = resolve_destination(Some(&movie.title), movie.year.as_deref(), file_name, &self.root);
        Resolution {
            info: MediaInfo::Movie(movie),
            destination,
        }
    }
}

/// Derive the movie title and year from a raw filename.
///
/// The year is searched in the normalized name first. Bracketed annotations are
/// dropped during normalization, so the separated name is searched as a fallback
/// to still pick up a `[YYYY]` year.
///
/// ```rust
/// use media_shelf::resolve::parse_movie;
/// use media_shelf::resolve::tags::DEFAULT_TAGS;
///
/// let movie = parse_movie("The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv", &DEFAULT_TAGS);
/// assert_eq!(movie.title, "The Matrix");
/// assert_eq!(movie.year.as_deref(), Some("1999"));
/// ```
#[must_use]
pub fn parse_movie(file_name: &str, tags: &TagDictionary) -> MovieTitle {
    if file_name.trim().is_empty() {
        return MovieTitle::unknown();
    }

    let separated = separate(file_name, tags);
    let normalized = clean(&separated, tags);
    let year = extract_year(&normalized).or_else(|| extract_year(&separated));

    finalize_title(&normalized, year.as_deref())
}
