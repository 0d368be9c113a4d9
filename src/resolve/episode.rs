//! TV episode detection from `S01E02` and `1x02` style markers.

use std::sync::LazyLock;

use regex::Regex;

use crate::resolve::normalize::{clean, collapse_whitespace, separate};
use crate::resolve::tags::TagDictionary;
use crate::resolve::year::extract_year;

/// Placeholder show name for episodes without a usable show title.
pub const UNKNOWN_SHOW: &str = "Unknown Show";

static RE_SEASON_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bS(?P<season>\d{1,2})\s?E(?P<episode>\d{1,3})\b")
        .expect("Failed to compile season episode regex")
});

static RE_CROSS_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<season>\d{1,2})x(?P<episode>\d{2,3})\b").expect("Failed to compile NxNN episode regex")
});

/// Show name with season and episode numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeInfo {
    pub show: String,
    pub season: u32,
    pub episode: u32,
}

impl EpisodeInfo {
    /// True if the show name could not be resolved.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.show == UNKNOWN_SHOW
    }
}

/// Parse a TV episode filename.
///
/// Returns `None` when the name has no episode marker,
/// in which case the file should be handled as a movie.
///
/// ```rust
/// use media_shelf::resolve::episode::parse_episode;
/// use media_shelf::resolve::tags::DEFAULT_TAGS;
///
/// let info = parse_episode("The.Office.US.S02E05.720p.HDTV.x264.mkv", &DEFAULT_TAGS).unwrap();
/// assert_eq!(info.show, "The Office US");
/// assert_eq!((info.season, info.episode), (2, 5));
/// ```
#[must_use]
pub fn parse_episode(file_name: &str, tags: &TagDictionary) -> Option<EpisodeInfo> {
    let separated = separate(file_name, tags);
    let captures = RE_SEASON_EPISODE
        .captures(&separated)
        .or_else(|| RE_CROSS_EPISODE.captures(&separated))?;

    let season = captures.name("season")?.as_str().parse::<u32>().ok()?;
    let episode = captures.name("episode")?.as_str().parse::<u32>().ok()?;
    let marker_start = captures.get(0)?.start();

    let show = show_name(&separated[..marker_start], tags);
    Some(EpisodeInfo {
        show: if show.is_empty() { UNKNOWN_SHOW.to_string() } else { show },
        season,
        episode,
    })
}

/// Clean the text before the episode marker into a show name.
/// A trailing year is dropped so that `Show 2019 S01E01` files under `Show`.
fn show_name(prefix: &str, tags: &TagDictionary) -> String {
    let cleaned = clean(prefix, tags);
    let Some(year) = extract_year(&cleaned) else {
        return cleaned;
    };
    let unwrapped = cleaned.trim_end_matches(')');
    match unwrapped
        .strip_suffix(year.as_str())
        .map(|head| collapse_whitespace(head.trim_end_matches([' ', '('])))
    {
        Some(show) if !show.is_empty() => show,
        _ => cleaned,
    }
}
