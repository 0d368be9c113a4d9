//! Turn a raw release filename into a clean, space-separated name.

use std::sync::LazyLock;

use regex::Regex;

use crate::resolve::sanitize::split_extension;
use crate::resolve::tags::TagDictionary;

/// Any `[...]` or `{...}` span, regardless of content.
static RE_BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]|\{[^}]*\}").expect("Failed to compile bracketed span regex"));

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// Frame sizes like 1920x1080 that are not covered by the tag list.
static RE_FRAME_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d{3,4}x\d{3,4}\b").expect("Failed to compile frame size regex"));

/// Scene style `-GROUP` suffix at the very end of the stem.
static RE_GROUP_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-[A-Za-z0-9]{2,16}$").expect("Failed to compile group suffix regex"));

const SEPARATORS: [char; 3] = ['.', '_', '-'];

/// Remove the file extension suffix, whatever its case.
///
/// ```rust
/// use media_shelf::resolve::normalize::strip_extension;
///
/// assert_eq!(strip_extension("The.Matrix.1999.MKV"), "The.Matrix.1999");
/// assert_eq!(strip_extension("README"), "README");
/// ```
#[must_use]
pub fn strip_extension(file_name: &str) -> &str {
    split_extension(file_name).0
}

/// Replace dots, underscores and dashes with single spaces.
#[must_use]
pub fn replace_separators(text: &str) -> String {
    text.replace(SEPARATORS, " ")
}

/// Collapse whitespace runs to a single space and trim both ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Drop a trailing `-GROUP` suffix when the stem is clearly a scene release,
/// meaning the part before the suffix carries at least one known tag.
/// Hyphenated titles like `Spider-Man` are left alone.
#[must_use]
pub fn strip_release_group_suffix<'a>(stem: &'a str, tags: &TagDictionary) -> &'a str {
    RE_GROUP_SUFFIX.find(stem).map_or(stem, |suffix| {
        let head = &stem[..suffix.start()];
        if tags.contains_tag(&replace_separators(head)) {
            head
        } else {
            stem
        }
    })
}

/// Steps one and two of normalization: remove the extension and separators.
///
/// The result still carries tags and bracketed annotations.
#[must_use]
pub fn separate(file_name: &str, tags: &TagDictionary) -> String {
    let stem = strip_release_group_suffix(strip_extension(file_name), tags);
    replace_separators(stem)
}

/// Remaining normalization steps for an already separated name:
/// dictionary tokens, frame sizes and bracketed spans are removed and whitespace is collapsed.
#[must_use]
pub fn clean(separated: &str, tags: &TagDictionary) -> String {
    let without_tags = tags.strip(separated);
    let without_sizes = RE_FRAME_SIZE.replace_all(&without_tags, " ");
    let without_brackets = RE_BRACKETED.replace_all(&without_sizes, " ");
    collapse_whitespace(&without_brackets)
}

/// Normalize a raw filename (with extension) into a token-cleaned name.
///
/// ```rust
/// use media_shelf::resolve::normalize::normalize_name;
/// use media_shelf::resolve::tags::DEFAULT_TAGS;
///
/// let name = normalize_name("The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv", &DEFAULT_TAGS);
/// assert_eq!(name, "The Matrix 1999");
/// ```
#[must_use]
pub fn normalize_name(file_name: &str, tags: &TagDictionary) -> String {
    clean(&separate(file_name, tags), tags)
}
