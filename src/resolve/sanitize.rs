//! Make names safe to use as path segments on any common filesystem.

use crate::resolve::normalize::collapse_whitespace;

/// Maximum length of a single path segment in characters.
pub const MAX_SEGMENT_LENGTH: usize = 100;

/// Replacement for segments that end up empty.
pub const UNKNOWN_SEGMENT: &str = "Unknown";

/// Characters that are invalid in file or directory names on Windows,
/// which is the strictest of the supported platforms.
const RESERVED_CHARACTERS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// True if the character may not appear in a path segment.
#[must_use]
pub fn is_reserved_char(c: char) -> bool {
    c.is_control() || RESERVED_CHARACTERS.contains(&c)
}

/// Sanitize a directory name or title for use as one path segment.
///
/// Reserved characters become spaces, whitespace is collapsed,
/// trailing dots and spaces are trimmed and the length is capped.
/// The result is never empty.
///
/// ```rust
/// use media_shelf::resolve::sanitize::sanitize_segment;
///
/// assert_eq!(sanitize_segment("Mission: Impossible"), "Mission Impossible");
/// assert_eq!(sanitize_segment("..."), "Unknown");
/// ```
#[must_use]
pub fn sanitize_segment(name: &str) -> String {
    sanitize_with_limit(name, MAX_SEGMENT_LENGTH)
}

/// Sanitize a filename, keeping the original extension untouched.
///
/// Only the stem is sanitized. It is capped so that stem and extension together
/// stay within [`MAX_SEGMENT_LENGTH`].
#[must_use]
pub fn sanitize_file_name(file_name: &str) -> String {
    match split_extension(file_name) {
        (stem, Some(extension)) => {
            let limit = MAX_SEGMENT_LENGTH
                .saturating_sub(extension.chars().count() + 1)
                .max(1);
            format!("{}.{extension}", sanitize_with_limit(stem, limit))
        }
        (name, None) => sanitize_segment(name),
    }
}

/// Split a filename into stem and extension.
///
/// Works on the plain string so titles containing slashes are not
/// mistaken for nested paths. An extension must be non-empty, free of
/// whitespace and reserved characters, and short enough to leave room
/// for a one-character stem within [`MAX_SEGMENT_LENGTH`].
#[must_use]
pub fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rsplit_once('.') {
        Some((stem, extension))
            if !stem.is_empty()
                && !extension.is_empty()
                && extension.chars().count() + 2 <= MAX_SEGMENT_LENGTH
                && !extension.chars().any(|c| c.is_whitespace() || is_reserved_char(c)) =>
        {
            (stem, Some(extension))
        }
        _ => (file_name, None),
    }
}

fn sanitize_with_limit(name: &str, limit: usize) -> String {
    let replaced: String = name.chars().map(|c| if is_reserved_char(c) { ' ' } else { c }).collect();
    let collapsed = collapse_whitespace(&replaced);
    let trimmed = trim_trailing_dots_and_spaces(&collapsed);

    let capped = if trimmed.chars().count() > limit {
        let truncated: String = trimmed.chars().take(limit).collect();
        trim_trailing_dots_and_spaces(&truncated).to_string()
    } else {
        trimmed.to_string()
    };

    if capped.is_empty() {
        UNKNOWN_SEGMENT.to_string()
    } else {
        capped
    }
}

fn trim_trailing_dots_and_spaces(name: &str) -> &str {
    name.trim_end_matches(['.', ' '])
}
