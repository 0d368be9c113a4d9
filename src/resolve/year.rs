//! Release year detection.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

/// Current year, read once on first access.
pub static CURRENT_YEAR: LazyLock<i32> = LazyLock::new(|| chrono::Local::now().year());

/// Earliest year accepted for a bare trailing number.
pub const MIN_YEAR: i32 = 1900;

/// How far in the future a bare trailing number may point.
pub const FUTURE_YEARS: i32 = 5;

static RE_PAREN_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{4})\)").expect("Failed to compile parenthesized year regex"));

static RE_BRACKET_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d{4})\]").expect("Failed to compile bracketed year regex"));

static RE_TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\s*$").expect("Failed to compile trailing year regex"));

static RE_BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("Failed to compile bare year regex"));

/// Find a four digit release year in the given text.
///
/// Patterns are tried in priority order and the first hit wins:
/// `(YYYY)`, `[YYYY]`, a trailing number within the plausible year range,
/// and finally any `19xx` or `20xx` number.
///
/// ```rust
/// use media_shelf::resolve::year::extract_year;
///
/// assert_eq!(extract_year("Movie (1999) [2005]").as_deref(), Some("1999"));
/// assert_eq!(extract_year("Movie 1080"), None);
/// ```
#[must_use]
pub fn extract_year(text: &str) -> Option<String> {
    extract_year_relative_to(text, *CURRENT_YEAR)
}

/// Same as [`extract_year`] but with an explicit reference year for the range check.
#[must_use]
pub fn extract_year_relative_to(text: &str, current_year: i32) -> Option<String> {
    if let Some(year) = first_capture(&RE_PAREN_YEAR, text) {
        return Some(year.to_string());
    }
    if let Some(year) = first_capture(&RE_BRACKET_YEAR, text) {
        return Some(year.to_string());
    }
    if let Some(year) = first_capture(&RE_TRAILING_YEAR, text)
        && year
            .parse::<i32>()
            .is_ok_and(|value| (MIN_YEAR..=current_year + FUTURE_YEARS).contains(&value))
    {
        return Some(year.to_string());
    }
    first_capture(&RE_BARE_YEAR, text).map(str::to_string)
}

fn first_capture<'a>(regex: &Regex, text: &'a str) -> Option<&'a str> {
    regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod year_tests {
    use super::*;

    #[test]
    fn parenthesized_wins_over_bracketed() {
        assert_eq!(extract_year_relative_to("Movie (1999) [2005]", 2026).as_deref(), Some("1999"));
    }

    #[test]
    fn bracketed_wins_over_bare() {
        assert_eq!(extract_year_relative_to("Movie 2001 [1968]", 2026).as_deref(), Some("1968"));
    }

    #[test]
    fn trailing_year_in_range() {
        assert_eq!(extract_year_relative_to("The Matrix 1999", 2026).as_deref(), Some("1999"));
        assert_eq!(extract_year_relative_to("Future 2031", 2026).as_deref(), Some("2031"));
    }

    #[test]
    fn trailing_number_out_of_range_falls_back_to_bare() {
        // 2032 is past the allowed window, but still begins with 20
        assert_eq!(extract_year_relative_to("Movie 2032", 2026).as_deref(), Some("2032"));
        assert_eq!(extract_year_relative_to("Movie 1999 1080", 2026).as_deref(), Some("1999"));
    }

    #[test]
    fn trailing_year_is_preferred_over_earlier_bare_year() {
        assert_eq!(
            extract_year_relative_to("Blade Runner 2049 2017", 2026).as_deref(),
            Some("2017")
        );
    }

    #[test]
    fn bare_year_needs_century_prefix() {
        assert_eq!(extract_year_relative_to("Movie 1080 Cut", 2026), None);
        assert_eq!(extract_year_relative_to("Movie 2160", 2026), None);
    }

    #[test]
    fn year_must_be_whole_number() {
        assert_eq!(extract_year_relative_to("Movie 19999", 2026), None);
        assert_eq!(extract_year_relative_to("Movie 1999p", 2026), None);
    }

    #[test]
    fn no_year() {
        assert_eq!(extract_year("Some Random Rip"), None);
        assert_eq!(extract_year(""), None);
    }
}
