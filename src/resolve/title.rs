//! Final title cleanup once the year is known.

use regex::Regex;

use crate::resolve::normalize::collapse_whitespace;

/// Placeholder title for names that did not yield anything usable.
pub const UNKNOWN_MOVIE: &str = "Unknown Movie";

/// Resolved movie title and optional year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieTitle {
    pub title: String,
    pub year: Option<String>,
}

impl MovieTitle {
    /// Title used when nothing could be resolved.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            title: UNKNOWN_MOVIE.to_string(),
            year: None,
        }
    }

    /// True if this is the placeholder title.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.title == UNKNOWN_MOVIE
    }
}

/// Remove the year from a normalized name to get the display title.
///
/// The year token is removed with the first pattern that actually changes the name:
/// `(year)`, `[year]`, year at the end, then year anywhere.
/// A name that ends up empty becomes [`UNKNOWN_MOVIE`] and the year is dropped.
#[must_use]
pub fn finalize_title(normalized: &str, year: Option<&str>) -> MovieTitle {
    let title = year.map_or_else(|| collapse_whitespace(normalized), |year| remove_year(normalized, year));

    if title.is_empty() {
        MovieTitle::unknown()
    } else {
        MovieTitle {
            title,
            year: year.map(str::to_string),
        }
    }
}

fn remove_year(name: &str, year: &str) -> String {
    let year = regex::escape(year);
    let cascade = [
        format!(r"\({year}\)"),
        format!(r"\[{year}\]"),
        format!(r"\b{year}\s*$"),
        format!(r"\b{year}\b"),
    ];

    for pattern in &cascade {
        let Ok(regex) = Regex::new(pattern) else {
            continue;
        };
        let removed = regex.replace_all(name, " ");
        if removed != name {
            return collapse_whitespace(&removed);
        }
    }

    collapse_whitespace(name)
}

#[cfg(test)]
mod title_tests {
    use super::*;

    #[test]
    fn removes_parenthesized_year() {
        let result = finalize_title("Heat (1995)", Some("1995"));
        assert_eq!(result.title, "Heat");
        assert_eq!(result.year.as_deref(), Some("1995"));
    }

    #[test]
    fn removes_trailing_year() {
        assert_eq!(finalize_title("The Matrix 1999", Some("1999")).title, "The Matrix");
    }

    #[test]
    fn removes_year_in_the_middle() {
        assert_eq!(finalize_title("Alien 1979 Directors", Some("1979")).title, "Alien Directors");
    }

    #[test]
    fn parenthesized_form_is_removed_before_bare_form() {
        // Only the first pattern that changes the name is applied
        assert_eq!(finalize_title("1917 (1917)", Some("1917")).title, "1917");
    }

    #[test]
    fn no_year_keeps_name() {
        let result = finalize_title("Some Random Rip", None);
        assert_eq!(result.title, "Some Random Rip");
        assert_eq!(result.year, None);
    }

    #[test]
    fn year_only_name_becomes_unknown() {
        let result = finalize_title("(2004)", Some("2004"));
        assert!(result.is_unknown());
        assert_eq!(result.year, None);
    }

    #[test]
    fn empty_name_becomes_unknown() {
        assert_eq!(finalize_title("   ", None), MovieTitle::unknown());
    }

    #[test]
    fn year_not_in_name_keeps_name() {
        let result = finalize_title("Movie", Some("1968"));
        assert_eq!(result.title, "Movie");
        assert_eq!(result.year.as_deref(), Some("1968"));
    }
}
