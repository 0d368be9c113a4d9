//! Resolution behaviour through the public library API.

use std::path::{Component, Path, PathBuf};

use media_shelf::resolve::destination::{resolve_destination, shelf_letter};
use media_shelf::resolve::sanitize::{MAX_SEGMENT_LENGTH, is_reserved_char, sanitize_file_name, sanitize_segment};
use media_shelf::resolve::tags::DEFAULT_TAGS;
use media_shelf::resolve::{MediaInfo, Resolver, TagDictionary, UNKNOWN_MOVIE, parse_movie};

const NASTY_NAMES: [&str; 16] = [
    "",
    "   ",
    "...",
    "The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv",
    "What?.If:.2021.<Director's Cut>.mkv",
    "AC/DC: Live at Donington (1992).mp4",
    "a|b|c*d\"e.avi",
    "The.Lord.of.the.Rings.The.Fellowship.of.the.Ring.Extended.Edition.Remastered.Directors.Cut.Special.Collectors.Ultimate.2001.2160p.UHD.BluRay.x265.mkv",
    "Show.Name.S02E03.720p.HDTV.x264.mkv",
    "[Group] Anime Title - 05 [1080p].mkv",
    "1080p.x264.mkv",
    "trailing dots....mkv",
    "\u{1}\u{2}control.mkv",
    "Ünïcödé Fïlm (2003).mkv",
    "Movie.xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
    "Heat.1995.eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
];

fn root() -> PathBuf {
    PathBuf::from("/movies")
}

fn segments(path: &Path) -> Vec<String> {
    path.strip_prefix(root())
        .unwrap()
        .components()
        .map(|component| match component {
            Component::Normal(segment) => segment.to_string_lossy().to_string(),
            other => panic!("unexpected path component {other:?}"),
        })
        .collect()
}

#[test]
fn resolution_is_deterministic() {
    let resolver = Resolver::new(root(), TagDictionary::default());
    for name in NASTY_NAMES {
        assert_eq!(resolver.resolve(name), resolver.resolve(name), "input: {name:?}");
    }
}

#[test]
fn every_segment_is_safe() {
    let resolver = Resolver::new(root(), TagDictionary::default());
    for name in NASTY_NAMES {
        let destination = resolver.resolve(name).destination;
        for segment in segments(&destination.path) {
            assert!(!segment.is_empty(), "empty segment for {name:?}");
            assert!(
                segment.chars().count() <= MAX_SEGMENT_LENGTH,
                "segment too long for {name:?}: {segment}"
            );
            assert!(
                !segment.chars().any(is_reserved_char),
                "reserved character for {name:?}: {segment:?}"
            );
            assert!(!segment.ends_with('.') && !segment.ends_with(' '), "{segment:?}");
        }
    }
}

#[test]
fn sanitizers_are_idempotent() {
    for name in NASTY_NAMES {
        let segment = sanitize_segment(name);
        assert_eq!(sanitize_segment(&segment), segment, "input: {name:?}");
        let file_name = sanitize_file_name(name);
        assert_eq!(sanitize_file_name(&file_name), file_name, "input: {name:?}");
    }
}

#[test]
fn parenthesized_year_wins_over_bracketed() {
    let movie = parse_movie("Movie (1999) [2005].mkv", &DEFAULT_TAGS);
    assert_eq!(movie.year.as_deref(), Some("1999"));
}

#[test]
fn empty_file_name_routes_to_unknown() {
    let resolution = Resolver::new(root(), TagDictionary::default()).resolve("");
    match &resolution.info {
        MediaInfo::Movie(movie) => assert_eq!(movie.title, UNKNOWN_MOVIE),
        MediaInfo::Episode(_) => panic!("empty name should not be an episode"),
    }
    assert!(resolution.destination.path.starts_with(root().join("Unknown")));
}

#[test]
fn leading_article_is_shelved_by_remainder() {
    let destination = resolve_destination(Some("The Matrix"), Some("1999"), "the.matrix.mkv", &root());
    assert_eq!(destination.shelf, "M");
    assert_eq!(
        destination.path,
        root().join("M").join("The Matrix (1999)").join("The Matrix (1999).mkv")
    );
    assert_eq!(shelf_letter("An Education").unwrap(), "E");
}

#[test]
fn scene_tags_are_stripped() {
    let movie = parse_movie("The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv", &DEFAULT_TAGS);
    assert_eq!(movie.title, "The Matrix");
    assert_eq!(movie.year.as_deref(), Some("1999"));
}

#[test]
fn undated_movie_has_plain_folder() {
    let resolution = Resolver::new(root(), TagDictionary::default()).resolve("Some.Random.Rip.mkv");
    assert_eq!(resolution.destination.folder, "Some Random Rip");
    assert_eq!(resolution.destination.file_name, "Some Random Rip.mkv");
}

#[test]
fn extra_tags_are_stripped() {
    let tags = TagDictionary::with_extra_tags(&["FGT".to_string()]);
    let movie = parse_movie("Heat.1995.1080p.FGT.mkv", &tags);
    assert_eq!(movie.title, "Heat");
    assert_eq!(movie.year.as_deref(), Some("1995"));
}

#[test]
fn episode_destination_layout() {
    let resolution = Resolver::new(root(), TagDictionary::default()).resolve("Show.Name.S02E03.720p.HDTV.x264.mkv");
    assert_eq!(
        resolution.destination.path,
        root()
            .join("S")
            .join("Show Name")
            .join("Season 02")
            .join("Show Name - S02E03.mkv")
    );
}
