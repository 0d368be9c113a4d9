//! Known scene-release tokens that are stripped from filenames.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

/// Video quality and resolution markers.
const QUALITY_TAGS: &[&str] = &[
    "2160p", "1440p", "1080p", "1080i", "720p", "576p", "480p", "360p", "4K", "UHD", "FHD", "HDR", "HDR10", "HDR10Plus",
    "DoVi", "SDR", "10bit", "8bit", "60fps",
];

/// Video codecs and containers.
const CODEC_TAGS: &[&str] = &[
    "x264", "x265", "h264", "h265", "H 264", "H 265", "HEVC", "AVC", "XviD", "DivX", "VC1", "AV1", "MPEG2", "MKV", "MP4",
    "AVI",
];

/// Audio codecs and channel layouts.
const AUDIO_TAGS: &[&str] = &[
    "AAC", "AAC2 0", "AAC5 1", "AC3", "EAC3", "DD2 0", "DD5 1", "DDP", "DDP2 0", "DDP5 1", "DDP7 1", "DTS",
    "DTS HD", "DTS HD MA", "DTS X", "TrueHD", "Atmos", "FLAC", "MP3", "Opus", "LPCM",
];

/// Rip source markers.
const SOURCE_TAGS: &[&str] = &[
    "BluRay", "Blu Ray", "BRRip", "BDRip", "BDRemux", "Remux", "DVDRip", "DVDScr", "DVD", "HDRip", "HDTV", "PDTV",
    "WEBRip", "WEB DL", "WEBDL", "WEB", "AMZN", "DSNP", "HMAX", "ATVP", "HDCAM", "TELESYNC", "HDTS",
];

/// Edition and release flags.
const EDITION_TAGS: &[&str] = &[
    "Extended", "Extended Cut", "Unrated", "Uncut", "Directors Cut", "Theatrical", "Remastered", "IMAX", "PROPER",
    "REPACK", "RERIP", "LIMITED", "INTERNAL", "READNFO", "DUBBED", "SUBBED", "MULTi", "iNTERNAL",
];

/// Well-known release groups.
const GROUP_TAGS: &[&str] = &[
    "YIFY", "YTS", "YTS MX", "YTS AG", "RARBG", "EVO", "ETRG", "FGT", "SPARKS", "GECKOS", "AMIABLE", "DRONES", "NTb",
    "CMRG", "TGx", "PSA", "ION10", "MeGusta", "GalaxyRG", "Tigole", "QxR", "FLUX", "KOGi", "NOGRP", "GROUP",
];

/// Dictionary built from the built-in token lists only.
pub static DEFAULT_TAGS: LazyLock<TagDictionary> = LazyLock::new(TagDictionary::default);

/// Case-insensitive whole-word matcher for release tokens.
#[derive(Debug, Clone)]
pub struct TagDictionary {
    tokens: Vec<String>,
    pattern: Regex,
}

impl TagDictionary {
    /// Build a dictionary from the built-in lists plus the given extra tokens.
    ///
    /// Extra tokens go through the same separator replacement as filenames,
    /// so `WEB-DL` and `WEB DL` are equivalent.
    #[must_use]
    pub fn with_extra_tags(extra: &[String]) -> Self {
        let tokens: Vec<String> = builtin_tags()
            .map(str::to_string)
            .chain(extra.iter().map(|tag| super::normalize::replace_separators(tag).trim().to_string()))
            .filter(|tag| !tag.is_empty())
            .unique_by(|tag| tag.to_lowercase())
            .collect();

        let pattern = Self::compile(&tokens);
        Self { tokens, pattern }
    }

    /// Remove every dictionary token from the given text.
    /// Leaves the surrounding whitespace in place.
    #[must_use]
    pub fn strip(&self, text: &str) -> String {
        self.pattern.replace_all(text, " ").into_owned()
    }

    /// True if the text contains at least one dictionary token.
    #[must_use]
    pub fn contains_tag(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Check if a single token is in the dictionary.
    #[must_use]
    pub fn is_tag(&self, token: &str) -> bool {
        self.tokens.iter().any(|tag| tag.eq_ignore_ascii_case(token))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn compile(tokens: &[String]) -> Regex {
        // Longest first so multi-word tokens win over their single-word prefixes.
        let alternation = tokens
            .iter()
            .sorted_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)))
            .map(|tag| regex::escape(tag).replace(' ', r"\s+"))
            .join("|");

        Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("Failed to compile tag dictionary regex")
    }
}

impl Default for TagDictionary {
    fn default() -> Self {
        Self::with_extra_tags(&[])
    }
}

fn builtin_tags() -> impl Iterator<Item = &'static str> {
    QUALITY_TAGS
        .iter()
        .chain(CODEC_TAGS)
        .chain(AUDIO_TAGS)
        .chain(SOURCE_TAGS)
        .chain(EDITION_TAGS)
        .chain(GROUP_TAGS)
        .copied()
}
