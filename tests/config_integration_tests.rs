//! Integration tests for config loading from fixture files.

use std::fs;
use std::path::Path;

use media_shelf::config::ShelveConfig;

const SAMPLE_CONFIG: &str = "tests/fixtures/sample_config.toml";

/// Read the sample config file content.
fn read_sample_config() -> String {
    fs::read_to_string(SAMPLE_CONFIG).expect("Failed to read sample config file")
}

#[test]
fn sample_config_file_exists() {
    assert!(Path::new(SAMPLE_CONFIG).exists(), "Sample config file should exist");
}

#[test]
fn sample_config_is_valid_toml() {
    let result: Result<toml::Value, _> = toml::from_str(&read_sample_config());
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn sample_config_has_shelve_section() {
    let value: toml::Value = toml::from_str(&read_sample_config()).expect("should parse");
    let shelve = value.get("shelve").expect("should have shelve section");

    for key in [
        "destination",
        "extensions",
        "extra_tags",
        "recurse",
        "auto",
        "dryrun",
        "verbose",
        "debug",
        "overwrite",
        "max_retries",
        "initial_backoff_ms",
        "chunk_size",
        "log",
    ] {
        assert!(shelve.get(key).is_some(), "shelve section should have key {key}");
    }
}

#[test]
fn sample_config_parses_into_shelve_config() {
    let config = ShelveConfig::from_toml_str(&read_sample_config()).expect("should parse");

    assert_eq!(config.destination.as_deref(), Some("/mnt/media/Movies"));
    assert_eq!(config.extensions, vec!["mkv", "mp4", "avi", "iso"]);
    assert_eq!(config.extra_tags, vec!["FGT", "EVO", "SPARKS"]);
    assert!(config.recurse);
    assert!(config.verbose);
    assert!(!config.auto);
    assert_eq!(config.overwrite, Some(false));
    assert_eq!(config.max_retries, Some(5));
    assert_eq!(config.initial_backoff_ms, Some(500));
    assert_eq!(config.chunk_size, Some(131_072));
    assert!(config.log);
}

#[test]
fn sample_config_loads_from_file() {
    let config = ShelveConfig::from_file(Path::new(SAMPLE_CONFIG)).expect("should load");
    assert_eq!(config, ShelveConfig::from_toml_str(&read_sample_config()).expect("should parse"));
}
