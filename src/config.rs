//! User config file for `shelve`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;
use serde::Deserialize;

const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

/// Path to the user config file: `$HOME/.config/media-shelf.toml`
///
/// Returns `None` if the home directory cannot be determined.
pub static CONFIG_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let home_dir = dirs::home_dir()?;
    Some(home_dir.join(".config").join(format!("{PROJECT_NAME}.toml")))
});

/// Config from the `[shelve]` section of the user config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShelveConfig {
    #[serde(default)]
    pub auto: bool,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub dryrun: bool,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub extra_tags: Vec<String>,
    #[serde(default)]
    pub initial_backoff_ms: Option<u64>,
    #[serde(default = "default_true")]
    pub log: bool,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub movies_only: bool,
    #[serde(default)]
    pub overwrite: Option<bool>,
    #[serde(default)]
    pub recurse: bool,
    #[serde(default)]
    pub verbose: bool,
}

/// Wrapper needed for parsing the config section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    shelve: ShelveConfig,
}

impl Default for ShelveConfig {
    fn default() -> Self {
        Self {
            auto: false,
            chunk_size: None,
            debug: false,
            destination: None,
            dryrun: false,
            extensions: Vec::new(),
            extra_tags: Vec::new(),
            initial_backoff_ms: None,
            log: true,
            max_retries: None,
            movies_only: false,
            overwrite: None,
            recurse: false,
            verbose: false,
        }
    }
}

impl ShelveConfig {
    /// Read the user config file if it exists, otherwise use defaults.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn get_user_config() -> anyhow::Result<Self> {
        match CONFIG_PATH.as_deref() {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Read config from the given file. A missing file gives the default config.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.shelve)
            .with_context(|| "Failed to parse config TOML")
    }
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod shelve_config_tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn from_toml_str_parses_empty_config() {
        let config = ShelveConfig::from_toml_str("").unwrap();
        assert_eq!(config.destination, None);
        assert!(config.extensions.is_empty());
        assert!(config.log);
        assert!(!config.auto);
    }

    #[test]
    fn from_toml_str_parses_shelve_section() {
        let toml = r#"
[shelve]
destination = "/media/movies"
extensions = ["mkv", "iso"]
extra_tags = ["FGT"]
recurse = true
max_retries = 5
initial_backoff_ms = 250
overwrite = false
log = false
"#;
        let config = ShelveConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.destination.as_deref(), Some("/media/movies"));
        assert_eq!(config.extensions, vec!["mkv", "iso"]);
        assert_eq!(config.extra_tags, vec!["FGT"]);
        assert!(config.recurse);
        assert_eq!(config.max_retries, Some(5));
        assert_eq!(config.initial_backoff_ms, Some(250));
        assert_eq!(config.overwrite, Some(false));
        assert!(!config.log);
    }

    #[test]
    fn other_sections_are_ignored() {
        let toml = r"
[other_tool]
verbose = true

[shelve]
verbose = false
";
        let config = ShelveConfig::from_toml_str(toml).unwrap();
        assert!(!config.verbose);
    }

    #[test]
    fn from_toml_str_rejects_wrong_type() {
        assert!(ShelveConfig::from_toml_str("[shelve]\nrecurse = \"yes\"").is_err());
    }

    #[test]
    fn missing_file_gives_default() {
        let dir = tempdir().unwrap();
        let config = ShelveConfig::from_file(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, ShelveConfig::from_toml_str("").unwrap());
    }

    #[test]
    fn invalid_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[shelve\n").unwrap();
        assert!(ShelveConfig::from_file(&path).is_err());
    }
}
