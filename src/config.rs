//! Host configuration, loaded from a TOML file.
//!
//! ```toml
//! [zotero]
//! library_type = "user"
//! library_id = "123456"
//!
//! [search]
//! max_results = 10
//!
//! [search.strategies]
//! recent = true
//!
//! [output]
//! include_abstracts = false
//! ```

use std::path::{Path, PathBuf};

use biblio_search::{FormatOptions, SearchConfig, ZoteroConfig};
use serde::{Deserialize, Serialize};

use crate::error::{BiblioError, Result};

/// How results are rendered for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub include_abstracts: bool,
    pub max_abstract_length: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let options = FormatOptions::default();
        Self {
            include_abstracts: options.include_abstracts,
            max_abstract_length: options.max_abstract_length,
        }
    }
}

impl From<OutputConfig> for FormatOptions {
    fn from(config: OutputConfig) -> Self {
        Self {
            include_abstracts: config.include_abstracts,
            max_abstract_length: config.max_abstract_length,
        }
    }
}

/// Top-level configuration for the biblio host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub zotero: ZoteroConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BiblioError::Config(e.to_string()))
    }

    /// Load from `path` if given, else from the default path when it exists,
    /// else fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Self::default_config_path();
                if default.exists() {
                    Self::from_file(&default)
                } else {
                    tracing::debug!(path = %default.display(), "no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| BiblioError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `config_dir()/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::biblio_dirs::config_file()
    }

    /// Check both the backend and the search sections.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        self.zotero.validate()?;
        self.search.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_search::LibraryType;

    #[test]
    fn default_output_matches_format_defaults() {
        let options: FormatOptions = OutputConfig::default().into();
        assert_eq!(options, FormatOptions::default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [zotero]
            library_type = "group"
            library_id = "42"

            [search]
            max_results = 5
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.zotero.library_type, LibraryType::Group);
        assert_eq!(config.zotero.library_id, "42");
        assert_eq!(config.zotero.base_url, "https://api.zotero.org");
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.per_strategy_limit, 50);
        assert!(config.output.include_abstracts);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.zotero.library_id = "7".into();
        config.search.max_results = 3;
        config.search.strategies.recent = true;
        config.output.max_abstract_length = 80;
        config.save_to_file(&path).expect("save");

        let loaded = AppConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = AppConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(BiblioError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");
        assert!(matches!(AppConfig::from_file(&path), Err(BiblioError::Config(_))));
    }

    #[test]
    fn load_with_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nmax_results = 9\n").expect("write");
        let config = AppConfig::load(Some(&path)).expect("load");
        assert_eq!(config.search.max_results, 9);
    }

    #[test]
    fn validate_rejects_missing_library_id() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(matches!(err, BiblioError::Search(_)));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = AppConfig::default_config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
