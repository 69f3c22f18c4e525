//! Configuration management for gfmd.
//!
//! Parses `gfmd.toml` with serde and discovers the file in the current
//! directory or its parents. CLI settings are applied on top during load via
//! [`CliSettings`].
//!
//! ```toml
//! [kroki]
//! url = "${KROKI_URL:-https://kroki.io}"
//!
//! [diagrams]
//! languages = ["mermaid", "plantuml"]
//! wrap_bare_fences = false
//! ```
//!
//! `kroki.url` supports `${VAR}` and `${VAR:-default}` expansion.

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use gfmd_diagrams::{DEFAULT_KROKI_URL, MarkupLanguage, PreprocessorConfig, SUPPORTED_LANGUAGES};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "gfmd.toml";

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Kroki server URL.
    pub kroki_url: Option<String>,
    /// Override bare fence wrapping.
    pub wrap_bare_fences: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Kroki server configuration.
    pub kroki: KrokiConfig,
    /// Diagram detection configuration.
    pub diagrams: DiagramsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Kroki server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KrokiConfig {
    /// Server URL used in generated image links.
    pub url: String,
}

impl Default for KrokiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_KROKI_URL.to_owned(),
        }
    }
}

/// Diagram detection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Recognized languages in first-match-wins order.
    pub languages: Vec<MarkupLanguage>,
    /// Wrap bare diagram fences into new regions.
    pub wrap_bare_fences: bool,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            languages: SUPPORTED_LANGUAGES.to_vec(),
            wrap_bare_fences: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`kroki.url`").
        field: String,
        /// Error message (e.g., "${`KROKI_URL`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// Loads `config_path` when given, otherwise searches for `gfmd.toml` in the
    /// current directory and its parents, falling back to defaults. CLI settings
    /// take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Settings for the document preprocessor.
    #[must_use]
    pub fn preprocessor_config(&self) -> PreprocessorConfig {
        PreprocessorConfig {
            kroki_url: self.kroki.url.clone(),
            languages: self.diagrams.languages.clone(),
            wrap_bare_fences: self.diagrams.wrap_bare_fences,
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any check fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.kroki.url;
        if url.is_empty() {
            return Err(ConfigError::Validation(
                "kroki.url cannot be empty".to_owned(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "kroki.url must start with http:// or https://".to_owned(),
            ));
        }

        let languages = &self.diagrams.languages;
        if languages.is_empty() {
            return Err(ConfigError::Validation(
                "diagrams.languages cannot be empty".to_owned(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = languages.iter().find(|language| !seen.insert(**language)) {
            return Err(ConfigError::Validation(format!(
                "diagrams.languages lists '{duplicate}' more than once"
            )));
        }

        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(kroki_url) = &settings.kroki_url {
            self.kroki.url.clone_from(kroki_url);
        }
        if let Some(wrap) = settings.wrap_bare_fences {
            self.diagrams.wrap_bare_fences = wrap;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.kroki.url = expand::expand_env(&config.kroki.url, "kroki.url")?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }
}
