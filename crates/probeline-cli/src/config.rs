//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for probeline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// `IDENTIFIER<TAB>LOCATOR` input list
    #[serde(deserialize_with = "deserialize_env_path")]
    pub input: PathBuf,
    /// JSON Lines record store
    #[serde(deserialize_with = "deserialize_env_path")]
    pub store: PathBuf,
    #[serde(deserialize_with = "deserialize_env_path")]
    pub error_log: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.txt"),
            store: PathBuf::from("database.json"),
            error_log: PathBuf::from("errorlog.log"),
        }
    }
}

impl PathsConfig {
    /// Replace configured paths with the ones given on the command line.
    pub fn with_overrides(
        &self,
        input: Option<PathBuf>,
        store: Option<PathBuf>,
        error_log: Option<PathBuf>,
    ) -> Self {
        Self {
            input: input.unwrap_or_else(|| self.input.clone()),
            store: store.unwrap_or_else(|| self.store.clone()),
            error_log: error_log.unwrap_or_else(|| self.error_log.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    #[serde(deserialize_with = "deserialize_env_path")]
    pub ffprobe: PathBuf,
    /// Passed to ffprobe before the input
    pub extra_args: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe: PathBuf::from("ffprobe"),
            extra_args: Vec::new(),
        }
    }
}

/// Deserialize a path that may be an environment variable reference like ${VAR}
fn deserialize_env_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    expand_env_var(&s)
        .map(PathBuf::from)
        .ok_or_else(|| serde::de::Error::custom(format!("environment variable in {s} is not set")))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./probeline.toml (current directory)
    /// 2. ~/.config/probeline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("probeline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "probeline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
