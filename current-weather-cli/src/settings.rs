use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings stored on disk between runs.
///
/// Example TOML:
/// api_key = "..."
/// timeout_secs = 10
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,

    /// Overrides the public endpoint, e.g. for a local proxy.
    pub base_url: Option<String>,

    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Settings {
    /// Pick the API key: an explicit override wins over the stored one.
    pub fn resolve_api_key(&self, explicit: Option<String>) -> Result<String> {
        explicit
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `weather configure` or pass `--api-key <KEY>`."
                )
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Load settings from disk, or return an empty default if they don't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: nothing saved yet.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Save settings to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::settings_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))
    }

    pub fn settings_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "current-weather", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("settings.toml"))
    }
}
