//! Persistent user configuration (`~/.relaise/config.yaml`).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::llm::Provider;

const CONFIG_DIR: &str = ".relaise";
const CONFIG_FILE: &str = "config.yaml";

/// Kind of release the notes are written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
}

impl ReleaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Major => "major",
            ReleaseType::Minor => "minor",
            ReleaseType::Patch => "patch",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User settings for provider access and release note formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub provider: Provider,
    pub model: String,
    /// Overrides the provider's default endpoint (self-hosted or proxy).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub mood: String,
    pub release_type: ReleaseType,
    pub bullet_style: String,
    pub include_sections: bool,
    pub language: String,
    pub emojis: bool,
    pub copy: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            provider: Provider::Mistral,
            model: "mistral-small-latest".to_string(),
            base_url: None,
            mood: "professional".to_string(),
            release_type: ReleaseType::Minor,
            bullet_style: "-".to_string(),
            include_sections: false,
            language: "en".to_string(),
            emojis: false,
            copy: false,
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load configuration from `path`.
    ///
    /// A missing file is [`ConfigError::NotFound`]; fields absent from the
    /// file take their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // An empty file deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_yaml::to_string(self).map_err(ConfigError::Serialize)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Fail early when the selected provider needs a key and none is set.
    pub fn require_api_key(&self) -> Result<(), ConfigError> {
        if self.provider.requires_api_key() && self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

/// Settings explicitly given on the command line.
///
/// Every field is optional; only the ones that are set replace the loaded
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub mood: Option<String>,
    pub release_type: Option<ReleaseType>,
    pub bullet_style: Option<String>,
    pub include_sections: Option<bool>,
    pub language: Option<String>,
    pub emojis: Option<bool>,
    pub copy: Option<bool>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = Some(base_url);
        }
        if let Some(mood) = self.mood {
            config.mood = mood;
        }
        if let Some(release_type) = self.release_type {
            config.release_type = release_type;
        }
        if let Some(bullet_style) = self.bullet_style {
            config.bullet_style = bullet_style;
        }
        if let Some(include_sections) = self.include_sections {
            config.include_sections = include_sections;
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(emojis) = self.emojis {
            config.emojis = emojis;
        }
        if let Some(copy) = self.copy {
            config.copy = copy;
        }
    }
}
