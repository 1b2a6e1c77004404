use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::playback::ClipCache;
use crate::review::DEFAULT_TRANSLATION_SUFFIX;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Derived file naming
    #[serde(default)]
    pub naming: NamingConfig,

    /// Media playback and clip extraction
    #[serde(default)]
    pub playback: PlaybackConfig,
}

/// Naming of derived review artifacts
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NamingConfig {
    /// Suffix of the translation file: `<stem>_<suffix>.srt`
    #[serde(default = "default_translation_suffix")]
    pub translation_suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            translation_suffix: default_translation_suffix(),
        }
    }
}

/// Which external player to launch
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreferredPlayer {
    /// mpv when installed, ffplay otherwise
    #[default]
    Auto,
    Mpv,
    Ffplay,
}

impl std::fmt::Display for PreferredPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Mpv => "mpv",
            Self::Ffplay => "ffplay",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for PreferredPlayer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "mpv" => Ok(Self::Mpv),
            "ffplay" => Ok(Self::Ffplay),
            _ => Err(anyhow!("Invalid player: {}", s)),
        }
    }
}

/// Playback configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub preferred_player: PreferredPlayer,

    /// Container format of extracted clips
    #[serde(default = "default_clip_format")]
    pub clip_format: String,

    /// Upper bound for one ffmpeg extraction
    #[serde(default = "default_extract_timeout_secs")]
    pub extract_timeout_secs: u64,

    /// Clip cache location; the user cache dir when unset
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            preferred_player: PreferredPlayer::default(),
            clip_format: default_clip_format(),
            extract_timeout_secs: default_extract_timeout_secs(),
            cache_dir: None,
        }
    }
}

impl PlaybackConfig {
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(ClipCache::default_dir)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_translation_suffix() -> String {
    DEFAULT_TRANSLATION_SUFFIX.to_string()
}

fn default_clip_format() -> String {
    "mp3".to_string()
}

fn default_extract_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load from `path`, writing the defaults there first when it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            log::info!("Created default configuration at {}", path.display());
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
            }
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let suffix = self.naming.translation_suffix.trim();
        if suffix.is_empty() {
            return Err(anyhow!("naming.translation_suffix must not be empty"));
        }
        if suffix.contains(['/', '\\']) {
            return Err(anyhow!("naming.translation_suffix must not contain path separators"));
        }

        let format = self.playback.clip_format.trim();
        if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow!("Invalid playback.clip_format: '{}'", self.playback.clip_format));
        }

        if self.playback.extract_timeout_secs == 0 {
            return Err(anyhow!("playback.extract_timeout_secs must be greater than zero"));
        }

        Ok(())
    }
}
