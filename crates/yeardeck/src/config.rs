use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::show::autoplay::MIN_INTERVAL;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "yeardeck";

pub const KEYS: &[&str] = &[
    "defaults.theme",
    "defaults.autoplay_secs",
    "defaults.start_paused",
    "audio.player",
    "audio.args",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_paused: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Program used to play the background track, e.g. `ffplay` or `mpv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,

    /// Arguments passed before the track path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `yeardeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Missing or unreadable configs fall back to defaults.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("using default config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# yeardeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    pub fn autoplay_secs(&self) -> Option<u64> {
        self.defaults.as_ref().and_then(|d| d.autoplay_secs)
    }

    pub fn start_paused(&self) -> Option<bool> {
        self.defaults.as_ref().and_then(|d| d.start_paused)
    }

    pub fn player(&self) -> Option<&str> {
        self.audio.as_ref().and_then(|a| a.player.as_deref())
    }

    pub fn player_args(&self) -> Option<&[String]> {
        self.audio.as_ref().and_then(|a| a.args.as_deref())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "winter" | "light" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'winter' or 'light'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.autoplay_secs" => {
                let secs: u64 = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid autoplay_secs: {value}. Must be a whole number of seconds.")
                })?;
                if secs < MIN_INTERVAL.as_secs() {
                    anyhow::bail!(
                        "Invalid autoplay_secs: {value}. Must be at least {}.",
                        MIN_INTERVAL.as_secs()
                    );
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .autoplay_secs = Some(secs);
            }
            "defaults.start_paused" => {
                let paused = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!("Invalid start_paused: {value}. Must be 'true' or 'false'."),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_paused = Some(paused);
            }
            "audio.player" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Invalid player: must not be empty.");
                }
                self.audio.get_or_insert_with(AudioConfig::default).player =
                    Some(value.to_string());
            }
            "audio.args" => {
                let args: Vec<String> = value.split_whitespace().map(str::to_string).collect();
                self.audio.get_or_insert_with(AudioConfig::default).args = Some(args);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }
}
