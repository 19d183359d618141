use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::l10n::L10nOverrides;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidenav";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l10n: Option<L10nOverrides>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_mode: Option<String>,

    /// Show segment titles in a popup on pointer hover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<bool>,

    /// Offer printing even when the deck does not ask for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print: Option<bool>,
}

/// Where the player opens a deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartMode {
    #[default]
    First,
    Resume,
    /// 1-indexed slide number.
    Slide(usize),
}

impl StartMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "first" => Some(Self::First),
            "resume" => Some(Self::Resume),
            n => n.parse::<usize>().ok().filter(|n| *n > 0).map(Self::Slide),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid value for {key}: {value}. Must be 'true' or 'false'."),
    }
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
                anyhow::anyhow!("No config found. Run `slidenav config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# slidenav configuration\n{yaml}");
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn theme(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("light")
    }

    pub fn start_mode(&self) -> StartMode {
        self.defaults
            .as_ref()
            .and_then(|d| d.start_mode.as_deref())
            .and_then(StartMode::parse)
            .unwrap_or_default()
    }

    pub fn hover(&self) -> bool {
        self.defaults.as_ref().and_then(|d| d.hover).unwrap_or(true)
    }

    pub fn print(&self) -> bool {
        self.defaults.as_ref().and_then(|d| d.print).unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.start_mode" => {
                if StartMode::parse(value).is_none() {
                    anyhow::bail!(
                        "Invalid start_mode: {value}. Must be 'first', 'resume', or a slide number."
                    );
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_mode = Some(value.to_string());
            }
            "defaults.hover" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .hover = Some(parse_bool(key, value)?);
            }
            "defaults.print" => {
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .print = Some(parse_bool(key, value)?);
            }
            _ => {
                let Some(field) = key.strip_prefix("l10n.") else {
                    anyhow::bail!(
                        "Unknown config key: {key}. Valid keys: defaults.theme, defaults.start_mode, defaults.hover, defaults.print, l10n.<label>"
                    );
                };
                let overrides = self.l10n.get_or_insert_with(L10nOverrides::default);
                if !overrides.set(field, value) {
                    anyhow::bail!("Unknown label: {field}");
                }
            }
        }
        Ok(())
    }
}
