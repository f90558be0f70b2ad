use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the settings file inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Text service settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Model identifier sent with every request.
    pub model: String,
    /// Base URL of the Gemini API.
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    pub fn new(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// Manager for `settings.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Missing file means defaults; an unreadable one is logged and also means defaults.
    pub fn load(&self) -> Settings {
        if !self.settings_path.exists() {
            return Settings::default();
        }

        let parsed = fs::read_to_string(&self.settings_path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<Settings>(&content).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(settings) => settings,
            Err(reason) => {
                tracing::warn!(
                    path = %self.settings_path.display(),
                    %reason,
                    "ignoring unreadable settings file"
                );
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(settings)?;
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.settings_path, content)
    }
}
