use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const SETTINGS_DIR: &str = "aidigest";
const SETTINGS_FILENAME: &str = "settings.json";

/// Persisted user preferences. Loading never fails: any missing or corrupt
/// settings file silently falls back to defaults, and save failures are
/// logged and swallowed by callers. These preferences are advisory and must
/// never fail a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    pub last_input_directory: String,
    pub custom_ignore_patterns: Vec<String>,
    pub use_default_ignores: bool,
    pub strip_whitespace: bool,
    /// Ecosystem name -> whether its suggested ignore patterns are applied.
    /// Unlisted ecosystems default to enabled.
    pub language_preferences: HashMap<String, bool>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            last_input_directory: String::new(),
            custom_ignore_patterns: Vec::new(),
            use_default_ignores: true,
            strip_whitespace: false,
            language_preferences: HashMap::new(),
        }
    }
}

impl UserSettings {
    pub fn language_enabled(&self, name: &str) -> bool {
        self.language_preferences.get(name).copied().unwrap_or(true)
    }
}

fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILENAME))
}

pub fn load_settings() -> UserSettings {
    let Some(path) = settings_path() else {
        log::debug!("No config directory available; using default settings.");
        return UserSettings::default();
    };
    match fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(settings) => {
                log::debug!("Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!(
                    "Ignoring unparsable settings file {}: {}",
                    path.display(),
                    e
                );
                UserSettings::default()
            }
        },
        Err(e) => {
            log::debug!("No settings at {} ({}); using defaults.", path.display(), e);
            UserSettings::default()
        }
    }
}

pub fn save_settings(settings: &UserSettings) -> anyhow::Result<()> {
    let path = settings_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine standard config directory."))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(settings)?;
    fs::write(&path, raw)?;
    log::debug!("Settings saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_default_ignores() {
        let settings = UserSettings::default();
        assert!(settings.use_default_ignores);
        assert!(!settings.strip_whitespace);
        assert!(settings.custom_ignore_patterns.is_empty());
    }

    #[test]
    fn unlisted_languages_are_enabled() {
        let mut settings = UserSettings::default();
        assert!(settings.language_enabled("Python"));
        settings
            .language_preferences
            .insert("Python".to_string(), false);
        assert!(!settings.language_enabled("Python"));
    }

    #[test]
    fn partial_settings_json_fills_in_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"stripWhitespace": true}"#).unwrap();
        assert!(settings.strip_whitespace);
        assert!(settings.use_default_ignores);
    }
}
