use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use notewise_domain::{ClefMode, KeyboardRange};
use notewise_tutor::SessionConfig;

/// Trainer preferences persisted between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainerSettings {
    pub session_length: Option<usize>,
    pub clef_mode: Option<ClefMode>,
    /// Calibrated keyboard range.
    pub range: Option<KeyboardRange>,
    pub midi_device: Option<String>,
}

pub fn settings_path() -> Option<PathBuf> {
    let base = dirs::config_dir()?;
    Some(base.join("notewise").join("settings.json"))
}

impl TrainerSettings {
    pub fn load() -> Result<Self> {
        let path = settings_path().ok_or_else(|| anyhow!("no config dir"))?;
        if !path.exists() {
            debug!(path = ?path, "no settings file, using defaults");
            return Ok(Self::default());
        }
        let data =
            fs::read_to_string(&path).with_context(|| format!("read settings {:?}", path))?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = settings_path().ok_or_else(|| anyhow!("no config dir"))?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        info!(path = ?path, "settings saved");
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        SessionConfig {
            length: self.session_length.unwrap_or(defaults.length),
            clef_mode: self.clef_mode.unwrap_or(defaults.clef_mode),
            range: self.range.or(defaults.range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_use_session_defaults() {
        let settings: TrainerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.session_config(), SessionConfig::default());
    }

    #[test]
    fn stored_fields_override_defaults() {
        let settings: TrainerSettings = serde_json::from_str(
            r#"{"session_length": 3, "clef_mode": "Bass", "range": {"min": 36, "max": 84}}"#,
        )
        .unwrap();
        let config = settings.session_config();
        assert_eq!(config.length, 3);
        assert_eq!(config.clef_mode, ClefMode::Bass);
        assert_eq!(config.range, Some(KeyboardRange::new(36, 84).unwrap()));
    }

    #[test]
    fn invalid_range_is_rejected() {
        let result =
            serde_json::from_str::<TrainerSettings>(r#"{"range": {"min": 90, "max": 30}}"#);
        assert!(result.is_err());
    }
}
