//! JSON-backed preferences under the platform config directory.
//!
//! Two files side by side: `prefs.json`, a flat string key-value map for the
//! API key and the generated user id, and `settings.json`, the serialized
//! [`AppSettings`] blob.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use shared::settings::AppSettings;
use uuid::Uuid;

const API_KEY: &str = "api_key";
const USER_ID: &str = "user_id";

pub struct PreferenceStore {
    prefs_path: PathBuf,
    settings_path: PathBuf,
}

impl PreferenceStore {
    /// Store under the platform config dir, creating it if needed.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("com.genesis", "Genesis", "Genesis")
            .context("no home directory available")?;
        fs::create_dir_all(dirs.config_dir())
            .with_context(|| format!("creating {}", dirs.config_dir().display()))?;
        Ok(Self::at(dirs.config_dir()))
    }

    /// Store rooted at an explicit directory.
    pub fn at(dir: &Path) -> Self {
        Self {
            prefs_path: dir.join("prefs.json"),
            settings_path: dir.join("settings.json"),
        }
    }

    fn read_map(&self) -> Map<String, Value> {
        fs::read_to_string(&self.prefs_path)
            .ok()
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
            .and_then(|value| value.as_object().cloned())
            .unwrap_or_default()
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.prefs_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&Value::Object(map.clone()))?;
        fs::write(&self.prefs_path, json)
            .with_context(|| format!("writing {}", self.prefs_path.display()))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read_map()
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map();
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_map(&map)
    }

    pub fn api_key(&self) -> Option<String> {
        self.get(API_KEY)
    }

    pub fn save_api_key(&self, api_key: &str) -> Result<()> {
        self.set(API_KEY, api_key)
    }

    /// The stable per-install id attached to backend requests; generated on
    /// first use and persisted.
    pub fn user_id(&self) -> Result<String> {
        if let Some(id) = self.get(USER_ID) {
            return Ok(id);
        }
        let id = Uuid::new_v4().to_string();
        self.set(USER_ID, &id)?;
        Ok(id)
    }

    /// Load settings, falling back to defaults on a missing or unreadable
    /// file.
    pub fn load_settings(&self) -> AppSettings {
        fs::read_to_string(&self.settings_path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.settings_path, json)
            .with_context(|| format!("writing {}", self.settings_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::at(dir.path());

        assert!(store.api_key().is_none());
        store.save_api_key("sk-test-123").unwrap();
        assert_eq!(store.api_key().as_deref(), Some("sk-test-123"));

        // Overwrite by user action.
        store.save_api_key("sk-test-456").unwrap();
        assert_eq!(store.api_key().as_deref(), Some("sk-test-456"));
    }

    #[test]
    fn user_id_is_created_once_and_then_stable() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::at(dir.path());

        let first = store.user_id().unwrap();
        let second = store.user_id().unwrap();
        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn settings_round_trip_and_default_on_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::at(dir.path());

        let defaults = store.load_settings();
        assert_eq!(defaults.base_url, "http://127.0.0.1:8000/");

        let mut settings = defaults;
        settings.base_url = "http://10.0.0.5:9000/".to_string();
        settings.mock_mode = true;
        store.save_settings(&settings).unwrap();

        let loaded = store.load_settings();
        assert_eq!(loaded.base_url, "http://10.0.0.5:9000/");
        assert!(loaded.mock_mode);
    }

    #[test]
    fn a_corrupt_prefs_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::at(dir.path());
        fs::write(dir.path().join("prefs.json"), "not json").unwrap();
        assert!(store.api_key().is_none());
        store.save_api_key("sk-new").unwrap();
        assert_eq!(store.api_key().as_deref(), Some("sk-new"));
    }
}
