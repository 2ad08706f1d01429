//! Key persistence inside the local settings file
//!
//! The settings file is a JSON object shared with the rest of the app:
//! it holds a `keys` array (ours) next to unrelated preferences such as
//! language or window geometry. This store rewrites only the `keys`
//! field and carries everything else through untouched.
//!
//! Stored keys carry no expiry and are trusted only after being re-run
//! through the role prober at startup.

use serde::{Deserialize, Serialize};
use shared::{Role, RoleBinding};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

const KEYS_FIELD: &str = "keys";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted form of a role binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredKey {
    pub key: String,
    pub role: Role,
    pub name: String,
}

impl From<&RoleBinding> for StoredKey {
    fn from(binding: &RoleBinding) -> Self {
        Self {
            key: binding.credential.clone(),
            role: binding.role,
            name: binding.display_name.clone(),
        }
    }
}

/// Settings-file backed key store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored key list. Missing or unreadable settings yield an
    /// empty list; the orchestrator then falls back to manual login.
    pub fn load_keys(&self) -> Vec<StoredKey> {
        let settings = self.read_settings();
        let Some(raw) = settings.get(KEYS_FIELD) else {
            return Vec::new();
        };
        match serde_json::from_value(raw.clone()) {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "stored key list is malformed, ignoring it");
                Vec::new()
            }
        }
    }

    /// Replace the stored key list, preserving all other settings.
    pub fn save_keys(&self, keys: &[StoredKey]) -> Result<(), StoreError> {
        let mut settings = self.read_settings();
        settings.insert(KEYS_FIELD.to_string(), serde_json::to_value(keys)?);
        self.write_settings(&settings)
    }

    /// Drop the stored key list, preserving all other settings.
    pub fn clear_keys(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut settings = self.read_settings();
        if settings.remove(KEYS_FIELD).is_some() {
            self.write_settings(&settings)?;
        }
        Ok(())
    }

    pub fn has_keys(&self) -> bool {
        !self.load_keys().is_empty()
    }

    fn read_settings(&self) -> serde_json::Map<String, serde_json::Value> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return serde_json::Map::new();
        };
        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) => {
                warn!("settings file is not a JSON object, starting fresh");
                serde_json::Map::new()
            }
            Err(e) => {
                warn!(error = %e, "settings file is unreadable, starting fresh");
                serde_json::Map::new()
            }
        }
    }

    fn write_settings(
        &self,
        settings: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.json"))
    }

    fn sample_keys() -> Vec<StoredKey> {
        vec![
            StoredKey {
                key: "brandkey123".into(),
                role: Role::Brand,
                name: "Acme".into(),
            },
            StoredKey {
                key: "supkey456".into(),
                role: Role::Supplier,
                name: "Mills".into(),
            },
        ]
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load_keys().is_empty());
        assert!(!store.has_keys());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save_keys(&sample_keys()).unwrap();
        assert_eq!(store.load_keys(), sample_keys());
        assert!(store.has_keys());
    }

    #[test]
    fn save_preserves_unrelated_settings() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{"language":"fr","window":{"w":1280,"h":720}}"#,
        )
        .unwrap();

        store.save_keys(&sample_keys()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["language"], "fr");
        assert_eq!(raw["window"]["w"], 1280);
        assert_eq!(raw["keys"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn clear_removes_only_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"language":"de"}"#).unwrap();
        store.save_keys(&sample_keys()).unwrap();

        store.clear_keys().unwrap();

        assert!(store.load_keys().is_empty());
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["language"], "de");
        assert!(raw.get("keys").is_none());
    }

    #[test]
    fn clear_on_missing_file_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.clear_keys().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json at all {").unwrap();
        assert!(store.load_keys().is_empty());
    }

    #[test]
    fn malformed_key_list_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"keys":"oops"}"#).unwrap();
        assert!(store.load_keys().is_empty());
    }

    #[test]
    fn stored_key_from_binding() {
        let binding = RoleBinding::brand("brandkey123", "Acme", 7);
        let stored = StoredKey::from(&binding);
        assert_eq!(stored.key, "brandkey123");
        assert_eq!(stored.role, Role::Brand);
        assert_eq!(stored.name, "Acme");
    }

    #[test]
    fn role_serializes_lowercase() {
        let stored = StoredKey {
            key: "k".into(),
            role: Role::Supplier,
            name: "n".into(),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["role"], "supplier");
    }
}
