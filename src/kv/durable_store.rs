//! Durable KV store: survives a process restart.
//!
//! Backs `connectorAvailability{c}` and the operator's last-used `wsUrl`,
//! `cpId`, `tagId` settings (spec §3, §6). Persisted as a flat TOML document
//! next to the charge point config file, following the same
//! `toml` + `dirs-next` pattern the config loader uses.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::KvStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

pub struct DurableStore {
    path: PathBuf,
    doc: RwLock<Document>,
}

impl DurableStore {
    /// Load the durable store from `path`, creating an empty one if the
    /// file does not exist yet.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_default(),
            Err(_) => Document::default(),
        };
        Self {
            path,
            doc: RwLock::new(doc),
        }
    }

    /// Default location: `~/.config/ocpp-charge-point/durable.toml`.
    pub fn default_path() -> PathBuf {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ocpp-charge-point")
            .join("durable.toml")
    }

    pub fn open_default() -> Self {
        Self::load(Self::default_path())
    }

    fn persist(&self, doc: &Document) {
        if let Some(parent) = Path::new(&self.path).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match toml::to_string_pretty(doc) {
            Ok(text) => {
                if let Err(e) = std::fs::write(&self.path, text) {
                    warn!(error = %e, path = %self.path.display(), "failed to persist durable store");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize durable store"),
        }
    }
}

impl KvStore for DurableStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.doc
            .read()
            .unwrap()
            .entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn put(&self, key: &str, value: String) {
        let mut doc = self.doc.write().unwrap();
        doc.entries.insert(key.to_string(), value);
        self.persist(&doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_disk() {
        let dir = std::env::temp_dir().join(format!("ocpp-durable-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("durable.toml");

        let store = DurableStore::load(&path);
        store.put("conn_availability0", "Inoperative".to_string());

        let reloaded = DurableStore::load(&path);
        assert_eq!(reloaded.get("conn_availability0", "Operative"), "Inoperative");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = DurableStore::load("/nonexistent/path/durable.toml");
        assert_eq!(store.get("conn_availability0", "Operative"), "Operative");
    }
}
