//! Session-scoped KV store.
//!
//! Backs `SessionState` (cpStatus, meterValueWh, transactionId, per-connector
//! `connectorStatus`). Lifetime = one WebSocket session: the engine creates
//! a fresh `SessionStore` on connect and drops the old one on disconnect, so
//! nothing needs an explicit "clear" — reconnecting just gets a new map.

use dashmap::DashMap;

use super::KvStore;

#[derive(Default)]
pub struct SessionStore {
    entries: DashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl KvStore for SessionStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.entries
            .get(key)
            .map(|v| v.clone())
            .unwrap_or_else(|| default.to_string())
    }

    fn put(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_default_when_absent() {
        let store = SessionStore::new();
        assert_eq!(store.get("missing", "Available"), "Available");
    }

    #[test]
    fn put_then_get_roundtrips() {
        let store = SessionStore::new();
        store.put("cp_status", "CONNECTED".to_string());
        assert_eq!(store.get("cp_status", "DISCONNECTED"), "CONNECTED");
    }
}
