//! Charge point configuration (spec §3).
//!
//! `ChargePointConfig` is immutable once a session is established. Loadable
//! from a TOML file, following the same `toml` + `dirs-next` pattern the
//! teacher's `AppConfig::load`/`default_config_path` use.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Ordered subprotocol offer (spec §6): `ocpp1.6` first, `ocpp1.5` as
/// fallback.
pub const SUBPROTOCOLS: &[&str] = &["ocpp1.6", "ocpp1.5"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargePointConfig {
    /// Base WebSocket URL; the caller supplies the trailing slash.
    pub ws_url: String,
    /// Opaque charge point identifier appended to `ws_url`.
    pub cp_id: String,
    /// idTag used when the operator doesn't supply one explicitly.
    pub default_id_tag: String,

    /// Simulation knob (spec §4.7, §8 scenario 3): delay before a
    /// RemoteStartTransaction we accepted actually originates
    /// StartTransaction.
    pub remote_start_delay_secs: u64,
    /// Simulation knob (spec §8 scenario 4): the status this charge point
    /// replies with to RemoteStartTransaction/RemoteStopTransaction.
    pub remote_start_stop_response: String,

    /// Vendor identity sent in BootNotification (spec §4.7 — values are
    /// not protocol-critical but must be present).
    pub vendor: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_version: String,
}

impl Default for ChargePointConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:9000/ocpp/".to_string(),
            cp_id: "CP01".to_string(),
            default_id_tag: "DEADBEEF".to_string(),
            remote_start_delay_secs: 3,
            remote_start_stop_response: "Accepted".to_string(),
            vendor: "Elmo".to_string(),
            model: "Elmo-Sim".to_string(),
            serial_number: "SIM-0001".to_string(),
            firmware_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ChargePointConfig {
    /// Full WebSocket URL: `wsUrl || cpId` (spec §6 — caller-supplied
    /// trailing slash, plain concatenation, no path-joining logic).
    pub fn full_url(&self) -> String {
        format!("{}{}", self.ws_url, self.cp_id)
    }

    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn default_path() -> PathBuf {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ocpp-charge-point")
            .join("config.toml")
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> std::io::Result<()> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self).unwrap_or_default();
        std::fs::write(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_url_is_plain_concatenation() {
        let cfg = ChargePointConfig {
            ws_url: "ws://cs/".to_string(),
            cp_id: "CP01".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.full_url(), "ws://cs/CP01");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = ChargePointConfig::load("/nonexistent/ocpp-config.toml");
        assert_eq!(cfg.cp_id, "CP01");
    }
}
