//! Per-connector state (spec §4.4, the "Connector Model" / C4).
//!
//! `connectorStatus` is session-scoped; `connectorAvailability` is durable —
//! the two are never confused because they're read from distinct stores.
//! This module only holds the raw accessors; the notify/cascade/event
//! orchestration that spec §4.4 describes lives in `engine::Engine`, since
//! it needs the outbound CALL sender and the event bus that a pure domain
//! type shouldn't depend on.

use std::fmt;
use std::sync::Arc;

use crate::kv::{keys, DurableStore, KvStore, SessionStore};

/// Connector 0 is the charge point itself; 1 and 2 are its two outlets.
pub const CONNECTORS: [u32; 3] = [0, 1, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorStatus {
    Available,
    Charging,
    Unavailable,
    Finishing,
}

impl Default for ConnectorStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl fmt::Display for ConnectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Available => "Available",
            Self::Charging => "Charging",
            Self::Unavailable => "Unavailable",
            Self::Finishing => "Finishing",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ConnectorStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Self::Available),
            "Charging" => Ok(Self::Charging),
            "Unavailable" => Ok(Self::Unavailable),
            "Finishing" => Ok(Self::Finishing),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Operative,
    Inoperative,
}

impl Default for Availability {
    fn default() -> Self {
        Self::Operative
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Operative => "Operative",
            Self::Inoperative => "Inoperative",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Availability {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Operative" => Ok(Self::Operative),
            "Inoperative" => Ok(Self::Inoperative),
            _ => Err(()),
        }
    }
}

/// Raw per-connector accessors backed by the two KV stores.
pub struct ConnectorModel {
    session: Arc<SessionStore>,
    durable: Arc<DurableStore>,
}

impl ConnectorModel {
    pub fn new(session: Arc<SessionStore>, durable: Arc<DurableStore>) -> Self {
        Self { session, durable }
    }

    /// Reads the session-scoped status; defaults to `Available`.
    pub fn status(&self, connector_id: u32) -> ConnectorStatus {
        self.session
            .get(&keys::conn_status(connector_id), "Available")
            .parse()
            .unwrap_or_default()
    }

    /// Raw session write — no notification, no cascade. See
    /// `Engine::set_connector_status` for the full §4.4 operation.
    pub fn write_status(&self, connector_id: u32, status: ConnectorStatus) {
        self.session
            .put(&keys::conn_status(connector_id), status.to_string());
    }

    /// Reads the durable availability; defaults to `Operative`.
    pub fn availability(&self, connector_id: u32) -> Availability {
        self.durable
            .get(&keys::conn_availability(connector_id), "Operative")
            .parse()
            .unwrap_or_default()
    }

    /// Raw durable write — no status cascade, no event. See
    /// `Engine::set_connector_availability` for the full §4.4 operation.
    pub fn write_availability(&self, connector_id: u32, availability: Availability) {
        self.durable
            .put(&keys::conn_availability(connector_id), availability.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ConnectorModel {
        ConnectorModel::new(
            Arc::new(SessionStore::new()),
            Arc::new(DurableStore::load(std::env::temp_dir().join(format!(
                "ocpp-connector-test-{}.toml",
                uuid::Uuid::new_v4()
            )))),
        )
    }

    #[test]
    fn defaults_are_available_and_operative() {
        let m = model();
        assert_eq!(m.status(1), ConnectorStatus::Available);
        assert_eq!(m.availability(1), Availability::Operative);
    }

    #[test]
    fn writes_roundtrip() {
        let m = model();
        m.write_status(1, ConnectorStatus::Charging);
        assert_eq!(m.status(1), ConnectorStatus::Charging);

        m.write_availability(0, Availability::Inoperative);
        assert_eq!(m.availability(0), Availability::Inoperative);
    }
}
