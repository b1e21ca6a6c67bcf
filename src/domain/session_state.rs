//! CP-wide session state and its transition table (spec §4.6, §3).
//!
//! `SessionState` wraps the session KV store with typed accessors for
//! `cpStatus`, `meterValueWh`, and `transactionId`. Lifetime = one
//! WebSocket session: a fresh instance (backed by a fresh `SessionStore`) is
//! created on connect and discarded on close.

use std::fmt;
use std::sync::Arc;

use crate::kv::{keys, KvStore, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpStatus {
    Disconnected,
    Connecting,
    Connected,
    Authorized,
    InTransaction,
    Error,
}

impl Default for CpStatus {
    fn default() -> Self {
        Self::Disconnected
    }
}

impl fmt::Display for CpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "DISCONNECTED",
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::Authorized => "AUTHORIZED",
            Self::InTransaction => "IN_TRANSACTION",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CpStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DISCONNECTED" => Ok(Self::Disconnected),
            "CONNECTING" => Ok(Self::Connecting),
            "CONNECTED" => Ok(Self::Connected),
            "AUTHORIZED" => Ok(Self::Authorized),
            "IN_TRANSACTION" => Ok(Self::InTransaction),
            "ERROR" => Ok(Self::Error),
            _ => Err(()),
        }
    }
}

impl CpStatus {
    /// Is `next` a legal transition from `self`, per spec §4.6's table?
    /// ERROR is reachable from any state; every other edge is explicit.
    pub fn can_transition_to(self, next: CpStatus) -> bool {
        use CpStatus::*;
        if next == Error {
            return true;
        }
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Authorized)
                | (Connected, InTransaction)
                | (Connected, Disconnected)
                | (Authorized, InTransaction)
                | (Authorized, Connected)
                | (Authorized, Disconnected)
                | (InTransaction, Authorized)
                | (InTransaction, Disconnected)
                | (Error, Disconnected)
        )
    }
}

/// CP-wide, session-scoped state: `cpStatus`, `meterValueWh`,
/// `transactionId`. Owned exclusively by the engine — only it writes here.
pub struct SessionState {
    store: Arc<SessionStore>,
}

impl SessionState {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    pub fn cp_status(&self) -> CpStatus {
        self.store
            .get(keys::CP_STATUS, "DISCONNECTED")
            .parse()
            .unwrap_or_default()
    }

    pub fn set_cp_status(&self, status: CpStatus) {
        self.store.put(keys::CP_STATUS, status.to_string());
    }

    pub fn meter_value_wh(&self) -> u64 {
        self.store
            .get(keys::METER_VALUE, "0")
            .parse()
            .unwrap_or(0)
    }

    pub fn set_meter_value_wh(&self, wh: u64) {
        self.store.put(keys::METER_VALUE, wh.to_string());
    }

    pub fn transaction_id(&self) -> Option<i32> {
        match self.store.get(keys::TRANSACTION_ID, "").as_str() {
            "" => None,
            s => s.parse().ok(),
        }
    }

    /// Store a `transactionId` from a StartTransaction CALLRESULT.
    ///
    /// Invariant (spec §3, §8): a missing or zero `transactionId` must NOT
    /// overwrite whatever is already stored.
    pub fn set_transaction_id_from_callresult(&self, transaction_id: Option<i32>) {
        match transaction_id {
            Some(id) if id != 0 => self.store.put(keys::TRANSACTION_ID, id.to_string()),
            _ => {}
        }
    }

    pub fn clear_transaction_id(&self) {
        self.store.put(keys::TRANSACTION_ID, String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        SessionState::new(Arc::new(SessionStore::new()))
    }

    #[test]
    fn defaults() {
        let s = state();
        assert_eq!(s.cp_status(), CpStatus::Disconnected);
        assert_eq!(s.meter_value_wh(), 0);
        assert_eq!(s.transaction_id(), None);
    }

    #[test]
    fn zero_or_missing_transaction_id_does_not_overwrite() {
        let s = state();
        s.set_transaction_id_from_callresult(Some(42));
        assert_eq!(s.transaction_id(), Some(42));

        s.set_transaction_id_from_callresult(Some(0));
        assert_eq!(s.transaction_id(), Some(42));

        s.set_transaction_id_from_callresult(None);
        assert_eq!(s.transaction_id(), Some(42));
    }

    #[test]
    fn legal_transitions() {
        assert!(CpStatus::Disconnected.can_transition_to(CpStatus::Connecting));
        assert!(CpStatus::Connected.can_transition_to(CpStatus::InTransaction));
        assert!(CpStatus::Authorized.can_transition_to(CpStatus::InTransaction));
        assert!(!CpStatus::Disconnected.can_transition_to(CpStatus::InTransaction));
        assert!(CpStatus::InTransaction.can_transition_to(CpStatus::Error));
    }
}
