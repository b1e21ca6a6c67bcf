//! Pending-call correlation table (spec §4.3, the "Pending-call table" / C3).
//!
//! Correlates outgoing CALLs to their CALLRESULT/CALLERROR replies by
//! `uniqueId`, and remembers the action name so inbound results can be
//! routed without relying on the single `lastAction` slot the source used
//! (spec §9: that slot is wrong under concurrent Heartbeats).
//!
//! Grounded on the teacher's `application::commands::CommandSender`
//! (`pending_requests: DashMap<(String, String), PendingRequest>`), adapted
//! to a single charge-point session: the key is just `uniqueId` rather than
//! `(chargePointId, uniqueId)` since this process models exactly one CP.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::warn;

use serde_json::Value;

/// spec §4.3: "a sensible default is 30s" for a reply that never arrives.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub enum CallOutcome {
    Result(Value),
    Error { code: String, description: String },
}

struct Entry {
    action: String,
    registered_at: Instant,
    reply: Option<oneshot::Sender<CallOutcome>>,
}

/// `{uniqueId -> action}` mapping (spec §3's `PendingCall`), plus a reply
/// channel so callers can `await` the CALLRESULT/CALLERROR if they want to.
#[derive(Default)]
pub struct PendingCallTable {
    entries: DashMap<String, Entry>,
}

impl PendingCallTable {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register an outgoing CALL. Returns a receiver that resolves when
    /// `resolve`/`resolve_error` is called with this `unique_id`, or is
    /// dropped (receiver sees a `RecvError`) on timeout/disconnect.
    pub fn register(&self, unique_id: impl Into<String>, action: impl Into<String>) -> oneshot::Receiver<CallOutcome> {
        let (tx, rx) = oneshot::channel();
        self.entries.insert(
            unique_id.into(),
            Entry {
                action: action.into(),
                registered_at: Instant::now(),
                reply: Some(tx),
            },
        );
        rx
    }

    /// A CALLRESULT arrived for `unique_id`. Erases the entry and returns
    /// the action it was registered under, or `None` if `resolve` misses
    /// (spec §4.3: "the reply is logged and dropped").
    pub fn resolve(&self, unique_id: &str, payload: Value) -> Option<String> {
        let (_, entry) = self.entries.remove(unique_id)?;
        if let Some(tx) = entry.reply {
            let _ = tx.send(CallOutcome::Result(payload));
        }
        Some(entry.action)
    }

    /// A CALLERROR arrived for `unique_id`.
    pub fn resolve_error(&self, unique_id: &str, code: &str, description: &str) -> Option<String> {
        let (_, entry) = self.entries.remove(unique_id)?;
        if let Some(tx) = entry.reply {
            let _ = tx.send(CallOutcome::Error {
                code: code.to_string(),
                description: description.to_string(),
            });
        }
        Some(entry.action)
    }

    /// Evict entries older than `timeout`, logging each as a local protocol
    /// timeout (spec §7) without touching the socket. Called periodically
    /// from the same timer infrastructure that drives the heartbeat.
    pub fn sweep_timeouts(&self, timeout: Duration) -> Vec<(String, String)> {
        let mut expired = Vec::new();
        let now = Instant::now();
        self.entries.retain(|unique_id, entry| {
            if now.duration_since(entry.registered_at) > timeout {
                expired.push((unique_id.clone(), entry.action.clone()));
                false
            } else {
                true
            }
        });
        if !expired.is_empty() {
            warn!(count = expired.len(), "pending calls timed out");
        }
        expired
    }

    /// Drop all pending entries (spec §5: `disconnect` "drops all
    /// pending-call entries; they will never resolve").
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub type SharedPendingCallTable = Arc<PendingCallTable>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_returns_registered_action() {
        let table = PendingCallTable::new();
        let _rx = table.register("id-1", "Heartbeat");
        assert_eq!(table.resolve("id-1", serde_json::json!({})), Some("Heartbeat".to_string()));
        assert!(table.is_empty());
    }

    #[test]
    fn resolve_miss_returns_none() {
        let table = PendingCallTable::new();
        assert_eq!(table.resolve("unknown", serde_json::json!({})), None);
    }

    #[test]
    fn concurrent_actions_route_independently() {
        let table = PendingCallTable::new();
        let _hb = table.register("hb-1", "Heartbeat");
        let _boot = table.register("boot-1", "BootNotification");

        assert_eq!(table.resolve("boot-1", serde_json::json!({})), Some("BootNotification".to_string()));
        assert_eq!(table.resolve("hb-1", serde_json::json!({})), Some("Heartbeat".to_string()));
    }

    #[test]
    fn sweep_evicts_only_expired_entries() {
        let table = PendingCallTable::new();
        let _rx = table.register("old", "Heartbeat");
        std::thread::sleep(Duration::from_millis(10));
        let expired = table.sweep_timeouts(Duration::from_millis(1));
        assert_eq!(expired.len(), 1);
        assert!(table.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let table = PendingCallTable::new();
        let _a = table.register("a", "Authorize");
        let _b = table.register("b", "Heartbeat");
        table.clear();
        assert!(table.is_empty());
    }
}
