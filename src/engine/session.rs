//! The mutable state bound to one WebSocket session (spec §3: "SessionState
//! (lifetime = one WebSocket session; reset on reconnect)").
//!
//! Grounded on the teacher's per-connection bundle
//! (`application::charging::session::connection::Connection`): one struct
//! owns everything that only makes sense while a socket is open, and
//! dropping it tears the lot down.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::domain::{ConnectorModel, SessionState};
use crate::kv::SessionStore;

use super::heartbeat::HeartbeatScheduler;
use super::pending_calls::PendingCallTable;

/// One per WebSocket connection attempt. Replacing `Engine::session` with a
/// new `Session` (or `None`) drops the old `Arc` — once no task still holds
/// a clone, `Drop` aborts every background task this session owns.
pub struct Session {
    /// Distinguishes this session from any later one so that a stray
    /// event from an already-superseded reader/writer task is ignored
    /// instead of corrupting the new session's state.
    pub generation: u64,
    pub state: SessionState,
    pub connector: ConnectorModel,
    pub pending: Arc<PendingCallTable>,
    pub heartbeat: HeartbeatScheduler,
    pub outbound_tx: mpsc::UnboundedSender<Message>,
    reader_handle: JoinHandle<()>,
    writer_handle: JoinHandle<()>,
    sweep_handle: JoinHandle<()>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        generation: u64,
        store: Arc<SessionStore>,
        durable: Arc<crate::kv::DurableStore>,
        outbound_tx: mpsc::UnboundedSender<Message>,
        reader_handle: JoinHandle<()>,
        writer_handle: JoinHandle<()>,
        sweep_handle: JoinHandle<()>,
    ) -> Self {
        Self {
            generation,
            state: SessionState::new(store.clone()),
            connector: ConnectorModel::new(store, durable),
            pending: Arc::new(PendingCallTable::new()),
            heartbeat: HeartbeatScheduler::new(),
            outbound_tx,
            reader_handle,
            writer_handle,
            sweep_handle,
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // spec §5: "disconnect cancels the heartbeat timer, drops all
        // pending-call entries ... and transitions to DISCONNECTED" — the
        // heartbeat timer cancels itself via `HeartbeatScheduler`'s own
        // `Drop`; the pending table is dropped wholesale with `self`.
        self.reader_handle.abort();
        self.writer_handle.abort();
        self.sweep_handle.abort();
    }
}
