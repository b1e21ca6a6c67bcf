//! Engine error kinds.
//!
//! Mirrors spec §7's four categories. `EngineError` is the type fallible
//! engine operations return; the dispatcher turns these into
//! `onStatusChange`/`onLog` calls rather than letting them propagate to the
//! caller as a hard failure — see `engine::Engine::report_error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Socket open failed, unexpected close, or write on a closed socket.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed JSON, unknown message type, or unknown inbound action.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The Central System rejected an operation we expected to succeed.
    #[error("Server rejected {action}: {reason}")]
    ServerRejection { action: &'static str, reason: String },

    /// The operation's prerequisite state (e.g. a known transactionId) was
    /// absent; spec says send anyway with the field omitted/zero and log.
    #[error("{0} not applicable in current state")]
    OperationNotApplicable(&'static str),

    /// A pending CALL was never answered within the 30s window.
    #[error("Timeout waiting for reply to {action} ({unique_id})")]
    Timeout { unique_id: String, action: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
