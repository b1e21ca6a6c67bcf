//! UnlockConnector (spec §4.7): reply Accepted unconditionally — no real
//! contactor to unlock in this simulation (spec §9: preserve the source's
//! minimalism here rather than invent hardware state).

use std::sync::Arc;

use serde_json::Value;

use crate::engine::Engine;
use crate::support::ocpp_frame::OcppFrame;

pub async fn handle(engine: &Arc<Engine>, unique_id: &str, _payload: Value) {
    let reply = OcppFrame::CallResult {
        unique_id: unique_id.to_string(),
        payload: serde_json::json!({"status": "Accepted"}),
    };
    let _ = engine.send_frame(reply).await;
}
