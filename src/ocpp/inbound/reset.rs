//! Reset (spec §4.7): `{type: "Soft"|"Hard"}` → reply Accepted, then close.

use std::sync::Arc;

use serde_json::Value;

use crate::engine::Engine;
use crate::support::ocpp_frame::OcppFrame;

pub async fn handle(engine: &Arc<Engine>, unique_id: &str, payload: Value) {
    let kind = payload.get("type").and_then(|v| v.as_str()).unwrap_or("Soft");

    let reply = OcppFrame::CallResult {
        unique_id: unique_id.to_string(),
        payload: serde_json::json!({"status": "Accepted"}),
    };
    let _ = engine.send_frame(reply).await;

    engine.log(format!("{kind} reset accepted; closing connection"));
    engine.disconnect().await;
}
