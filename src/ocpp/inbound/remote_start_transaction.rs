//! RemoteStartTransaction (spec §4.7, §8 scenarios 3–4):
//! `{idTag, connectorId?}` → reply `{status: configured}`; if Accepted,
//! sleep `remoteStartDelaySeconds` then originate StartTransaction.
//!
//! The delay is explicitly not a blocking barrier (spec §5): it runs on a
//! detached task so the engine keeps processing inbound frames and
//! heartbeats while it waits.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::engine::Engine;
use crate::support::ocpp_frame::OcppFrame;

pub async fn handle(engine: &Arc<Engine>, unique_id: &str, payload: Value) {
    let status = engine.remote_start_stop_response();

    let reply = OcppFrame::CallResult {
        unique_id: unique_id.to_string(),
        payload: serde_json::json!({"status": status}),
    };
    let _ = engine.send_frame(reply).await;

    if status != "Accepted" {
        engine.log("RemoteStartTransaction rejected by configuration");
        return;
    }

    let id_tag = payload
        .get("idTag")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let connector_id = payload
        .get("connectorId")
        .and_then(|v| v.as_u64())
        .map(|v| v as u32)
        .unwrap_or(1);
    let delay = Duration::from_secs(engine.remote_start_delay_secs());

    let engine = engine.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        engine.start_transaction(&id_tag, connector_id, 0).await;
    });
}
