//! RemoteStopTransaction (spec §4.7): `{transactionId}` → reply
//! `{status: configured}`; if Accepted, originate StopTransaction for that
//! id.

use std::sync::Arc;

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
        engine.log("RemoteStopTransaction rejected by configuration");
        return;
    }

    let transaction_id = payload.get("transactionId").and_then(|v| v.as_i64()).map(|v| v as i32);
    let id_tag = engine.default_id_tag();

    let engine = engine.clone();
    tokio::spawn(async move {
        match transaction_id {
            Some(id) => engine.stop_transaction_with_id(id, &id_tag).await,
            None => engine.stop_transaction(&id_tag).await,
        }
    });
}
