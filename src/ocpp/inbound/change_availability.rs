//! ChangeAvailability (spec §4.7, §4.4): `{connectorId, type}` → reply
//! Accepted, then apply the connector-model availability operation
//! (durable write, status cascade with the Operative/Available fix, and —
//! for connector 0 — cascade to connectors 1 and 2).

use std::sync::Arc;

use serde_json::Value;

use crate::domain::Availability;
use crate::engine::Engine;
use crate::support::ocpp_frame::OcppFrame;

pub async fn handle(engine: &Arc<Engine>, unique_id: &str, payload: Value) {
    let connector_id = payload
        .get("connectorId")
        .and_then(|v| v.as_u64())
        .map(|v| v as u32)
        .unwrap_or(0);
    let availability: Availability = payload
        .get("type")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(Availability::Operative);

    let reply = OcppFrame::CallResult {
        unique_id: unique_id.to_string(),
        payload: serde_json::json!({"status": "Accepted"}),
    };
    let _ = engine.send_frame(reply).await;

    engine.set_availability(connector_id, availability).await;
}
