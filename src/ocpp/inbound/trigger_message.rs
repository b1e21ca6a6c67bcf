//! TriggerMessage (spec §4.7): `{requestedMessage, connectorId?}` → reply
//! Accepted, then originate the corresponding CALL. Unknown messages are
//! logged but still reply Accepted, "for parity with source behavior".

use std::sync::Arc;

use serde_json::Value;

use crate::engine::Engine;
use crate::ocpp::{actions, outbound};
use crate::support::ocpp_frame::OcppFrame;

pub async fn handle(engine: &Arc<Engine>, unique_id: &str, payload: Value) {
    let requested = payload
        .get("requestedMessage")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let connector_id = payload
        .get("connectorId")
        .and_then(|v| v.as_u64())
        .map(|v| v as u32)
        .unwrap_or(0);

    let reply = OcppFrame::CallResult {
        unique_id: unique_id.to_string(),
        payload: serde_json::json!({"status": "Accepted"}),
    };
    let _ = engine.send_frame(reply).await;

    let engine = engine.clone();
    tokio::spawn(async move {
        match requested.as_str() {
            actions::BOOT_NOTIFICATION => {
                let config = engine.config_snapshot();
                engine.originate(actions::BOOT_NOTIFICATION, outbound::boot_notification::payload(&config));
            }
            actions::HEARTBEAT => engine.send_heartbeat().await,
            actions::METER_VALUES => engine.send_meter_value(connector_id).await,
            actions::STATUS_NOTIFICATION => {
                let status = engine.connector_status(connector_id).await;
                engine.originate(
                    actions::STATUS_NOTIFICATION,
                    outbound::status_notification::payload(connector_id, status),
                );
            }
            actions::DIAGNOSTICS_STATUS_NOTIFICATION => engine.originate(
                actions::DIAGNOSTICS_STATUS_NOTIFICATION,
                outbound::diagnostics_status_notification::payload(),
            ),
            actions::FIRMWARE_STATUS_NOTIFICATION => engine.originate(
                actions::FIRMWARE_STATUS_NOTIFICATION,
                outbound::firmware_status_notification::payload(),
            ),
            other => engine.log(format!("TriggerMessage: unsupported requestedMessage {other}")),
        }
    });
}
