//! GetConfiguration (spec §4.7, §9): the source hard-codes a single
//! configuration key rather than exposing a general configuration store;
//! the spec's open question leaves that unresolved, so it's preserved here
//! rather than grown into something the Non-goals don't ask for.

use std::sync::Arc;

use serde_json::Value;

use crate::engine::Engine;
use crate::support::ocpp_frame::OcppFrame;

pub async fn handle(engine: &Arc<Engine>, unique_id: &str, _payload: Value) {
    let reply = OcppFrame::CallResult {
        unique_id: unique_id.to_string(),
        payload: serde_json::json!({
            "unknownKey": [],
            "configurationKey": [{
                "key": "HeartbeatInterval",
                "readonly": false,
                "value": "900",
            }],
        }),
    };
    let _ = engine.send_frame(reply).await;
}
