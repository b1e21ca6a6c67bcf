//! StartTransaction (spec §4.7): payload `{connectorId, idTag, meterStart=0,
//! timestamp, reservationId}`.
//!
//! The caller (engine) is responsible for the accompanying state
//! transition to IN_TRANSACTION and the connector-status-Charging-with-
//! notify side effect described in spec §4.7 — this module only builds the
//! wire payload and parses the reply.

use rust_ocpp::v1_6::messages::start_transaction::{
    StartTransactionRequest, StartTransactionResponse,
};
use serde_json::Value;

use crate::support::time::now_iso8601;

pub fn payload(connector_id: u32, id_tag: &str, reservation_id: Option<i32>) -> Value {
    let request = StartTransactionRequest {
        connector_id,
        id_tag: id_tag.to_string(),
        meter_start: 0,
        reservation_id,
        timestamp: chrono::Utc::now(),
    };
    let mut value = serde_json::to_value(request).unwrap_or_default();
    // rust_ocpp serializes `timestamp` via chrono's own RFC3339, which may
    // carry sub-second precision; spec §3 asks for second precision.
    if let Some(obj) = value.as_object_mut() {
        obj.insert("timestamp".to_string(), Value::String(now_iso8601()));
    }
    value
}

/// Parses the raw `transactionId` out of a StartTransaction CALLRESULT.
/// spec §3: "a StartTransaction CALLRESULT with transactionId missing or
/// zero does NOT alter transactionId" — that guard is enforced by the
/// caller, `SessionState::set_transaction_id_from_callresult`, not here.
pub fn parse_transaction_id(payload: Value) -> Result<Option<i32>, serde_json::Error> {
    let response: StartTransactionResponse = serde_json::from_value(payload)?;
    Ok(Some(response.transaction_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults_meter_start_to_zero() {
        let value = payload(1, "DEADBEEF", Some(0));
        assert_eq!(value["meterStart"], 0);
        assert_eq!(value["connectorId"], 1);
        assert_eq!(value["idTag"], "DEADBEEF");
    }

    #[test]
    fn transaction_id_parses() {
        let result = serde_json::json!({
            "idTagInfo": {"status": "Accepted"},
            "transactionId": 42
        });
        assert_eq!(parse_transaction_id(result).unwrap(), Some(42));
    }
}
