//! StopTransaction (spec §4.7): payload `{transactionId, timestamp,
//! meterStop, reason="Local", transactionData=[begin=0 Wh, end=meterValueWh],
//! idTag?}`.

use rust_ocpp::v1_6::types::{MeterValue, Reason, SampledValue};
use serde_json::Value;

use crate::support::time::now_iso8601;

/// `transaction_id` is `None` when StopTransaction fires without a known
/// transaction id (spec §7 `OperationNotApplicable`: "send anyway with the
/// field omitted/zero; log"). Sent as `0` since the OCPP 1.6 schema
/// requires an integer, matching the source's own fallback.
pub fn payload(transaction_id: Option<i32>, meter_value_wh: u64, id_tag: Option<&str>) -> Value {
    let transaction_data = vec![
        meter_sample(0),
        meter_sample(meter_value_wh),
    ];

    let mut value = serde_json::json!({
        "transactionId": transaction_id.unwrap_or(0),
        "timestamp": now_iso8601(),
        "meterStop": meter_value_wh,
        "reason": serde_json::to_value(Reason::Local).unwrap_or_default(),
        "transactionData": serde_json::to_value(&transaction_data).unwrap_or_default(),
    });

    if let Some(id_tag) = id_tag {
        value["idTag"] = Value::String(id_tag.to_string());
    }

    value
}

fn meter_sample(wh: u64) -> MeterValue {
    MeterValue {
        timestamp: chrono::Utc::now(),
        sampled_value: vec![SampledValue {
            value: wh.to_string(),
            context: None,
            format: None,
            measurand: None,
            phase: None,
            location: None,
            unit: None,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_begin_and_end_meter_samples() {
        let value = payload(Some(42), 5000, Some("DEADBEEF"));
        assert_eq!(value["transactionId"], 42);
        assert_eq!(value["meterStop"], 5000);
        assert_eq!(value["idTag"], "DEADBEEF");

        let data = value["transactionData"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["sampledValue"][0]["value"], "0");
        assert_eq!(data[1]["sampledValue"][0]["value"], "5000");
    }

    #[test]
    fn missing_transaction_id_sends_zero() {
        let value = payload(None, 0, None);
        assert_eq!(value["transactionId"], 0);
        assert!(value.get("idTag").is_none());
    }
}
