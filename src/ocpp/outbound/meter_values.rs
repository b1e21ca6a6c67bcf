//! MeterValues (spec §4.7): `connectorId`, current `transactionId`, and a
//! single `sampledValue` with `{value, context:"Sample.Periodic",
//! format:"Raw", measurand:"Energy.Active.Import.Register",
//! location:"Outlet", unit:"Wh"}`.

use rust_ocpp::v1_6::types::{Location, Measurand, MeterValue, ReadingContext, SampledValue, UnitOfMeasure, ValueFormat};
use serde_json::Value;

pub fn payload(connector_id: u32, transaction_id: Option<i32>, meter_value_wh: u64) -> Value {
    let sample = MeterValue {
        timestamp: chrono::Utc::now(),
        sampled_value: vec![SampledValue {
            value: meter_value_wh.to_string(),
            context: Some(ReadingContext::SamplePeriodic),
            format: Some(ValueFormat::Raw),
            measurand: Some(Measurand::EnergyActiveImportRegister),
            phase: None,
            location: Some(Location::Outlet),
            unit: Some(UnitOfMeasure::Wh),
        }],
    };

    let mut value = serde_json::json!({
        "connectorId": connector_id,
        "meterValue": [serde_json::to_value(&sample).unwrap_or_default()],
    });

    if let Some(transaction_id) = transaction_id {
        value["transactionId"] = Value::from(transaction_id);
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_single_sample() {
        let value = payload(1, Some(42), 5000);
        assert_eq!(value["connectorId"], 1);
        assert_eq!(value["transactionId"], 42);
        let sample = &value["meterValue"][0]["sampledValue"][0];
        assert_eq!(sample["value"], "5000");
        assert_eq!(sample["unit"], "Wh");
        assert_eq!(sample["measurand"], "Energy.Active.Import.Register");
    }

    #[test]
    fn payload_without_transaction_omits_field() {
        let value = payload(0, None, 0);
        assert!(value.get("transactionId").is_none());
    }
}
