//! BootNotification (spec §4.7): sent once, on socket open.
//!
//! Grounded on the teacher's `handle_boot_notification.rs`, mirrored: there
//! the CS deserializes the CP's request and builds a response; here the CP
//! builds the request and deserializes the CS's response.

use rust_ocpp::v1_6::messages::boot_notification::{
    BootNotificationRequest, BootNotificationResponse,
};
use rust_ocpp::v1_6::types::RegistrationStatus;
use serde_json::Value;

use crate::config::ChargePointConfig;

/// Payload values are "not protocol-critical but MUST be sent" (spec
/// §4.7) — fixed vendor identifiers drawn from the charge point config.
pub fn payload(config: &ChargePointConfig) -> Value {
    let request = BootNotificationRequest {
        charge_point_vendor: config.vendor.clone(),
        charge_point_model: config.model.clone(),
        charge_box_serial_number: None,
        charge_point_serial_number: Some(config.serial_number.clone()),
        firmware_version: Some(config.firmware_version.clone()),
        iccid: None,
        imsi: None,
        meter_serial_number: None,
        meter_type: None,
    };
    serde_json::to_value(request).unwrap_or_default()
}

/// The outcome relevant to the engine: accepted or not, and the heartbeat
/// interval if accepted (spec §4.7: "if status == Accepted, read interval
/// and arm heartbeat, transition to CONNECTED; otherwise log and close").
pub enum Outcome {
    Accepted { interval_secs: u64 },
    Rejected,
}

pub fn parse_result(payload: Value) -> Result<Outcome, serde_json::Error> {
    let response: BootNotificationResponse = serde_json::from_value(payload)?;
    Ok(match response.status {
        RegistrationStatus::Accepted => Outcome::Accepted {
            interval_secs: response.interval.max(0) as u64,
        },
        _ => Outcome::Rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_vendor_identifiers() {
        let config = ChargePointConfig::default();
        let value = payload(&config);
        assert_eq!(value["chargePointVendor"], "Elmo");
        assert!(value.get("chargePointSerialNumber").is_some());
    }

    #[test]
    fn accepted_result_yields_interval() {
        let result = serde_json::json!({
            "status": "Accepted",
            "currentTime": "2024-01-01T00:00:00Z",
            "interval": 300
        });
        match parse_result(result).unwrap() {
            Outcome::Accepted { interval_secs } => assert_eq!(interval_secs, 300),
            Outcome::Rejected => panic!("expected Accepted"),
        }
    }

    #[test]
    fn rejected_result_is_rejected() {
        let result = serde_json::json!({
            "status": "Rejected",
            "currentTime": "2024-01-01T00:00:00Z",
            "interval": 0
        });
        assert!(matches!(parse_result(result).unwrap(), Outcome::Rejected));
    }
}
