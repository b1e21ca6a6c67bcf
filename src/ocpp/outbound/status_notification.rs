//! StatusNotification (spec §4.7): payload `{connectorId, status,
//! errorCode:"NoError", info:"", timestamp, vendorId:"", vendorErrorCode:""}`.

use rust_ocpp::v1_6::types::ChargePointErrorCode;
use serde_json::Value;

use crate::domain::ConnectorStatus;
use crate::support::time::now_iso8601;

fn wire_status(status: ConnectorStatus) -> &'static str {
    match status {
        ConnectorStatus::Available => "Available",
        ConnectorStatus::Charging => "Charging",
        ConnectorStatus::Unavailable => "Unavailable",
        ConnectorStatus::Finishing => "Finishing",
    }
}

pub fn payload(connector_id: u32, status: ConnectorStatus) -> Value {
    serde_json::json!({
        "connectorId": connector_id,
        "status": wire_status(status),
        "errorCode": serde_json::to_value(ChargePointErrorCode::NoError).unwrap_or_default(),
        "info": "",
        "timestamp": now_iso8601(),
        "vendorId": "",
        "vendorErrorCode": "",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_reports_charging_status() {
        let value = payload(1, ConnectorStatus::Charging);
        assert_eq!(value["connectorId"], 1);
        assert_eq!(value["status"], "Charging");
        assert_eq!(value["errorCode"], "NoError");
    }
}
