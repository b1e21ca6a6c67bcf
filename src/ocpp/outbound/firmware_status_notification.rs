//! FirmwareStatusNotification: a real outbound no-op (SPEC_FULL §2). See
//! `diagnostics_status_notification` for the rationale.

use rust_ocpp::v1_6::types::FirmwareStatus;
use serde_json::Value;

pub fn payload() -> Value {
    serde_json::json!({
        "status": serde_json::to_value(FirmwareStatus::Idle).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_reports_idle() {
        assert_eq!(payload()["status"], "Idle");
    }
}
