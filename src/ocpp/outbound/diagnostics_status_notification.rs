//! DiagnosticsStatusNotification: a real outbound no-op (SPEC_FULL §2).
//!
//! The simulation never has a diagnostics upload in flight, so there is no
//! status to report beyond "Idle" — but `TriggerMessage` requesting this
//! action (spec §4.7) needs something concrete to originate.

use rust_ocpp::v1_6::types::DiagnosticsStatus;
use serde_json::Value;

pub fn payload() -> Value {
    serde_json::json!({
        "status": serde_json::to_value(DiagnosticsStatus::Idle).unwrap_or_default(),
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
