//! Authorize (spec §4.7): payload `{idTag}`.

use rust_ocpp::v1_6::messages::authorize::{AuthorizeRequest, AuthorizeResponse};
use rust_ocpp::v1_6::types::AuthorizationStatus;
use serde_json::Value;

pub fn payload(id_tag: &str) -> Value {
    let request = AuthorizeRequest {
        id_tag: id_tag.to_string(),
    };
    serde_json::to_value(request).unwrap_or_default()
}

/// spec §4.7: "inspect idTagInfo.status; if Invalid, remain; else
/// transition to AUTHORIZED".
pub fn is_accepted(payload: Value) -> Result<bool, serde_json::Error> {
    let response: AuthorizeResponse = serde_json::from_value(payload)?;
    Ok(!matches!(
        response.id_tag_info.status,
        AuthorizationStatus::Invalid
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_id_tag() {
        assert_eq!(payload("DEADBEEF")["idTag"], "DEADBEEF");
    }

    #[test]
    fn invalid_status_is_not_accepted() {
        let result = serde_json::json!({"idTagInfo": {"status": "Invalid"}});
        assert!(!is_accepted(result).unwrap());
    }

    #[test]
    fn accepted_status_is_accepted() {
        let result = serde_json::json!({"idTagInfo": {"status": "Accepted"}});
        assert!(is_accepted(result).unwrap());
    }
}
