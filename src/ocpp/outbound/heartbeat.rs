//! Heartbeat (spec §4.7): empty payload.

use serde_json::Value;

pub fn payload() -> Value {
    serde_json::json!({})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_empty_object() {
        assert_eq!(payload(), serde_json::json!({}));
    }
}
