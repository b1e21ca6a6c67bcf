//! Unique-id generation for outgoing OCPP CALLs.

use uuid::Uuid;

/// Generate a fresh `uniqueId` for an outbound CALL.
///
/// Unique among outstanding CALLs this session (spec invariant): a v4 UUID
/// gives us that without coordination with the pending-call table.
pub fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        let a = new_message_id();
        let b = new_message_id();
        assert_ne!(a, b);
    }
}
