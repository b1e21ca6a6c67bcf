//! Outbound CALL builders (spec §4.7) — the actions this charge point
//! originates. Each module builds the wire payload for its action and, where
//! the action expects a reply this crate acts on, parses the CALLRESULT.
//! State transitions and connector-model side effects stay in `Engine`;
//! these modules are pure payload (de)serialization, mirroring how the
//! teacher keeps `support::ocpp_frame` free of any domain logic.

pub mod authorize;
pub mod boot_notification;
pub mod diagnostics_status_notification;
pub mod firmware_status_notification;
pub mod heartbeat;
pub mod meter_values;
pub mod start_transaction;
pub mod status_notification;
pub mod stop_transaction;
