//! OCPP 1.6 action name constants (spec §2 C7, §4.7).
//!
//! The codec only knows the three envelope shapes (spec §4.2); dispatch is
//! by this action string, per the teacher's own `Action`-name-keyed
//! handlers (`application::handlers::ocpp_v16::action_matcher`).

// Outbound: this charge point originates these CALLs.
pub const BOOT_NOTIFICATION: &str = "BootNotification";
pub const AUTHORIZE: &str = "Authorize";
pub const START_TRANSACTION: &str = "StartTransaction";
pub const STOP_TRANSACTION: &str = "StopTransaction";
pub const HEARTBEAT: &str = "Heartbeat";
pub const METER_VALUES: &str = "MeterValues";
pub const STATUS_NOTIFICATION: &str = "StatusNotification";
pub const DIAGNOSTICS_STATUS_NOTIFICATION: &str = "DiagnosticsStatusNotification";
pub const FIRMWARE_STATUS_NOTIFICATION: &str = "FirmwareStatusNotification";

// Inbound: the Central System originates these CALLs; we must reply.
pub const RESET: &str = "Reset";
pub const REMOTE_START_TRANSACTION: &str = "RemoteStartTransaction";
pub const REMOTE_STOP_TRANSACTION: &str = "RemoteStopTransaction";
pub const TRIGGER_MESSAGE: &str = "TriggerMessage";
pub const CHANGE_AVAILABILITY: &str = "ChangeAvailability";
pub const UNLOCK_CONNECTOR: &str = "UnlockConnector";
pub const GET_CONFIGURATION: &str = "GetConfiguration";
