//! Domain layer — connector and session state models (spec §3, §4.4, §4.6).

pub mod connector;
pub mod session_state;

pub use connector::{Availability, ConnectorModel, ConnectorStatus, CONNECTORS};
pub use session_state::{CpStatus, SessionState};
