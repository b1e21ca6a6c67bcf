//! # OCPP 1.6 Charge Point client
//!
//! Models a single electric-vehicle charging station: maintains a persistent
//! WebSocket session to a Central System and implements the bidirectional
//! OCPP 1.6-J (JSON over WebSocket) request/response protocol, including
//! server-initiated operations, heartbeats, transaction lifecycle, and
//! per-connector state.
//!
//! ## Architecture
//!
//! - **support**: transport framing, error types, id/time helpers, shutdown
//!   coordination
//! - **kv**: the session/durable key-value store abstraction
//! - **domain**: connector and session state models
//! - **ocpp**: outbound call builders and inbound action handlers
//! - **engine**: the dispatcher that owns the WebSocket, the heartbeat
//!   scheduler, and the pending-call table
//! - **observer**: the event types published to external subscribers (UI)

pub mod config;
pub mod domain;
pub mod engine;
pub mod kv;
pub mod observer;
pub mod ocpp;
pub mod support;

pub use config::ChargePointConfig;
pub use domain::{Availability, ConnectorModel, ConnectorStatus, CpStatus, SessionState};
pub use engine::{Engine, SharedEngine};
pub use observer::{create_event_bus, Event, EventBus, SharedEventBus};
pub use support::errors::EngineError;
