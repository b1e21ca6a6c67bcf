//! OCPP 1.6 operation handlers (spec §2 C7, §4.7).
//!
//! `outbound` builds the CALLs this charge point originates and interprets
//! their CALLRESULTs; `inbound` replies to CALLs the Central System
//! originates. `actions` is the shared table of wire action-name constants
//! both sides dispatch on.

pub mod actions;
pub mod inbound;
pub mod outbound;
