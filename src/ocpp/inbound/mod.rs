//! Inbound CALL dispatch (spec §4.7): the Central System originates these,
//! and the engine must reply with exactly one CALLRESULT or CALLERROR per
//! incoming `uniqueId` (spec §8). Each handler owns sending its own reply
//! so it can control ordering against any follow-up CALL it originates
//! (e.g. Reset's reply must reach the wire before the close frame).

mod change_availability;
mod get_configuration;
mod remote_start_transaction;
mod remote_stop_transaction;
mod reset;
mod trigger_message;
mod unlock_connector;

use std::sync::Arc;

use serde_json::Value;

use crate::engine::Engine;
use crate::support::ocpp_frame::OcppFrame;

use super::actions;

pub async fn dispatch(engine: &Arc<Engine>, unique_id: &str, action: &str, payload: Value) {
    match action {
        actions::RESET => reset::handle(engine, unique_id, payload).await,
        actions::REMOTE_START_TRANSACTION => remote_start_transaction::handle(engine, unique_id, payload).await,
        actions::REMOTE_STOP_TRANSACTION => remote_stop_transaction::handle(engine, unique_id, payload).await,
        actions::TRIGGER_MESSAGE => trigger_message::handle(engine, unique_id, payload).await,
        actions::CHANGE_AVAILABILITY => change_availability::handle(engine, unique_id, payload).await,
        actions::UNLOCK_CONNECTOR => unlock_connector::handle(engine, unique_id, payload).await,
        actions::GET_CONFIGURATION => get_configuration::handle(engine, unique_id, payload).await,
        other => {
            engine.log(format!("no handler for inbound action {other}"));
            let reply = OcppFrame::error_response(unique_id, "NotImplemented", format!("{other} is not implemented"));
            let _ = engine.send_frame(reply).await;
        }
    }
}
