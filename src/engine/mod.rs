//! The dispatcher (spec §4.8, "Engine / dispatcher" / C8).
//!
//! Owns exactly one WebSocket session at a time, demultiplexes inbound
//! frames to `ocpp::inbound` via the pending-call table, serializes
//! outbound writes through a single `mpsc` channel, and emits
//! status/log/availability/meter events to the `observer` event bus.
//!
//! Grounded on the teacher's `interfaces::ws::ocpp_server::handle_connection`
//! (the read/write task split over a `Sink`/`Stream` pair) and
//! `application::commands::CommandSender` (the pending-call-backed `call`
//! helper) — adapted from "one socket per connected charge point" to "one
//! socket, this process is the charge point".

pub mod heartbeat;
pub mod pending_calls;
mod session;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, RwLock as AsyncRwLock};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::config::{self, ChargePointConfig};
use crate::domain::{Availability, ConnectorStatus, CpStatus};
use crate::kv::{DurableStore, KvStore, SessionStore};
use crate::observer::{Event, SharedEventBus};
use crate::ocpp::{actions, outbound};
use crate::support::errors::EngineError;
use crate::support::id::new_message_id;
use crate::support::ocpp_frame::OcppFrame;

use pending_calls::CallOutcome;
use session::Session;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The charge point's single long-lived session owner. Cloned as an `Arc`
/// wherever a background task needs to call back into it.
pub struct Engine {
    config: std::sync::RwLock<ChargePointConfig>,
    durable: Arc<DurableStore>,
    event_bus: SharedEventBus,
    session: AsyncRwLock<Option<Arc<Session>>>,
    next_generation: AtomicU64,
}

pub type SharedEngine = Arc<Engine>;

impl Engine {
    pub fn new(
        config: ChargePointConfig,
        durable: Arc<DurableStore>,
        event_bus: SharedEventBus,
    ) -> Arc<Self> {
        Arc::new(Self {
            config: std::sync::RwLock::new(config),
            durable,
            event_bus,
            session: AsyncRwLock::new(None),
            next_generation: AtomicU64::new(0),
        })
    }

    // ── Config / durable settings ──────────────────────────────

    pub fn config_snapshot(&self) -> ChargePointConfig {
        self.config.read().unwrap().clone()
    }

    pub(crate) fn remote_start_stop_response(&self) -> String {
        self.config.read().unwrap().remote_start_stop_response.clone()
    }

    pub(crate) fn remote_start_delay_secs(&self) -> u64 {
        self.config.read().unwrap().remote_start_delay_secs
    }

    pub(crate) fn default_id_tag(&self) -> String {
        self.config.read().unwrap().default_id_tag.clone()
    }

    pub(crate) fn log(&self, message: impl Into<String>) {
        self.event_bus.log(message);
    }

    // ── Read-only state accessors (spec §6 getters) ────────────

    pub async fn cp_status(&self) -> CpStatus {
        match self.current_session().await {
            Some(s) => s.state.cp_status(),
            None => CpStatus::Disconnected,
        }
    }

    pub async fn meter_value_wh(&self) -> u64 {
        match self.current_session().await {
            Some(s) => s.state.meter_value_wh(),
            None => 0,
        }
    }

    pub async fn transaction_id(&self) -> Option<i32> {
        match self.current_session().await {
            Some(s) => s.state.transaction_id(),
            None => None,
        }
    }

    pub async fn connector_status(&self, connector_id: u32) -> ConnectorStatus {
        match self.current_session().await {
            Some(s) => s.connector.status(connector_id),
            None => ConnectorStatus::Available,
        }
    }

    /// Durable, so it works whether or not a session is open.
    pub fn availability(&self, connector_id: u32) -> Availability {
        self.durable
            .get(&crate::kv::keys::conn_availability(connector_id), "Operative")
            .parse()
            .unwrap_or_default()
    }

    // ── connect / disconnect (spec §4.8) ───────────────────────

    pub async fn connect(self: &Arc<Self>, ws_url: &str, cp_id: &str) {
        if let Some(old) = self.session.write().await.take() {
            let _ = old.outbound_tx.send(Message::Close(Some(CloseFrame {
                code: CloseCode::from(3001u16),
                reason: "superseded by new connect".into(),
            })));
            // give the writer task a moment to flush the close frame before
            // `old`'s Drop aborts it (mirrors `disconnect()`).
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            self.publish_status_event(
                CpStatus::Error,
                Some("Double connect attempted; previous session closed".to_string()),
            );
            return;
        }

        {
            let mut config = self.config.write().unwrap();
            config.ws_url = ws_url.to_string();
            config.cp_id = cp_id.to_string();
        }
        self.durable.put("WSURL", ws_url.to_string());
        self.durable.put("CPID", cp_id.to_string());

        let full_url = self.config.read().unwrap().full_url();

        let mut request = match full_url.as_str().into_client_request() {
            Ok(request) => request,
            Err(e) => {
                self.publish_status_event(CpStatus::Error, Some(format!("invalid URL: {e}")));
                return;
            }
        };
        request.headers_mut().insert(
            "Sec-WebSocket-Protocol",
            HeaderValue::from_str(&config::SUBPROTOCOLS.join(", "))
                .unwrap_or_else(|_| HeaderValue::from_static("ocpp1.6")),
        );

        match connect_async(request).await {
            Ok((stream, response)) => {
                if !subprotocol_accepted(&response) {
                    self.event_bus
                        .log("central system selected no compatible subprotocol");
                    self.publish_status_event(
                        CpStatus::Error,
                        Some("TransportError: no compatible subprotocol".to_string()),
                    );
                    return;
                }
                self.install_session(stream).await;

                let engine = self.clone();
                tokio::spawn(async move { engine.after_connect().await });
            }
            Err(e) => {
                self.publish_status_event(CpStatus::Error, Some(format!("connection failed: {e}")));
            }
        }
    }

    async fn install_session(self: &Arc<Self>, stream: WsStream) {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (sink, stream) = stream.split();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let writer_handle = tokio::spawn(writer_task(sink, outbound_rx));
        let reader_handle = tokio::spawn(reader_task(self.clone(), generation, stream));
        let sweep_handle = tokio::spawn(sweep_task(self.clone(), generation));

        let session = Arc::new(Session::new(
            generation,
            Arc::new(SessionStore::new()),
            self.durable.clone(),
            outbound_tx,
            reader_handle,
            writer_handle,
            sweep_handle,
        ));
        *self.session.write().await = Some(session);

        self.set_status(CpStatus::Connecting, None).await;
    }

    pub async fn disconnect(&self) {
        let session = self.session.write().await.take();
        if let Some(session) = session {
            let _ = session.outbound_tx.send(Message::Close(Some(CloseFrame {
                code: CloseCode::from(3001u16),
                reason: "client disconnect".into(),
            })));
            // give the writer task a moment to flush the close frame before
            // `session`'s Drop aborts it.
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        self.publish_status_event(CpStatus::Disconnected, None);
    }

    async fn after_connect(self: Arc<Self>) {
        let config = self.config_snapshot();
        let payload = outbound::boot_notification::payload(&config);
        match self.call(actions::BOOT_NOTIFICATION, payload).await {
            Ok(result) => match outbound::boot_notification::parse_result(result) {
                Ok(outbound::boot_notification::Outcome::Accepted { interval_secs }) => {
                    self.set_status(CpStatus::Connected, None).await;
                    self.arm_heartbeat(interval_secs).await;
                }
                Ok(outbound::boot_notification::Outcome::Rejected) => {
                    self.event_bus.log("BootNotification rejected by Central System");
                    self.disconnect().await;
                }
                Err(e) => self.event_bus.log(format!("BootNotification: malformed response: {e}")),
            },
            Err(e) => self.report_error(e).await,
        }
    }

    async fn arm_heartbeat(self: &Arc<Self>, interval_secs: u64) {
        if let Some(session) = self.current_session().await {
            let engine = self.clone();
            session.heartbeat.arm(interval_secs, move || {
                let engine = engine.clone();
                async move { engine.send_heartbeat().await }
            });
        }
    }

    // ── Commands (spec §6) ──────────────────────────────────────

    pub async fn authorize(self: &Arc<Self>, id_tag: &str) {
        let payload = outbound::authorize::payload(id_tag);
        match self.call(actions::AUTHORIZE, payload).await {
            Ok(result) => match outbound::authorize::is_accepted(result) {
                Ok(true) => self.set_status(CpStatus::Authorized, None).await,
                Ok(false) => self.event_bus.log("Authorize: idTag invalid"),
                Err(e) => self.event_bus.log(format!("Authorize: malformed response: {e}")),
            },
            Err(e) => self.report_error(e).await,
        }
    }

    pub async fn start_transaction(self: &Arc<Self>, id_tag: &str, connector_id: u32, reservation_id: i32) {
        // spec §3: "meterValueWh resets to 0 at the start of every
        // StartTransaction"; spec §9: the UI must observe this via a
        // callback rather than the engine reaching into UI state.
        if let Some(session) = self.current_session().await {
            session.state.set_meter_value_wh(0);
        }
        self.event_bus.publish(Event::MeterValueChange(0));

        self.set_status(CpStatus::InTransaction, None).await;

        // spec §8 scenario 2: StartTransaction goes out on the wire first,
        // StatusNotification(Charging) second — and the latter must not
        // block the former on its own CALLRESULT.
        let payload = outbound::start_transaction::payload(connector_id, id_tag, Some(reservation_id));
        match self.call(actions::START_TRANSACTION, payload).await {
            Ok(result) => match outbound::start_transaction::parse_transaction_id(result) {
                Ok(transaction_id) => {
                    if let Some(session) = self.current_session().await {
                        session.state.set_transaction_id_from_callresult(transaction_id);
                    }
                }
                Err(e) => self.event_bus.log(format!("StartTransaction: malformed response: {e}")),
            },
            Err(e) => self.report_error(e).await,
        }

        if let Some(session) = self.current_session().await {
            session.connector.write_status(connector_id, ConnectorStatus::Charging);
        }
        self.originate(
            actions::STATUS_NOTIFICATION,
            outbound::status_notification::payload(connector_id, ConnectorStatus::Charging),
        );
    }

    pub async fn stop_transaction(self: &Arc<Self>, id_tag: &str) {
        let transaction_id = self.transaction_id().await;
        self.stop_transaction_inner(transaction_id, id_tag).await;
    }

    pub async fn stop_transaction_with_id(self: &Arc<Self>, transaction_id: i32, id_tag: &str) {
        self.stop_transaction_inner(Some(transaction_id), id_tag).await;
    }

    async fn stop_transaction_inner(self: &Arc<Self>, transaction_id: Option<i32>, id_tag: &str) {
        if transaction_id.is_none() {
            self.event_bus
                .log("StopTransaction: no known transactionId; sending 0 and proceeding");
        }
        let meter = self.meter_value_wh().await;
        self.set_status(CpStatus::Authorized, None).await;
        // spec §4.7: "no notify — server will query".
        self.set_connector_status(1, ConnectorStatus::Finishing, false).await;

        let payload = outbound::stop_transaction::payload(transaction_id, meter, Some(id_tag));
        match self.call(actions::STOP_TRANSACTION, payload).await {
            Ok(_) => {
                if let Some(session) = self.current_session().await {
                    session.connector.write_status(1, ConnectorStatus::Available);
                }
            }
            Err(e) => self.report_error(e).await,
        }
    }

    pub async fn send_heartbeat(self: &Arc<Self>) {
        if let Err(e) = self.call(actions::HEARTBEAT, outbound::heartbeat::payload()).await {
            self.report_error(e).await;
        }
    }

    pub async fn send_meter_value(self: &Arc<Self>, connector_id: u32) {
        let transaction_id = self.transaction_id().await;
        let meter = self.meter_value_wh().await;
        let payload = outbound::meter_values::payload(connector_id, transaction_id, meter);
        if let Err(e) = self.call(actions::METER_VALUES, payload).await {
            self.report_error(e).await;
        }
    }

    pub async fn set_meter_value(self: &Arc<Self>, wh: u64, update_server: bool) {
        if let Some(session) = self.current_session().await {
            session.state.set_meter_value_wh(wh);
        }
        self.event_bus.publish(Event::MeterValueChange(wh));
        if update_server {
            self.send_meter_value(0).await;
        }
    }

    pub async fn set_connector_status(self: &Arc<Self>, connector_id: u32, status: ConnectorStatus, notify: bool) {
        if let Some(session) = self.current_session().await {
            session.connector.write_status(connector_id, status);
        }
        if notify {
            let payload = outbound::status_notification::payload(connector_id, status);
            if let Err(e) = self.call(actions::STATUS_NOTIFICATION, payload).await {
                self.report_error(e).await;
            }
        }
    }

    /// spec §4.4: durable write, status cascade with the Operative ↔
    /// Available fix from §9, then (for connector 0) cascade to 1 and 2
    /// after the local update and event have already applied.
    pub async fn set_availability(self: &Arc<Self>, connector_id: u32, availability: Availability) {
        self.apply_availability(connector_id, availability).await;
        if connector_id == 0 {
            for c in [1u32, 2u32] {
                self.apply_availability(c, availability).await;
            }
        }
    }

    async fn apply_availability(self: &Arc<Self>, connector_id: u32, availability: Availability) {
        self.durable
            .put(&crate::kv::keys::conn_availability(connector_id), availability.to_string());
        self.event_bus.publish(Event::AvailabilityChange {
            connector_id,
            availability: availability.to_string(),
        });
        let status = match availability {
            Availability::Inoperative => ConnectorStatus::Unavailable,
            Availability::Operative => ConnectorStatus::Available,
        };
        self.set_connector_status(connector_id, status, true).await;
    }

    // ── Outbound CALL plumbing, used by `ocpp::inbound` too ────

    pub(crate) async fn call(&self, action: &'static str, payload: Value) -> Result<Value, EngineError> {
        let session = self
            .current_session()
            .await
            .ok_or_else(|| EngineError::Transport("No connection to OCPP server".to_string()))?;

        let unique_id = new_message_id();
        let rx = session.pending.register(unique_id.clone(), action);
        let frame = OcppFrame::Call {
            unique_id: unique_id.clone(),
            action: action.to_string(),
            payload,
        };
        session
            .outbound_tx
            .send(Message::Text(frame.serialize()))
            .map_err(|_| EngineError::Transport("write on closed socket".to_string()))?;

        match tokio::time::timeout(pending_calls::DEFAULT_TIMEOUT, rx).await {
            Ok(Ok(CallOutcome::Result(value))) => Ok(value),
            Ok(Ok(CallOutcome::Error { code, description })) => Err(EngineError::ServerRejection {
                action,
                reason: format!("{code}: {description}"),
            }),
            Ok(Err(_)) => Err(EngineError::Transport("pending call channel closed".to_string())),
            Err(_) => Err(EngineError::Timeout {
                unique_id,
                action: action.to_string(),
            }),
        }
    }

    /// Fire off a CALL without awaiting its reply — used for
    /// `TriggerMessage`-originated traffic, where the failure (if any)
    /// should just be logged, not returned to an inbound handler that has
    /// already replied.
    pub(crate) fn originate(self: &Arc<Self>, action: &'static str, payload: Value) {
        let engine = self.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.call(action, payload).await {
                engine.report_error(e).await;
            }
        });
    }

    /// Send a pre-built reply frame (CALLRESULT/CALLERROR) to an inbound
    /// CALL. Used exclusively by `ocpp::inbound`.
    pub(crate) async fn send_frame(&self, frame: OcppFrame) -> Result<(), EngineError> {
        let session = self
            .current_session()
            .await
            .ok_or_else(|| EngineError::Transport("No connection to OCPP server".to_string()))?;
        session
            .outbound_tx
            .send(Message::Text(frame.serialize()))
            .map_err(|_| EngineError::Transport("write on closed socket".to_string()))
    }

    async fn report_error(&self, error: EngineError) {
        match &error {
            EngineError::Transport(message) => {
                self.event_bus.log(format!("transport error: {message}"));
                self.set_status(CpStatus::Error, Some(message.clone())).await;
            }
            EngineError::Timeout { action, unique_id } => {
                self.event_bus
                    .log(format!("timeout waiting for reply to {action} ({unique_id})"));
            }
            EngineError::ServerRejection { action, reason } => {
                self.event_bus.log(format!("server rejected {action}: {reason}"));
            }
            other => self.event_bus.log(other.to_string()),
        }
    }

    // ── Status transitions / socket lifecycle (spec §4.6, §4.8) ─

    async fn current_session(&self) -> Option<Arc<Session>> {
        self.session.read().await.clone()
    }

    async fn is_current_generation(&self, generation: u64) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.generation)
            == Some(generation)
    }

    fn publish_status_event(&self, status: CpStatus, detail: Option<String>) {
        self.event_bus.publish(Event::StatusChange {
            status: status.to_string(),
            detail,
        });
    }

    /// Every write goes through here so the transition table (spec §4.6)
    /// is enforced and the observable event always fires (spec §8: "the
    /// new status is observable via onStatusChange before the next message
    /// is processed").
    async fn set_status(&self, new: CpStatus, detail: Option<String>) {
        if let Some(session) = self.current_session().await {
            let current = session.state.cp_status();
            if !current.can_transition_to(new) {
                self.event_bus
                    .log(format!("ignoring illegal transition {current} -> {new}"));
                return;
            }
            session.state.set_cp_status(new);
        }
        self.publish_status_event(new, detail);
    }

    async fn on_message(self: &Arc<Self>, generation: u64, text: &str) {
        if !self.is_current_generation(generation).await {
            return;
        }
        match OcppFrame::parse(text) {
            Ok(OcppFrame::Call { unique_id, action, payload }) => {
                crate::ocpp::inbound::dispatch(self, &unique_id, &action, payload).await;
            }
            Ok(OcppFrame::CallResult { unique_id, payload }) => {
                if let Some(session) = self.current_session().await {
                    if session.pending.resolve(&unique_id, payload).is_none() {
                        self.event_bus.log(format!("CALLRESULT for unknown id {unique_id} dropped"));
                    }
                }
            }
            Ok(OcppFrame::CallError {
                unique_id,
                error_code,
                error_description,
                ..
            }) => {
                if let Some(session) = self.current_session().await {
                    if session
                        .pending
                        .resolve_error(&unique_id, &error_code, &error_description)
                        .is_none()
                    {
                        self.event_bus.log(format!("CALLERROR for unknown id {unique_id} dropped"));
                    }
                }
            }
            Err(e) => {
                // spec §4.2: malformed JSON transitions to ERROR without
                // closing the socket — the server may recover.
                self.event_bus.log(format!("malformed frame dropped: {e}"));
                self.set_status(CpStatus::Error, Some(e.to_string())).await;
            }
        }
    }

    async fn on_close(self: &Arc<Self>, generation: u64, code: Option<u16>) {
        if !self.is_current_generation(generation).await {
            return;
        }
        self.session.write().await.take();
        match code {
            Some(3001) => self.publish_status_event(CpStatus::Disconnected, None),
            other => self.publish_status_event(CpStatus::Error, Some(format!("Connection error: {other:?}"))),
        }
    }

    async fn on_transport_error(self: &Arc<Self>, generation: u64, message: String) {
        if !self.is_current_generation(generation).await {
            return;
        }
        self.session.write().await.take();
        self.event_bus.log(format!("websocket error: {message}"));
        self.publish_status_event(CpStatus::Error, Some(format!("websocket error: {message}")));
    }
}

fn subprotocol_accepted(response: &tokio_tungstenite::tungstenite::http::Response<Option<Vec<u8>>>) -> bool {
    response
        .headers()
        .get("sec-websocket-protocol")
        .and_then(|v| v.to_str().ok())
        .map(|selected| config::SUBPROTOCOLS.contains(&selected))
        .unwrap_or(false)
}

async fn writer_task(mut sink: SplitSink<WsStream, Message>, mut outbound_rx: mpsc::UnboundedReceiver<Message>) {
    while let Some(message) = outbound_rx.recv().await {
        let is_close = matches!(message, Message::Close(_));
        if sink.send(message).await.is_err() {
            break;
        }
        if is_close {
            let _ = sink.close().await;
            break;
        }
    }
}

async fn reader_task(engine: Arc<Engine>, generation: u64, mut stream: SplitStream<WsStream>) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => engine.on_message(generation, &text).await,
            Ok(Message::Close(frame)) => {
                let code = frame.map(|f| u16::from(f.code));
                engine.on_close(generation, code).await;
                break;
            }
            Ok(_) => {}
            Err(e) => {
                engine.on_transport_error(generation, e.to_string()).await;
                break;
            }
        }
    }
}

/// Background sweep for the pending-call table (spec §2 C3, SPEC_FULL §2):
/// armed alongside connection setup, ticking independently of the heartbeat
/// timer's own interval.
async fn sweep_task(engine: Arc<Engine>, generation: u64) {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(5));
    loop {
        ticker.tick().await;
        if !engine.is_current_generation(generation).await {
            return;
        }
        if let Some(session) = engine.current_session().await {
            for (unique_id, action) in session.pending.sweep_timeouts(pending_calls::DEFAULT_TIMEOUT) {
                engine.event_bus.log(format!("timeout waiting for reply to {action} ({unique_id})"));
            }
        }
    }
}
