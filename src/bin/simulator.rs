//! A thin terminal front-end over the charge point engine.
//!
//! Contains no protocol logic of its own — it only parses operator
//! commands, calls into `Engine`, and prints the events the engine
//! publishes. The UI shell proper is out of scope (spec §1); this exists
//! so the crate is runnable and demonstrable the way the teacher's own
//! `main.rs` wires a binary around its library.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use ocpp_charge_point::kv::DurableStore;
use ocpp_charge_point::observer::Event;
use ocpp_charge_point::support::shutdown::ShutdownCoordinator;
use ocpp_charge_point::{create_event_bus, ChargePointConfig, Engine};

#[tokio::main]
async fn main() {
    let config_path = std::env::var("OCPP_CP_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| ChargePointConfig::default_path());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ChargePointConfig::load(&config_path);
    info!("charge point config loaded from {}", config_path.display());

    let durable = Arc::new(DurableStore::open_default());
    let event_bus = create_event_bus();
    let engine = Engine::new(config, durable, event_bus.clone());

    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                Event::StatusChange { status, detail } => match detail {
                    Some(detail) => println!("[status] {status} ({detail})"),
                    None => println!("[status] {status}"),
                },
                Event::AvailabilityChange { connector_id, availability } => {
                    println!("[availability] connector {connector_id}: {availability}")
                }
                Event::Log(message) => println!("{message}"),
                Event::MeterValueChange(wh) => println!("[meter] {wh} Wh"),
            }
        }
    });

    let shutdown = ShutdownCoordinator::new(5);
    shutdown.start_signal_listener();
    let shutdown_signal = shutdown.signal();

    print_help();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        print!("ocpp> ");
        use std::io::Write;
        let _ = std::io::stdout().flush();

        let line = tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("stdin read error: {e}");
                    break;
                }
            },
            _ = shutdown_signal.notified().wait() => {
                info!("shutdown signal received, exiting REPL");
                break;
            }
        };

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else { continue };
        let rest: Vec<&str> = words.collect();

        match command {
            "connect" => {
                let ws_url = rest.first().copied().unwrap_or("ws://localhost:9000/ocpp/");
                let cp_id = rest.get(1).copied().unwrap_or("CP01");
                engine.connect(ws_url, cp_id).await;
            }
            "disconnect" => engine.disconnect().await,
            "authorize" => {
                let tag = rest.first().copied().unwrap_or("DEADBEEF");
                engine.authorize(tag).await;
            }
            "start" => {
                let tag = rest.first().copied().unwrap_or("DEADBEEF");
                engine.start_transaction(tag, 1, 0).await;
            }
            "stop" => {
                let tag = rest.first().copied().unwrap_or("DEADBEEF");
                engine.stop_transaction(tag).await;
            }
            "heartbeat" => engine.send_heartbeat().await,
            "meter" => match rest.first().and_then(|v| v.parse::<u64>().ok()) {
                Some(wh) => engine.set_meter_value(wh, true).await,
                None => println!("usage: meter <wh>"),
            },
            "avail" => match (rest.first().and_then(|v| v.parse::<u32>().ok()), rest.get(1)) {
                (Some(connector_id), Some(state)) => match state.parse() {
                    Ok(availability) => engine.set_availability(connector_id, availability).await,
                    Err(_) => println!("usage: avail <connector> <Operative|Inoperative>"),
                },
                _ => println!("usage: avail <connector> <Operative|Inoperative>"),
            },
            "status" => {
                let status = engine.cp_status().await;
                let meter = engine.meter_value_wh().await;
                let transaction_id = engine.transaction_id().await;
                println!("cpStatus={status} meterValueWh={meter} transactionId={transaction_id:?}");
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("unknown command: {other} (try `help`)"),
        }
    }

    info!("shutting down, closing any open session");
    engine.disconnect().await;
}

fn print_help() {
    println!(
        "commands: connect <wsUrl> <cpId> | disconnect | authorize <tag> | start [tag] | \
         stop [tag] | heartbeat | meter <wh> | avail <connector> <Operative|Inoperative> | status | quit"
    );
}
