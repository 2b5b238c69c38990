// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod api;
mod config;
mod poll;
mod server;
mod udp;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use wsjtx_app::{init_logging, ConfigFile};
use wsjtx_core::{Bridge, DynResult, Station};
use wsjtx_qso_log::FileQsoLogStore;

use config::BridgeConfig;
use udp::UdpTransport;

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - WSJT-X UDP bridge");

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Own callsign used by the automatic responder
    #[arg(short = 'c', long = "callsign")]
    callsign: Option<String>,
    /// Own Maidenhead locator
    #[arg(short = 'g', long = "grid")]
    grid: Option<String>,
    /// IP address for the HTTP API
    #[arg(short = 'l', long = "listen")]
    listen: Option<IpAddr>,
    /// Port for the HTTP API
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
}

/// CLI flags win over the config file.
fn apply_cli_overrides(cli: &Cli, cfg: &mut BridgeConfig) {
    if let Some(ref callsign) = cli.callsign {
        cfg.general.callsign = callsign.clone();
    }
    if let Some(ref grid) = cli.grid {
        cfg.general.grid = grid.clone();
    }
    if let Some(listen) = cli.listen {
        cfg.http.listen = listen;
    }
    if let Some(port) = cli.port {
        cfg.http.port = port;
    }
}

/// Own identity, normalised to upper case.
fn station_from_config(cfg: &BridgeConfig) -> Station {
    Station::new(
        cfg.general.callsign.trim().to_ascii_uppercase(),
        cfg.general.grid.trim().to_ascii_uppercase(),
    )
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", BridgeConfig::example_combined_toml());
        return Ok(());
    }

    let (mut cfg, config_path) = BridgeConfig::load(cli.config.as_deref())?;
    apply_cli_overrides(&cli, &mut cfg);
    cfg.validate()
        .map_err(|e| format!("Invalid bridge configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let station = station_from_config(&cfg);
    if station.callsign.is_empty() {
        warn!("No callsign configured; automation will never reply");
    } else {
        info!("Callsign: {} ({})", station.callsign, station.grid);
    }

    let listen = SocketAddr::new(cfg.wsjtx.listen_host, cfg.wsjtx.listen_port);
    let transport =
        UdpTransport::bind(listen, cfg.wsjtx.peer_addr(), cfg.wsjtx.connect_timeout()).await?;
    let log_store = FileQsoLogStore::open(&cfg.qso_log)?;

    let bridge = Arc::new(Mutex::new(Bridge::new(
        Arc::new(transport),
        Arc::new(log_store),
        station,
    )));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut task_handles: Vec<JoinHandle<()>> = Vec::new();

    if cfg.behavior.poll_interval_ms > 0 {
        task_handles.push(tokio::spawn(poll::run_poll_loop(
            bridge.clone(),
            Duration::from_millis(cfg.behavior.poll_interval_ms),
            shutdown_rx.clone(),
        )));
    } else {
        info!("Background polling disabled");
    }

    if cfg.http.enabled {
        let addr = SocketAddr::new(cfg.http.listen, cfg.http.port);
        let http_bridge = bridge.clone();
        let limit = cfg.behavior.recent_decodes_limit;
        let http_shutdown_rx = shutdown_rx.clone();
        task_handles.push(tokio::spawn(async move {
            if let Err(e) = server::run_http_server(addr, http_bridge, limit, http_shutdown_rx).await
            {
                error!("HTTP API error: {:?}", e);
            }
        }));
    }

    signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down");
    let _ = shutdown_tx.send(true);
    tokio::time::sleep(Duration::from_millis(400)).await;

    for handle in &task_handles {
        if !handle.is_finished() {
            handle.abort();
        }
    }
    for handle in task_handles {
        let _ = handle.await;
    }
    Ok(())
}
