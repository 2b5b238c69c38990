// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::net::SocketAddr;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tokio::sync::watch;
use tracing::info;

use crate::api::{self, ApiContext, SharedBridge};

pub async fn run_http_server(
    addr: SocketAddr,
    bridge: SharedBridge,
    recent_decodes_limit: usize,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), std::io::Error> {
    let server = build_server(addr, bridge, recent_decodes_limit)?;
    let handle = server.handle();
    tokio::spawn(async move {
        while shutdown_rx.changed().await.is_ok() {
            if *shutdown_rx.borrow() {
                break;
            }
        }
        handle.stop(true).await;
    });
    info!("HTTP API listening on {}", addr);
    server.await
}

fn build_server(
    addr: SocketAddr,
    bridge: SharedBridge,
    recent_decodes_limit: usize,
) -> Result<Server, std::io::Error> {
    let context = web::Data::new(ApiContext {
        bridge,
        recent_decodes_limit,
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(context.clone())
            .configure(api::configure)
    })
    .shutdown_timeout(1)
    .disable_signals()
    .bind(addr)?
    .run();
    Ok(server)
}
