// src/http/server.rs

//! HTTP server lifecycle: bind, serve, shut down gracefully.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

/// Serve the application until Ctrl+C or SIGTERM.
///
/// Graceful shutdown stops accepting connections and lets in-flight
/// requests finish; the worker task is torn down when the process exits.
pub async fn serve(app: Router, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address '{host}:{port}'"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding listener on {addr}"))?;

    info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("received Ctrl+C signal");
        }
        _ = wait_for_sigterm() => {
            info!("received SIGTERM signal");
        }
    }

    info!("starting graceful shutdown");
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
    sigterm.recv().await;
}

/// SIGTERM does not exist off Unix; park forever and rely on Ctrl+C.
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
