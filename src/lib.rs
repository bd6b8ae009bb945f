// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod http;
pub mod logging;
pub mod storage;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_or_default};
use crate::engine::spawn_engine;
use crate::exec::ProcessRunner;
use crate::http::{AppState, create_router, serve};
use crate::storage::{LogArchive, ScriptStore};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - script store + log archive
/// - submission queue + single-flight worker
/// - the HTTP server with graceful shutdown
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args
        .config
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let cfg = load_or_default(&config_path)?;

    // CLI flags win over the config file.
    let host = args.host.unwrap_or_else(|| cfg.server.host.clone());
    let port = args.port.unwrap_or(cfg.server.port);

    let scripts = ScriptStore::new(&cfg.storage.scripts_dir);
    let archive = LogArchive::new(&cfg.storage.logs_dir);

    // Real process execution in production; tests swap in their own runner.
    let runner = Arc::new(ProcessRunner::new(&cfg.runner.interpreter));

    let engine = spawn_engine(
        cfg.queue.capacity,
        cfg.queue.when_full,
        runner,
        archive.clone(),
    );

    info!(
        host = %host,
        port,
        queue_capacity = cfg.queue.capacity,
        when_full = ?cfg.queue.when_full,
        interpreter = %cfg.runner.interpreter,
        "starting scriptq server"
    );

    let state = AppState {
        engine,
        scripts,
        archive,
    };
    let app = create_router(state, &cfg.storage.static_dir);

    serve(app, &host, port).await
}
