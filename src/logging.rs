// src/logging.rs

//! Logging setup for `scriptq` using `tracing` + `tracing-subscriber`.
//!
//! The level comes from the `--log-level` CLI flag when given, otherwise
//! from the `SCRIPTQ_LOG` environment variable, otherwise it defaults to
//! `info`. `SCRIPTQ_LOG` accepts full `EnvFilter` directives, so per-target
//! levels like `scriptq=debug,tower_http=warn` work too.
//!
//! Logs go to STDERR; stdout stays clean for anything the process is piped
//! into.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(directive_for(level)),
        None => EnvFilter::try_from_env("SCRIPTQ_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn directive_for(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
