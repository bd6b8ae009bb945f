// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::WhenFull;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [server]
/// host = "127.0.0.1"
/// port = 8080
///
/// [queue]
/// capacity = 100
/// when_full = "wait"
///
/// [runner]
/// interpreter = "python3"
///
/// [storage]
/// scripts_dir = "scripts"
/// logs_dir = "logs"
/// static_dir = "static"
/// ```
///
/// All sections are optional and have reasonable defaults, so the server
/// runs with no config file at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Listen address from `[server]`.
    #[serde(default)]
    pub server: ServerSection,

    /// Submission queue behaviour from `[queue]`.
    #[serde(default)]
    pub queue: QueueSection,

    /// Script execution settings from `[runner]`.
    #[serde(default)]
    pub runner: RunnerSection,

    /// On-disk layout from `[storage]`.
    #[serde(default)]
    pub storage: StorageSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// `[queue]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSection {
    /// Maximum number of submissions waiting to run.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// `"wait"` or `"reject"`.
    ///
    /// - `"wait"` (default): uploads block until a queue slot frees up.
    /// - `"reject"`: uploads fail immediately with a queue-full error.
    #[serde(default)]
    pub when_full: WhenFull,
}

impl Default for QueueSection {
    fn default() -> Self {
        QueueSection {
            capacity: default_capacity(),
            when_full: WhenFull::default(),
        }
    }
}

fn default_capacity() -> usize {
    100
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    /// Interpreter used to launch uploaded scripts (e.g. `python3`, `sh`).
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
}

impl Default for RunnerSection {
    fn default() -> Self {
        RunnerSection {
            interpreter: default_interpreter(),
        }
    }
}

fn default_interpreter() -> String {
    "python3".to_string()
}

/// `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// Where uploaded scripts are written.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    /// Where per-task output files (`<id>.txt`) are archived.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Directory served at `/` (the upload UI).
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        StorageSection {
            scripts_dir: default_scripts_dir(),
            logs_dir: default_logs_dir(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("scripts")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}
