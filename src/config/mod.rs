// src/config/mod.rs

//! Configuration loading and validation for scriptq.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and check basic invariants (`loader.rs`).

pub mod loader;
pub mod model;

pub use loader::{default_config_path, load_from_path, load_or_default};
pub use model::{ConfigFile, QueueSection, RunnerSection, ServerSection, StorageSection};
