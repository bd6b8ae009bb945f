// src/http/mod.rs

//! HTTP surface for scriptq.
//!
//! Responsibilities:
//! - Define handlers for upload, cancel, status and log endpoints
//!   (`routes.rs`).
//! - Map core errors onto HTTP responses (`models.rs`).
//! - Own the server lifecycle including graceful shutdown (`server.rs`).

pub mod models;
pub mod routes;
pub mod server;

pub use models::HttpError;
pub use routes::{AppState, create_router};
pub use server::serve;
