//! Extractkit server - HTTP extraction service
//!
//! Thin axum transport over the extractkit pipeline: `POST /extract` and
//! `GET /health`. Exposed as a library so router-level tests can drive the
//! app without binding a socket.

pub mod app;
pub mod routes;

pub use app::{build_app, AppState};
