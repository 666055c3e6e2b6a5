//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod handlers;
mod server;

pub use handlers::{PAYMENT_URL_PATH, RESULT_URL_PATH};
pub use server::HttpServer;
